//! Request router
//!
//! Maps an HTTP method and path to exactly one product operation.
//!
//! | Method | Path            | Route     |
//! |--------|-----------------|-----------|
//! | POST   | `/product`      | Create    |
//! | GET    | `/product`      | List      |
//! | GET    | `/product/{id}` | Get       |
//! | PUT    | `/product/{id}` | Replace   |
//! | PATCH  | `/product/{id}` | Patch     |
//! | DELETE | `/product/{id}` | Delete    |
//!
//! Any other method on `/product/{id}` is 405; anything else is 404.

use crate::error::{ProductError, Result};

/// Collection path
pub const COLLECTION_PATH: &str = "/product";

/// A resolved route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Append a new record
    Create,

    /// Return the whole collection
    List,

    /// Return one record
    Get { id: String },

    /// Replace one record wholesale
    Replace { id: String },

    /// Shallow-merge fields into one record
    Patch { id: String },

    /// Remove one record
    Delete { id: String },
}

/// Resolve a request to a route.
///
/// `target` may carry a query string or fragment; only the path is routed.
/// The id is the segment right after `/product/`, unvalidated.
pub fn route(method: &str, target: &str) -> Result<Route> {
    let path = strip_query(target);
    let method = method.to_ascii_uppercase();

    if path == COLLECTION_PATH {
        return match method.as_str() {
            "POST" => Ok(Route::Create),
            "GET" => Ok(Route::List),
            _ => Err(ProductError::RouteNotFound(format!("{} {}", method, path))),
        };
    }

    let Some(rest) = path.strip_prefix("/product/") else {
        return Err(ProductError::RouteNotFound(format!("{} {}", method, path)));
    };

    let id = rest.split('/').next().unwrap_or_default().to_string();

    match method.as_str() {
        "GET" => Ok(Route::Get { id }),
        "PUT" => Ok(Route::Replace { id }),
        "PATCH" => Ok(Route::Patch { id }),
        "DELETE" => Ok(Route::Delete { id }),
        _ => Err(ProductError::MethodNotAllowed {
            method,
            path: path.to_string(),
        }),
    }
}

fn strip_query(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}
