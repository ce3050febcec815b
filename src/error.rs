//! Error types for productd
//!
//! Provides a unified error type for all operations, plus the mapping from
//! each error to the HTTP status it is reported as.

use thiserror::Error;

/// Result type alias using ProductError
pub type Result<T> = std::result::Result<T, ProductError>;

/// Unified error type for productd operations
#[derive(Debug, Error)]
pub enum ProductError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    /// Data file content is not a JSON array of objects
    #[error("Store parse error: {0}")]
    StoreParse(String),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    /// Request body is not the JSON the operation expects
    #[error("Body parse error: {0}")]
    BodyParse(String),

    #[error("Missing required fields (id, name, description)")]
    Validation,

    #[error("Product not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Routing Errors
    // -------------------------------------------------------------------------
    #[error("No route for {0}")]
    RouteNotFound(String),

    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    // -------------------------------------------------------------------------
    // Wire Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProductError {
    /// HTTP status code this error is reported as
    pub fn status(&self) -> u16 {
        match self {
            ProductError::Validation | ProductError::Protocol(_) => 400,
            ProductError::NotFound(_) | ProductError::RouteNotFound(_) => 404,
            ProductError::MethodNotAllowed { .. } => 405,
            ProductError::PayloadTooLarge { .. } => 413,
            ProductError::Io(_)
            | ProductError::StoreParse(_)
            | ProductError::BodyParse(_)
            | ProductError::Config(_) => 500,
        }
    }

    /// Whether this error is a server-side failure (reported as a bare 500)
    pub fn is_internal(&self) -> bool {
        self.status() == 500
    }
}
