//! Response definitions
//!
//! Represents responses to clients, and the fixed bodies the product
//! routes answer with.

use crate::error::ProductError;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// An HTTP response to send to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: u16,

    /// Extra headers (Content-Length is added by the codec)
    pub headers: Vec<(String, String)>,

    /// Body bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Create a response with no headers and no body
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Plain-text response
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), TEXT_PLAIN.to_string())],
            body: body.as_bytes().to_vec(),
        }
    }

    /// 200 with a compact JSON body
    pub fn json(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".to_string(), APPLICATION_JSON.to_string())],
            body,
        }
    }

    /// 201 with a Location header and no body
    pub fn created(location: &str) -> Self {
        Self::new(201).with_header("Location", location)
    }

    /// 200 "Product Updated"
    pub fn updated() -> Self {
        Self::text(200, "Product Updated")
    }

    /// 204 with no body
    pub fn no_content() -> Self {
        Self::new(204)
    }

    /// 500 with the generic body
    pub fn internal_error() -> Self {
        Self::text(500, "Internal Server Error")
    }

    /// Response for an error.
    ///
    /// Server-side failures all collapse into the same generic 500.
    pub fn from_error(err: &ProductError) -> Self {
        match err {
            ProductError::Validation => Self::text(
                400,
                "Bad Request: Missing required fields (id, name, description)",
            ),
            ProductError::NotFound(_) => Self::text(404, "Product Not Found"),
            ProductError::RouteNotFound(_) => Self::text(404, "Not Found"),
            ProductError::MethodNotAllowed { .. } => Self::text(405, "Method Not Allowed"),
            ProductError::Protocol(_) => Self::text(400, "Bad Request"),
            ProductError::PayloadTooLarge { .. } => Self::text(413, "Payload Too Large"),
            _ => Self::internal_error(),
        }
    }

    /// First value of a header (name is matched case-insensitively)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Reason phrase for the status codes the server emits
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
