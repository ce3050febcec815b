//! Request definitions
//!
//! Represents a parsed HTTP request.

/// A parsed HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Method as sent (routing upper-cases it)
    pub method: String,

    /// Request target, including any query string
    pub target: String,

    /// Minor HTTP version (0 or 1)
    pub minor_version: u8,

    /// Headers in arrival order, names lower-cased
    pub headers: Vec<(String, String)>,

    /// Decoded body (empty when none was sent)
    pub body: Vec<u8>,
}

impl Request {
    /// First value of a header (name is matched case-insensitively)
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the client expects the connection to stay open
    pub fn keep_alive(&self) -> bool {
        let connection = self.header("connection").map(str::to_ascii_lowercase);
        match connection.as_deref() {
            Some(value) if value.contains("close") => false,
            Some(value) if value.contains("keep-alive") => true,
            _ => self.minor_version >= 1,
        }
    }
}
