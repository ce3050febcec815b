//! Protocol Module
//!
//! The HTTP/1.1 subset the server speaks.
//!
//! ### Request Format
//! ```text
//! METHOD SP target SP HTTP/1.x CRLF
//! (header-name: value CRLF)*
//! CRLF
//! body (Content-Length bytes, or chunked)
//! ```
//!
//! ### Response Format
//! ```text
//! HTTP/1.1 SP status SP reason CRLF
//! Content-Length: n CRLF
//! (header-name: value CRLF)*
//! CRLF
//! body
//! ```
//!
//! ### Status Codes
//! - 200: OK
//! - 201: Created (with Location)
//! - 204: No Content
//! - 400: Bad Request
//! - 404: Not Found
//! - 405: Method Not Allowed
//! - 413: Payload Too Large
//! - 500: Internal Server Error

mod request;
mod response;
mod codec;

pub use request::Request;
pub use response::{reason_phrase, Response};
pub use codec::{
    decode_request, encode_response, read_request, write_response, MAX_BODY_SIZE,
    MAX_HEADER_LINES, MAX_LINE_LENGTH,
};
