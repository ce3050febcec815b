//! Protocol codec
//!
//! Reading requests from and writing responses to a byte stream.
//!
//! Bodies are framed by `Content-Length` or `Transfer-Encoding: chunked`
//! (chunked wins when both are present). A request without either has an
//! empty body.

use std::io::{BufRead, Cursor, ErrorKind, Read, Write};

use crate::error::{ProductError, Result};
use super::{reason_phrase, Request, Response};

/// Maximum request body size (16 MB)
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Maximum length of the request line or a header line
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Maximum number of header lines
pub const MAX_HEADER_LINES: usize = 100;

// =============================================================================
// Request Decoding
// =============================================================================

/// Read one request from a buffered stream
///
/// A stream that ends before the first byte yields an `UnexpectedEof` I/O
/// error, which callers treat as the client closing the connection.
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Request> {
    let request_line = match read_line(reader)? {
        Some(line) => line,
        None => return Err(std::io::Error::from(ErrorKind::UnexpectedEof).into()),
    };

    let (method, target, minor_version) = parse_request_line(&request_line)?;
    let headers = read_headers(reader)?;

    let mut request = Request {
        method,
        target,
        minor_version,
        headers,
        body: Vec::new(),
    };

    request.body = read_body(reader, &request)?;
    Ok(request)
}

/// Decode a complete request from bytes
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    let mut cursor = Cursor::new(bytes);
    read_request(&mut cursor)
}

/// Read a CRLF- (or LF-) terminated line without its terminator.
///
/// Returns `None` on a clean end of stream.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let read = reader
        .by_ref()
        .take(MAX_LINE_LENGTH as u64 + 1)
        .read_until(b'\n', &mut buf)?;

    if read == 0 {
        return Ok(None);
    }

    if buf.last() != Some(&b'\n') {
        if buf.len() > MAX_LINE_LENGTH {
            return Err(ProductError::Protocol(format!(
                "Line exceeds {} bytes",
                MAX_LINE_LENGTH
            )));
        }
        return Err(std::io::Error::from(ErrorKind::UnexpectedEof).into());
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| ProductError::Protocol("Line is not valid UTF-8".to_string()))
}

/// Parse `METHOD target HTTP/1.x`
fn parse_request_line(line: &str) -> Result<(String, String, u8)> {
    let mut parts = line.split_whitespace();

    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ProductError::Protocol(format!(
            "Malformed request line: {:?}",
            line
        )));
    };

    let minor_version = match version {
        "HTTP/1.1" => 1,
        "HTTP/1.0" => 0,
        _ => {
            return Err(ProductError::Protocol(format!(
                "Unsupported HTTP version: {}",
                version
            )))
        }
    };

    if !target.starts_with('/') {
        return Err(ProductError::Protocol(format!(
            "Unsupported request target: {}",
            target
        )));
    }

    Ok((method.to_string(), target.to_string(), minor_version))
}

/// Read header lines up to the blank line
fn read_headers<R: BufRead>(reader: &mut R) -> Result<Vec<(String, String)>> {
    let mut headers = Vec::new();

    loop {
        let line = read_line(reader)?
            .ok_or_else(|| ProductError::from(std::io::Error::from(ErrorKind::UnexpectedEof)))?;

        if line.is_empty() {
            return Ok(headers);
        }

        if headers.len() >= MAX_HEADER_LINES {
            return Err(ProductError::Protocol(format!(
                "More than {} headers",
                MAX_HEADER_LINES
            )));
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(ProductError::Protocol(format!("Malformed header: {:?}", line)));
        };

        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ProductError::Protocol(format!("Malformed header: {:?}", line)));
        }

        headers.push((name.to_ascii_lowercase(), value.trim().to_string()));
    }
}

/// Read the body as framed by the request's headers
fn read_body<R: BufRead>(reader: &mut R, request: &Request) -> Result<Vec<u8>> {
    let chunked = request
        .header("transfer-encoding")
        .is_some_and(|value| value.to_ascii_lowercase().contains("chunked"));

    if chunked {
        return read_chunked_body(reader);
    }

    let Some(length) = request.header("content-length") else {
        return Ok(Vec::new());
    };

    let length: usize = length
        .parse()
        .map_err(|_| ProductError::Protocol(format!("Invalid Content-Length: {}", length)))?;

    if length > MAX_BODY_SIZE {
        return Err(ProductError::PayloadTooLarge {
            size: length,
            max: MAX_BODY_SIZE,
        });
    }

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body)?;
    Ok(body)
}

/// Decode a chunked body, discarding chunk extensions and trailers
fn read_chunked_body<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut body = Vec::new();

    loop {
        let line = read_line(reader)?
            .ok_or_else(|| ProductError::from(std::io::Error::from(ErrorKind::UnexpectedEof)))?;

        let size_text = line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_text, 16)
            .map_err(|_| ProductError::Protocol(format!("Invalid chunk size: {:?}", line)))?;

        if size == 0 {
            // Trailer section ends with a blank line
            while let Some(trailer) = read_line(reader)? {
                if trailer.is_empty() {
                    break;
                }
            }
            return Ok(body);
        }

        let total = body.len().saturating_add(size);
        if total > MAX_BODY_SIZE {
            return Err(ProductError::PayloadTooLarge {
                size: total,
                max: MAX_BODY_SIZE,
            });
        }

        let start = body.len();
        body.resize(total, 0);
        reader.read_exact(&mut body[start..])?;

        match read_line(reader)? {
            Some(rest) if rest.is_empty() => {}
            _ => {
                return Err(ProductError::Protocol(
                    "Chunk not terminated by CRLF".to_string(),
                ))
            }
        }
    }
}

// =============================================================================
// Response Encoding
// =============================================================================

/// Encode a response to bytes
///
/// Content-Length is always emitted; `keep_alive` picks the Connection header.
pub fn encode_response(response: &Response, keep_alive: bool) -> Vec<u8> {
    let mut head = format!(
        "HTTP/1.1 {} {}\r\n",
        response.status,
        reason_phrase(response.status)
    );

    for (name, value) in &response.headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }

    head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    head.push_str(if keep_alive {
        "Connection: keep-alive\r\n"
    } else {
        "Connection: close\r\n"
    });
    head.push_str("\r\n");

    let mut message = Vec::with_capacity(head.len() + response.body.len());
    message.extend_from_slice(head.as_bytes());
    message.extend_from_slice(&response.body);
    message
}

/// Write a response to a stream and flush it
pub fn write_response<W: Write>(writer: &mut W, response: &Response, keep_alive: bool) -> Result<()> {
    let encoded = encode_response(response, keep_alive);
    writer.write_all(&encoded)?;
    writer.flush()?;
    Ok(())
}
