//! Codec Tests
//!
//! Tests for HTTP request decoding and response encoding.

use std::io::{BufReader, Cursor};

use productd::protocol::{decode_request, encode_response, read_request, Response, MAX_BODY_SIZE};
use productd::ProductError;

// =============================================================================
// Request Decoding Tests
// =============================================================================

#[test]
fn test_decode_simple_get() {
    let request = decode_request(b"GET /product HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();

    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/product");
    assert_eq!(request.minor_version, 1);
    assert_eq!(request.header("HOST"), Some("localhost"));
    assert!(request.body.is_empty());
}

#[test]
fn test_decode_content_length_body() {
    let raw = b"POST /product HTTP/1.1\r\nContent-Length: 9\r\n\r\n{\"id\":1}X";
    let request = decode_request(raw).unwrap();

    assert_eq!(request.body, b"{\"id\":1}X");
}

#[test]
fn test_decode_accepts_bare_lf() {
    let request = decode_request(b"DELETE /product/3 HTTP/1.0\nX-A: b\n\n").unwrap();

    assert_eq!(request.method, "DELETE");
    assert_eq!(request.minor_version, 0);
    assert_eq!(request.header("x-a"), Some("b"));
}

#[test]
fn test_decode_chunked_body() {
    let raw = b"PATCH /product/1 HTTP/1.1\r\n\
Transfer-Encoding: chunked\r\n\r\n\
5;ext=1\r\n{\"nam\r\n\
9\r\ne\":\"Bob\"}\r\n\
0\r\nX-Trailer: t\r\n\r\n";
    let request = decode_request(raw).unwrap();

    assert_eq!(request.body, b"{\"name\":\"Bob\"}");
}

#[test]
fn test_read_request_reads_pipelined_requests() {
    let raw = b"GET /product HTTP/1.1\r\n\r\nGET /product/2 HTTP/1.1\r\n\r\n".to_vec();
    let mut reader = BufReader::new(Cursor::new(raw));

    assert_eq!(read_request(&mut reader).unwrap().target, "/product");
    assert_eq!(read_request(&mut reader).unwrap().target, "/product/2");

    match read_request(&mut reader) {
        Err(ProductError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("Expected EOF, got {:?}", other),
    }
}

#[test]
fn test_keep_alive_rules() {
    let close = decode_request(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n").unwrap();
    let default_11 = decode_request(b"GET / HTTP/1.1\r\n\r\n").unwrap();
    let default_10 = decode_request(b"GET / HTTP/1.0\r\n\r\n").unwrap();
    let keep_10 = decode_request(b"GET / HTTP/1.0\r\nConnection: Keep-Alive\r\n\r\n").unwrap();

    assert!(!close.keep_alive());
    assert!(default_11.keep_alive());
    assert!(!default_10.keep_alive());
    assert!(keep_10.keep_alive());
}

// =============================================================================
// Malformed Request Tests
// =============================================================================

#[test]
fn test_malformed_request_line() {
    for raw in [
        &b"GARBAGE\r\n\r\n"[..],
        &b"GET /product\r\n\r\n"[..],
        &b"GET /product HTTP/2.0\r\n\r\n"[..],
        &b"GET product HTTP/1.1\r\n\r\n"[..],
    ] {
        assert!(
            matches!(decode_request(raw), Err(ProductError::Protocol(_))),
            "accepted {:?}",
            String::from_utf8_lossy(raw)
        );
    }
}

#[test]
fn test_malformed_headers() {
    assert!(matches!(
        decode_request(b"GET / HTTP/1.1\r\nNoColon\r\n\r\n"),
        Err(ProductError::Protocol(_))
    ));
    assert!(matches!(
        decode_request(b"GET / HTTP/1.1\r\nContent-Length: ten\r\n\r\n"),
        Err(ProductError::Protocol(_))
    ));
}

#[test]
fn test_bad_chunk_size() {
    let raw = b"POST /product HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n";

    assert!(matches!(decode_request(raw), Err(ProductError::Protocol(_))));
}

#[test]
fn test_oversized_body_is_rejected_before_reading() {
    let raw = format!(
        "POST /product HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        MAX_BODY_SIZE + 1
    );

    match decode_request(raw.as_bytes()) {
        Err(ProductError::PayloadTooLarge { size, max }) => {
            assert_eq!(size, MAX_BODY_SIZE + 1);
            assert_eq!(max, MAX_BODY_SIZE);
        }
        other => panic!("Expected PayloadTooLarge, got {:?}", other),
    }
}

#[test]
fn test_truncated_body_is_eof() {
    let raw = b"POST /product HTTP/1.1\r\nContent-Length: 50\r\n\r\n{}";

    assert!(matches!(decode_request(raw), Err(ProductError::Io(_))));
}

// =============================================================================
// Response Encoding Tests
// =============================================================================

#[test]
fn test_encode_text_response() {
    let encoded = encode_response(&Response::updated(), false);

    assert_eq!(
        String::from_utf8(encoded).unwrap(),
        "HTTP/1.1 200 OK\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
Content-Length: 15\r\n\
Connection: close\r\n\r\n\
Product Updated"
    );
}

#[test]
fn test_encode_created_has_location_and_empty_body() {
    let encoded = String::from_utf8(encode_response(&Response::created("/product/5"), true)).unwrap();

    assert!(encoded.starts_with("HTTP/1.1 201 Created\r\n"));
    assert!(encoded.contains("Location: /product/5\r\n"));
    assert!(encoded.contains("Content-Length: 0\r\n"));
    assert!(encoded.contains("Connection: keep-alive\r\n"));
    assert!(encoded.ends_with("\r\n\r\n"));
}

#[test]
fn test_error_responses() {
    let cases = [
        (ProductError::Validation, 400, "Bad Request: Missing required fields (id, name, description)"),
        (ProductError::NotFound("1".into()), 404, "Product Not Found"),
        (ProductError::RouteNotFound("GET /x".into()), 404, "Not Found"),
        (
            ProductError::MethodNotAllowed { method: "POST".into(), path: "/product/1".into() },
            405,
            "Method Not Allowed",
        ),
        (ProductError::StoreParse("bad".into()), 500, "Internal Server Error"),
        (ProductError::BodyParse("bad".into()), 500, "Internal Server Error"),
    ];

    for (err, status, body) in cases {
        let response = Response::from_error(&err);
        assert_eq!(response.status, status);
        assert_eq!(response.status, err.status());
        assert_eq!(response.body, body.as_bytes());
    }
}
