//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{ProductError, Result};
use crate::protocol::{read_request, write_response, Request, Response};
use crate::router;
use crate::service::{ProductService, Reply};
use crate::store::Store;

/// Handles a single client connection
pub struct Connection<S: Store> {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Product operations
    service: Arc<ProductService<S>>,

    /// Peer address for logging
    peer_addr: String,
}

impl<S: Store> Connection<S> {
    /// Create a new connection handler
    ///
    /// Splits the stream into buffered read and write halves
    pub fn new(stream: TcpStream, service: Arc<ProductService<S>>) -> Result<Self> {
        // Get peer address for logging before the stream is split
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm; responses are small and written whole
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            service,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves a direction unbounded)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Serves requests until the client disconnects, asks to close, idles
    /// past the read timeout, or sends something unparseable.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            // Read next request
            let request = match read_request(&mut self.reader) {
                Ok(request) => request,
                Err(ProductError::Io(ref e)) if is_disconnect(e.kind()) => {
                    // Peer closed or idled past the read timeout
                    tracing::debug!("Client {} disconnected ({:?})", self.peer_addr, e.kind());
                    return Ok(());
                }
                Err(e @ (ProductError::Protocol(_) | ProductError::PayloadTooLarge { .. })) => {
                    tracing::warn!("Bad request from {}: {}", self.peer_addr, e);
                    // Framing is lost, so answer once and close
                    let _ = self.send_response(&Response::from_error(&e), false);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            // Execute request
            let keep_alive = request.keep_alive();
            let response = self.dispatch(&request);

            // Send response
            if let Err(e) = self.send_response(&response, keep_alive) {
                // Peer hung up before reading the reply: not a server error
                if let ProductError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) || io_err.kind() == ErrorKind::BrokenPipe {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }

            // Client asked to close (or spoke HTTP/1.0 without keep-alive)
            if !keep_alive {
                tracing::trace!("Closing connection to {}", self.peer_addr);
                return Ok(());
            }
        }
    }

    /// Route a request, run it, and build the response
    fn dispatch(&self, request: &Request) -> Response {
        let started = Instant::now();

        // A failure at any step becomes its status response
        let response = match router::route(&request.method, &request.target)
            .and_then(|route| self.service.execute(route, &request.body))
            .and_then(reply_to_response)
        {
            Ok(response) => response,
            Err(e) => {
                // Client errors are expected traffic; only log server faults
                if e.is_internal() {
                    tracing::warn!(
                        "{} {} from {} failed: {}",
                        request.method,
                        request.target,
                        self.peer_addr,
                        e
                    );
                }
                Response::from_error(&e)
            }
        };

        tracing::info!(
            method = %request.method,
            target = %request.target,
            status = response.status,
            elapsed_us = started.elapsed().as_micros() as u64,
            "request"
        );

        response
    }

    /// Send a response to the client
    fn send_response(&mut self, response: &Response, keep_alive: bool) -> Result<()> {
        write_response(&mut self.writer, response, keep_alive)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Translate a service outcome into a response
fn reply_to_response(reply: Reply) -> Result<Response> {
    let response = match reply {
        Reply::Collection(collection) => Response::json(to_json(&collection)?),
        Reply::Record(record) => Response::json(to_json(&record)?),
        Reply::Created { location } => Response::created(&location),
        Reply::Updated => Response::updated(),
        Reply::Deleted => Response::no_content(),
    };
    Ok(response)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ProductError::Io(e.into()))
}

/// Errors that mean the peer went away or idled out
fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
    )
}
