//! HTTP Server
//!
//! Accepts connections and gives each one its own handler thread, up to
//! `max_connections` open at once.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::sync::WaitGroup;

use crate::config::Config;
use crate::error::{ProductError, Result};
use crate::service::ProductService;
use crate::store::Store;
use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Cloneable handle that stops a running server
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the server to stop accepting and drain open connections
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Slot in the open-connection count, released on drop
struct ConnectionPermit {
    active: Arc<AtomicUsize>,
}

impl ConnectionPermit {
    /// Take a slot unless `limit` connections are already open
    fn acquire(active: &Arc<AtomicUsize>, limit: usize) -> Option<Self> {
        active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |open| {
                (open < limit).then_some(open + 1)
            })
            .ok()
            .map(|_| Self {
                active: Arc::clone(active),
            })
    }
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}

/// HTTP server for productd
pub struct Server<S: Store + 'static> {
    config: Config,
    service: Arc<ProductService<S>>,
    listener: Option<TcpListener>,
    shutdown: ShutdownHandle,

    /// Connections currently being served
    active: Arc<AtomicUsize>,
}

impl<S: Store + 'static> Server<S> {
    /// Create a new server with the given config and service
    pub fn new(config: Config, service: Arc<ProductService<S>>) -> Self {
        Self {
            config,
            service,
            listener: None,
            shutdown: ShutdownHandle {
                flag: Arc::new(AtomicBool::new(false)),
            },
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Bind the listen address now (idempotent)
    ///
    /// Returns the bound address, which resolves port 0.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        if let Some(listener) = &self.listener {
            return Ok(listener.local_addr()?);
        }

        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            ProductError::Config(format!("cannot bind {}: {}", self.config.listen_addr, e))
        })?;

        // Non-blocking so the accept loop can observe shutdown
        listener.set_nonblocking(true)?;

        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Bound address, if bound
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Number of connections currently open
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Start the server (blocking until shutdown)
    ///
    /// On shutdown, waits for open connections to finish. Idle keep-alive
    /// clients are released by the read timeout.
    pub fn run(&mut self) -> Result<()> {
        if self.config.max_connections == 0 {
            return Err(ProductError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }

        let addr = self.bind()?;
        tracing::info!(
            "Listening on http://{} (max {} connections)",
            addr,
            self.config.max_connections
        );

        let in_flight = WaitGroup::new();
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| ProductError::Config("listener not bound".to_string()))?;

        while !self.shutdown.is_shutdown() {
            match listener.accept() {
                Ok((stream, peer)) => {
                    tracing::trace!("Accepted connection from {}", peer);

                    // Over the cap: close without reading
                    let Some(permit) =
                        ConnectionPermit::acquire(&self.active, self.config.max_connections)
                    else {
                        tracing::warn!(
                            "Refusing {}: {} connections already open",
                            peer,
                            self.config.max_connections
                        );
                        continue;
                    };

                    // Accepted sockets may inherit non-blocking mode on some platforms
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", peer, e);
                        continue;
                    }

                    if let Err(e) = self.spawn_connection(stream, permit, in_flight.clone()) {
                        tracing::warn!("Failed to spawn handler for {}: {}", peer, e);
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        tracing::info!(
            "Shutting down; waiting for {} open connections",
            self.active_connections()
        );
        in_flight.wait();

        self.listener = None;
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    /// Serve one connection on its own thread
    fn spawn_connection(
        &self,
        stream: TcpStream,
        permit: ConnectionPermit,
        in_flight: WaitGroup,
    ) -> Result<()> {
        let service = Arc::clone(&self.service);
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        thread::Builder::new()
            .name("productd-conn".to_string())
            .spawn(move || {
                // Both are released when the handler returns
                let _permit = permit;
                let _in_flight = in_flight;

                let mut connection = match Connection::new(stream, service) {
                    Ok(connection) => connection,
                    Err(e) => {
                        tracing::warn!("Failed to set up connection: {}", e);
                        return;
                    }
                };

                if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
                    tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
                    return;
                }

                if let Err(e) = connection.handle() {
                    tracing::debug!("Connection {} ended with error: {}", connection.peer_addr(), e);
                }
            })?;

        Ok(())
    }
}
