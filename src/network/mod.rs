//! Network Module
//!
//! HTTP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking listener, polls for shutdown)
//! - One handler thread per connection, capped by `max_connections`
//! - Requests routed through `ProductService`

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
