//! # productd
//!
//! A small HTTP resource server exposing CRUD over a product collection
//! persisted as one JSON document:
//! - Whole-collection load/save through a swappable `Store`
//! - Method + path routing onto six product operations
//! - Plain HTTP/1.1 over TCP with a worker thread pool
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server                             │
//! │              (Acceptor + Worker Pool)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Router                                   │
//! │              (method, path) → Route                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  ProductService                              │
//! │          load → change in memory → save                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │     Store     │
//!               │ (JSON file)   │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod store;
pub mod router;
pub mod service;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ProductError, Result};
pub use config::Config;
pub use record::{Collection, Record};
pub use service::{ProductService, Reply};
pub use store::{JsonFileStore, MemoryStore, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of productd
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
