//! productd Server Binary
//!
//! Starts the HTTP server for productd.

use std::sync::Arc;

use clap::Parser;
use productd::network::Server;
use productd::{Config, ProductService};
use tracing_subscriber::{fmt, EnvFilter};

/// productd Server
#[derive(Parser, Debug)]
#[command(name = "productd-server")]
#[command(about = "HTTP CRUD server over a JSON product file")]
#[command(version)]
struct Args {
    /// JSON data file holding the product collection
    #[arg(short, long, default_value = "product.json")]
    data_file: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Read/write timeout per connection in milliseconds (0 disables)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Create an empty data file at startup if none exists
    #[arg(long)]
    create_if_missing: bool,

    /// Serialize mutating requests inside this process
    #[arg(long)]
    serialize_mutations: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,productd=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("productd server v{}", productd::VERSION);
    tracing::info!("Data file: {}", args.data_file);
    tracing::info!("Listen address: {}", args.listen);
    if !args.serialize_mutations {
        tracing::debug!("Mutations are not serialized; concurrent writers can lose updates");
    }

    let config = Config::builder()
        .data_file(&args.data_file)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .create_if_missing(args.create_if_missing)
        .serialize_mutations(args.serialize_mutations)
        .build();

    let service = match ProductService::open(&config) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            tracing::error!("Failed to open product store: {}", e);
            std::process::exit(1);
        }
    };

    let mut server = Server::new(config, service);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
