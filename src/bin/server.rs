//! SortedKV Server Binary
//!
//! Starts the TCP server for SortedKV.

use std::sync::Arc;

use clap::Parser;
use sortedkv::network::Server;
use sortedkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// SortedKV Server
#[derive(Parser, Debug)]
#[command(name = "sortedkv-server")]
#[command(about = "Sorted hash table served over TCP")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:6380")]
    listen: String,

    /// Number of hash buckets (fixed for the lifetime of the server)
    #[arg(short, long, default_value = "1024")]
    capacity: usize,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sortedkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("SortedKV Server v{}", sortedkv::VERSION);
    tracing::info!("Listen address: {}", args.listen);
    tracing::info!("Bucket count: {}", args.capacity);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .capacity(args.capacity)
        .max_connections(args.max_connections)
        .build();

    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, Arc::clone(&engine)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    // Ctrl+C stops the accept loop; run() then closes open connections
    let handle = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        handle.shutdown();
    }) {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
    drop(server);

    match Arc::try_unwrap(engine) {
        Ok(engine) => {
            let released = engine.close();
            tracing::info!("Released {} records", released);
        }
        Err(_) => tracing::warn!("Engine still shared at exit; skipping close"),
    }

    tracing::info!("Server stopped");
}
