//! quill binary: tracing init, store construction, server start.
//!
//! Run with:
//!   RUST_LOG=info cargo run
//!
//! The bind address comes from `QUILL_ADDR` (default `0.0.0.0:3000`).

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use quill::{routes, Db, Server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("QUILL_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_owned());
    let db = Arc::new(Db::new());

    if let Err(e) = Server::bind(&addr).serve(routes(), db).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
