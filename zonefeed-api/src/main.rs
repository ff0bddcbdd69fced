//! Entry point for the zonefeed API server.
#![forbid(unsafe_code)]

use std::net::SocketAddr;

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Zone priority API server.
#[derive(Debug, Parser)]
#[command(name = "zonefeed-api", about = "Serve zone priorities to the map frontend")]
struct Args {
    /// Listen address.
    #[arg(short, long, default_value = "127.0.0.1:5000", env = "ZONEFEED_LISTEN_ADDR")]
    listen: SocketAddr,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Error)]
enum ServeError {
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[expect(clippy::print_stderr, reason = "fatal errors are reported on stderr")]
fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(&args) {
        eprintln!("zonefeed-api: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ServeError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ServeError::Runtime)?;
    runtime.block_on(serve(args.listen))
}

async fn serve(addr: SocketAddr) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    info!(%addr, "listening");
    axum::serve(listener, zonefeed_api::router())
        .await
        .map_err(ServeError::Serve)
}
