//! Minimal demo client: connect, ping, print daemon info, disconnect.
//!
//! ```text
//! warden-ping /tmp/warden.sock
//! ```

use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use warden_client::{CallOptions, Client};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let socket_path = match env::args().nth(1).or_else(|| env::var("WARDEN_SOCKET").ok()) {
        Some(path) => path,
        None => {
            eprintln!("usage: warden-ping <socket-path>");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(time = %chrono::Utc::now().to_rfc3339(), %socket_path, "connecting");

    let client = match Client::connect(&socket_path) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to connect: {e}");
            return ExitCode::FAILURE;
        }
    };

    let opts = CallOptions::default();
    match client.ping(&opts) {
        Ok(true) => println!("PONG"),
        Ok(false) => unreachable!("ping never returns Ok(false)"),
        Err(e) => {
            eprintln!("ping failed: {e}");
            return ExitCode::FAILURE;
        }
    }

    match client.info(&opts) {
        Ok(info) => println!("daemon version: {}", info.version),
        Err(e) => eprintln!("info failed: {e}"),
    }

    client.close();
    ExitCode::SUCCESS
}
