//! Runs a Noughts server until Ctrl-C.
//!
//! ```text
//! noughts-server [--config server.json] [--bind 0.0.0.0:9999]
//! ```
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use noughts::{NoughtsError, NoughtsServer, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file. Missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, overriding the config file.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    match serve(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn serve(args: Args) -> Result<(), NoughtsError> {
    let config = match &args.config {
        Some(path) => ServerConfig::from_json_file(path)?,
        None => ServerConfig::default(),
    };

    let mut builder = NoughtsServer::builder().config(config);
    if let Some(addr) = &args.bind {
        builder = builder.bind(addr);
    }

    builder.build().await?.run().await
}
