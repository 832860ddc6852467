//! Provider binary: serves the host over stdin/stdout.

use anyhow::Context;
use ceph_provider::logging::LoggingConfig;
use ceph_provider::{Provider, Server};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::from_env()
        .init()
        .context("failed to initialise logging")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting ceph provider");

    Server::new(Provider::new())
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("host connection failed")
}
