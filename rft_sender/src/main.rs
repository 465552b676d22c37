mod ack;
mod logging;
mod pump;
mod retransmission;
mod state;

use std::net::ToSocketAddrs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rft_core::config::DEFAULT_PORT;
use rft_core::segment::segment_file;
use tokio::net::UdpSocket;

use crate::state::SenderEngine;

/// Sends a file to a receiver over an unreliable-datagram reliability
/// protocol, with congestion-controlled windowing and retransmission.
#[derive(Parser, Debug)]
#[command(name = "rft-sender")]
struct Cli {
    /// Path of the file to send.
    filename: String,

    /// Receiver host.
    #[arg(default_value = "localhost")]
    host: String,

    /// Receiver port.
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::error!(error = %err, "transfer failed");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data = std::fs::read(&cli.filename)
        .with_context(|| format!("failed to read {}", cli.filename))?;
    let segments = segment_file(&data)?;
    tracing::info!(
        bytes = data.len(),
        segments = segments.len(),
        "file read"
    );

    let target = format!("{}:{}", cli.host, cli.port)
        .to_socket_addrs()
        .with_context(|| format!("invalid address {}:{}", cli.host, cli.port))?
        .next()
        .context("address resolved to no candidates")?;

    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .context("failed to bind local socket")?;
    let engine = Arc::new(SenderEngine::new(segments, Arc::new(socket), target));

    let ack_engine = Arc::clone(&engine);
    let ack_task = tokio::spawn(async move { ack::run(ack_engine).await });

    pump::run(Arc::clone(&engine)).await;
    ack_task.abort();

    let (total_retrans, timeout_retrans, fast_retrans) = {
        let state = engine.state.lock().unwrap();
        (
            state.metrics.total_retransmissions(),
            state.metrics.timeout_retransmissions,
            state.metrics.fast_retransmissions,
        )
    };

    println!("Transfer complete");
    println!(
        "retransmissions: {total_retrans} (timeout: {timeout_retrans}, fast: {fast_retrans})"
    );

    let loss_suffix = std::env::var("LOSS_PERCENT").unwrap_or_else(|_| "10".to_string());
    let prefix = format!("metrics_loss_{loss_suffix}");
    {
        let state = engine.state.lock().unwrap();
        state
            .metrics
            .save(&prefix)
            .context("failed to write metrics")?;
    }

    Ok(())
}
