mod ack_scheduler;
mod loss_injector;
mod logging;
mod reassembler;
mod state;

use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rft_core::config::{
    DEFAULT_LOSS_PERCENT, DEFAULT_PORT, OUTPUT_FILE, RECEIVER_QUIESCENCE_TIMEOUT,
    RECEIVER_SOCKET_TIMEOUT,
};
use rft_core::packet::DataPacket;
use tokio::net::UdpSocket;

use crate::reassembler::AckAction;
use crate::state::ReceiverState;

/// Receives a file sent by a reliability-protocol sender, simulating
/// datagram loss and delayed cumulative ACKs.
#[derive(Parser, Debug)]
#[command(name = "rft-receiver")]
struct Cli {
    /// Loss probability as a percentage (0..100).
    #[arg(default_value_t = DEFAULT_LOSS_PERCENT)]
    loss_percent: u32,

    /// Address to bind to.
    #[arg(long, default_value_t = format!("0.0.0.0:{DEFAULT_PORT}"))]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let loss_prob = (cli.loss_percent.min(100) as f64) / 100.0;
    let socket = UdpSocket::bind(&cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    tracing::info!(bind = %cli.bind, loss_percent = cli.loss_percent, "receiver listening");

    let socket = Arc::new(socket);
    let state = Arc::new(Mutex::new(ReceiverState::new()));

    let mut buf = [0u8; 2048];
    let mut last_packet_time: Option<Instant> = None;
    let mut delivered_any = false;

    loop {
        match tokio::time::timeout(RECEIVER_SOCKET_TIMEOUT, socket.recv_from(&mut buf)).await {
            Ok(Ok((n, addr))) => {
                last_packet_time = Some(Instant::now());
                handle_datagram(&state, &socket, &buf[..n], addr, loss_prob).await;
                delivered_any = delivered_any || !state.lock().unwrap().delivered.is_empty();
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "recv error");
            }
            Err(_elapsed) => {
                if delivered_any {
                    if let Some(last) = last_packet_time {
                        if last.elapsed() > RECEIVER_QUIESCENCE_TIMEOUT {
                            break;
                        }
                    }
                }
            }
        }
    }

    let state = state.lock().unwrap();
    std::fs::write(OUTPUT_FILE, &state.delivered)
        .with_context(|| format!("failed to write {OUTPUT_FILE}"))?;

    println!("Transfer complete");
    println!("total bytes received: {}", state.delivered.len());
    println!(
        "packets received: {}, dropped: {}, checksum errors: {}",
        state.total_packets_received, state.total_packets_dropped, state.total_checksum_errors
    );

    Ok(())
}

async fn handle_datagram(
    state: &Arc<Mutex<ReceiverState>>,
    socket: &Arc<UdpSocket>,
    datagram: &[u8],
    addr: std::net::SocketAddr,
    loss_prob: f64,
) {
    let Some(packet) = DataPacket::from_bytes(datagram) else {
        return; // truncated datagram, discarded silently
    };

    if loss_injector::should_drop(loss_prob) {
        state.lock().unwrap().total_packets_dropped += 1;
        return;
    }

    let action = {
        let mut guard = state.lock().unwrap();
        if packet.is_valid() && guard.client_addr.is_none() {
            guard.client_addr = Some(addr);
            tracing::info!(%addr, "client connected");
        }
        reassembler::process_packet(&mut guard, &packet)
    };

    match action {
        AckAction::None => {}
        AckAction::Immediate(ack_num) => {
            if let Err(err) = ack_scheduler::send_immediate(socket, addr, ack_num).await {
                tracing::warn!(error = %err, "immediate ack send failed");
            }
        }
        AckAction::ArmTimer => {
            ack_scheduler::arm_if_needed(state, socket);
        }
    }
}
