use std::sync::{Arc, Mutex};

use rft_core::config::RTT_DELAY;
use rft_core::packet::AckPacket;
use tokio::net::UdpSocket;

use crate::state::ReceiverState;

/// Arms the single-shot delayed-ACK timer if it isn't already armed.
/// Re-arming while one is pending is a no-op (spec.md §4.7).
pub fn arm_if_needed(state: &Arc<Mutex<ReceiverState>>, socket: &Arc<UdpSocket>) {
    let mut guard = state.lock().unwrap();
    if guard.ack_timer_armed {
        return;
    }
    guard.ack_timer_armed = true;
    drop(guard);

    let state = Arc::clone(state);
    let socket = Arc::clone(socket);
    tokio::spawn(async move {
        tokio::time::sleep(RTT_DELAY).await;

        let (addr, ack_num) = {
            let mut guard = state.lock().unwrap();
            if !guard.ack_timer_armed {
                return;
            }
            guard.ack_timer_armed = false;
            (guard.client_addr, guard.expected_seq)
        };

        if let Some(addr) = addr {
            let ack = AckPacket::new(ack_num);
            if let Err(err) = socket.send_to(&ack.to_bytes(), addr).await {
                tracing::warn!(error = %err, "delayed ack send failed");
            } else {
                tracing::debug!(ack_num, %addr, "delayed ack sent");
            }
        }
    });
}

/// Sends an immediate ACK (spec.md §4.6 step 2), bypassing the delayed
/// timer entirely.
pub async fn send_immediate(
    socket: &UdpSocket,
    addr: std::net::SocketAddr,
    ack_num: u32,
) -> std::io::Result<()> {
    let ack = AckPacket::new(ack_num);
    socket.send_to(&ack.to_bytes(), addr).await?;
    Ok(())
}
