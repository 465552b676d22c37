use std::sync::Arc;
use std::time::Instant;

use rft_core::config::{PUMP_IDLE_INTERVAL, SEND_COMPLETE_GRACE};
use rft_core::packet::DataPacket;
use tracing::debug;

use crate::state::{SenderEngine, UnackedEntry};

/// Admits new segments into flight as `cwnd` allows, and drives the send
/// loop until every segment has been sent at least once and `unacked` has
/// drained (spec.md §4.4).
pub async fn run(engine: Arc<SenderEngine>) {
    loop {
        let next_send = {
            let mut state = engine.state.lock().unwrap();
            let window_open = state.unacked.len() < state.congestion.cwnd() as usize;
            if window_open && state.next_seq_to_send < engine.segments.len() {
                let idx = state.next_seq_to_send;
                let segment = &engine.segments[idx];
                state.unacked.insert(
                    segment.seq,
                    UnackedEntry {
                        last_send_time: Instant::now(),
                        retransmit_count: 0,
                    },
                );
                state.next_seq_to_send += 1;
                Some(DataPacket::new(segment.seq, segment.payload.clone()))
            } else {
                None
            }
        };

        match next_send {
            Some(packet) => {
                let bytes = packet.to_bytes();
                if let Err(err) = engine.socket.send_to(&bytes, engine.target).await {
                    tracing::warn!(seq = packet.seq, error = %err, "send failed");
                } else {
                    debug!(seq = packet.seq, len = packet.payload.len(), "sent segment");
                }
            }
            None => {
                let done = {
                    let state = engine.state.lock().unwrap();
                    state.next_seq_to_send >= engine.segments.len() && state.unacked.is_empty()
                };
                if done {
                    break;
                }
                tokio::time::sleep(PUMP_IDLE_INTERVAL).await;
            }
        }
    }

    // Grace pause to accommodate any final in-flight ACK.
    tokio::time::sleep(SEND_COMPLETE_GRACE).await;
}
