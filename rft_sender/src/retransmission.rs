use std::time::Instant;

use rft_core::config::TIMEOUT;
use rft_core::packet::DataPacket;
use tracing::warn;

use crate::state::SenderEngine;

/// Scans `unacked` for segments whose retransmission timeout has elapsed,
/// retransmits each, and applies the congestion reaction for a timeout
/// (spec.md §4.3, §4.2).
pub async fn check_timeouts(engine: &SenderEngine) {
    let timed_out: Vec<u32> = {
        let state = engine.state.lock().unwrap();
        let now = Instant::now();
        state
            .unacked
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_send_time) > TIMEOUT)
            .map(|(&seq, _)| seq)
            .collect()
    };

    for seq in timed_out {
        let Some(&idx) = engine.seq_index.get(&seq) else {
            continue;
        };
        let segment = &engine.segments[idx];
        let packet = DataPacket::new(segment.seq, segment.payload.clone());
        let bytes = packet.to_bytes();

        {
            let mut state = engine.state.lock().unwrap();
            if let Some(entry) = state.unacked.get_mut(&seq) {
                entry.last_send_time = Instant::now();
                entry.retransmit_count += 1;
            }
            state.congestion.on_timeout();
            let elapsed = engine.elapsed();
            state.metrics.record_timeout_retransmission(elapsed);
        }

        if let Err(err) = engine.socket.send_to(&bytes, engine.target).await {
            warn!(seq, error = %err, "timeout retransmit failed");
        } else {
            warn!(seq, "timeout: retransmitting");
        }
    }
}
