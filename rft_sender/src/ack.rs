use std::sync::Arc;
use std::time::Instant;

use rft_core::config::{FAST_RETRANSMIT_DUP_ACKS, TIMEOUT};
use rft_core::packet::{AckPacket, DataPacket};
use tracing::{debug, info};

use crate::retransmission::check_timeouts;
use crate::state::SenderEngine;

/// Blocks on the datagram socket for ACKs, driving the congestion
/// controller and retransmission engine. The socket read timeout also
/// serves as the periodic timeout-scan wakeup (spec.md §4.3, §5).
pub async fn run(engine: Arc<SenderEngine>) {
    let mut buf = [0u8; 64];
    loop {
        match tokio::time::timeout(TIMEOUT, engine.socket.recv_from(&mut buf)).await {
            Ok(Ok((n, _addr))) => {
                if let Some(ack) = AckPacket::from_bytes(&buf[..n]) {
                    handle_ack(&engine, ack.ack_num).await;
                }
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "ack socket error");
            }
            Err(_elapsed) => {
                check_timeouts(&engine).await;
            }
        }
    }
}

async fn handle_ack(engine: &SenderEngine, ack_num: u32) {
    let fast_retransmit_seq = {
        let mut state = engine.state.lock().unwrap();

        if state.last_ack_received == Some(ack_num) {
            state.duplicate_ack_count += 1;
            debug!(ack_num, dups = state.duplicate_ack_count, "duplicate ack");
            if state.duplicate_ack_count == FAST_RETRANSMIT_DUP_ACKS {
                // Only react if a segment at this offset actually exists.
                // A duplicated final ACK during the completion grace window
                // has no matching segment and must not be treated as a loss.
                if engine.seq_index.contains_key(&ack_num) {
                    state.duplicate_ack_count = 0;
                    state.congestion.on_fast_retransmit();
                    if let Some(entry) = state.unacked.get_mut(&ack_num) {
                        entry.last_send_time = Instant::now();
                        entry.retransmit_count += 1;
                    }
                    let elapsed = engine.elapsed();
                    state.metrics.record_fast_retransmission(elapsed);
                    Some(ack_num)
                } else {
                    None
                }
            } else {
                None
            }
        } else if state.last_ack_received.is_none() || ack_num > state.last_ack_received.unwrap() {
            state.duplicate_ack_count = 0;
            state.last_ack_received = Some(ack_num);

            let now = Instant::now();
            let newly_acked: Vec<u32> = state
                .unacked
                .keys()
                .copied()
                .filter(|&seq| {
                    let len = engine
                        .seq_index
                        .get(&seq)
                        .map(|&i| engine.segments[i].payload.len() as u32)
                        .unwrap_or(0);
                    seq + len <= ack_num
                })
                .collect();

            for seq in &newly_acked {
                if let Some(entry) = state.unacked.remove(seq) {
                    let rtt = now.duration_since(entry.last_send_time).as_secs_f64();
                    state.record_rtt_sample(rtt);
                }
            }

            let k = newly_acked.len() as u32;
            if k > 0 {
                state.congestion.on_new_ack(k);
            }
            let elapsed = engine.elapsed();
            let srtt = state.srtt;
            let cwnd = state.congestion.cwnd();
            state.metrics.record_cwnd_sample(elapsed, srtt, cwnd);
            info!(ack_num, newly_acked = k, cwnd, "new ack");
            None
        } else {
            // Stale ACK, strictly less than last_ack_received: ignored.
            debug!(ack_num, "stale ack ignored");
            None
        }
    };

    if let Some(seq) = fast_retransmit_seq {
        if let Some(&idx) = engine.seq_index.get(&seq) {
            let segment = &engine.segments[idx];
            let packet = DataPacket::new(segment.seq, segment.payload.clone());
            let bytes = packet.to_bytes();
            if let Err(err) = engine.socket.send_to(&bytes, engine.target).await {
                tracing::warn!(seq, error = %err, "fast retransmit failed");
            } else {
                info!(seq, "fast retransmit");
            }
        }
    }
}
