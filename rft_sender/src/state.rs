use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use rft_core::congestion::CongestionController;
use rft_core::metrics::Metrics;
use rft_core::segment::Segment;
use tokio::net::UdpSocket;

/// Bookkeeping for one segment that has been sent but not yet cumulatively
/// acknowledged.
#[derive(Debug, Clone)]
pub struct UnackedEntry {
    pub last_send_time: Instant,
    pub retransmit_count: u32,
}

/// All mutable sender state shared between the window pump and the ACK
/// receiver, serialized under a single lock per spec.md §5.
pub struct SenderState {
    pub congestion: CongestionController,
    pub last_ack_received: Option<u32>,
    pub duplicate_ack_count: u32,
    pub unacked: HashMap<u32, UnackedEntry>,
    pub srtt: f64,
    pub next_seq_to_send: usize,
    pub metrics: Metrics,
    rtt_sample_seen: bool,
}

impl SenderState {
    fn new() -> Self {
        Self {
            congestion: CongestionController::new(),
            last_ack_received: None,
            duplicate_ack_count: 0,
            unacked: HashMap::new(),
            srtt: 0.1,
            next_seq_to_send: 0,
            metrics: Metrics::new(),
            rtt_sample_seen: false,
        }
    }

    /// First-sample-replaces-outright EWMA update (spec.md §9).
    pub fn record_rtt_sample(&mut self, sample_secs: f64) {
        if self.rtt_sample_seen {
            self.srtt = 0.875 * self.srtt + 0.125 * sample_secs;
        } else {
            self.srtt = sample_secs;
            self.rtt_sample_seen = true;
        }
    }
}

/// Immutable context plus the shared, lockable state.
pub struct SenderEngine {
    pub segments: Vec<Segment>,
    pub seq_index: HashMap<u32, usize>,
    pub socket: Arc<UdpSocket>,
    pub target: SocketAddr,
    pub start_time: Instant,
    pub state: Mutex<SenderState>,
}

impl SenderEngine {
    pub fn new(segments: Vec<Segment>, socket: Arc<UdpSocket>, target: SocketAddr) -> Self {
        let seq_index = segments
            .iter()
            .enumerate()
            .map(|(i, s)| (s.seq, i))
            .collect();
        Self {
            segments,
            seq_index,
            socket,
            target,
            start_time: Instant::now(),
            state: Mutex::new(SenderState::new()),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}
