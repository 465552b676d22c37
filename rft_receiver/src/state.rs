use std::collections::HashMap;
use std::net::SocketAddr;

/// Reassembly and delayed-ACK state (spec.md §3, §4.6, §4.7).
pub struct ReceiverState {
    pub expected_seq: u32,
    pub out_of_order: HashMap<u32, Vec<u8>>,
    pub delivered: Vec<u8>,
    pub client_addr: Option<SocketAddr>,
    pub ack_timer_armed: bool,

    pub total_packets_received: u64,
    pub total_packets_dropped: u64,
    pub total_checksum_errors: u64,
}

impl ReceiverState {
    pub fn new() -> Self {
        Self {
            expected_seq: 0,
            out_of_order: HashMap::new(),
            delivered: Vec::new(),
            client_addr: None,
            ack_timer_armed: false,
            total_packets_received: 0,
            total_packets_dropped: 0,
            total_checksum_errors: 0,
        }
    }

    /// Appends `payload` at `expected_seq` and drains any buffered segments
    /// that are now contiguous, per spec.md §4.6 step 3.
    pub fn deliver_in_order(&mut self, payload: Vec<u8>) {
        self.expected_seq += payload.len() as u32;
        self.delivered.extend_from_slice(&payload);
        while let Some(buffered) = self.out_of_order.remove(&self.expected_seq) {
            self.expected_seq += buffered.len() as u32;
            self.delivered.extend_from_slice(&buffered);
        }
    }
}

impl Default for ReceiverState {
    fn default() -> Self {
        Self::new()
    }
}
