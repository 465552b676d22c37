use rft_core::packet::DataPacket;

use crate::state::ReceiverState;

/// What the caller should do about an ACK after processing one packet
/// (spec.md §4.6, §4.7).
#[derive(Debug, PartialEq, Eq)]
pub enum AckAction {
    /// Checksum failed, or the packet duplicated an already-buffered
    /// out-of-order entry: no ACK at all.
    None,
    /// Duplicate of already-delivered data: send an immediate ACK carrying
    /// this value, bypassing the delayed-ACK timer.
    Immediate(u32),
    /// New data accepted (in order or buffered out of order): arm the
    /// delayed-ACK timer if it isn't already armed.
    ArmTimer,
}

/// Validates and reassembles one accepted (post-loss-injection) packet.
pub fn process_packet(state: &mut ReceiverState, packet: &DataPacket) -> AckAction {
    state.total_packets_received += 1;

    if !packet.is_valid() {
        state.total_checksum_errors += 1;
        return AckAction::None;
    }

    if packet.seq < state.expected_seq {
        return AckAction::Immediate(state.expected_seq);
    }

    if packet.seq == state.expected_seq {
        state.deliver_in_order(packet.payload.clone());
        return AckAction::ArmTimer;
    }

    // seq > expected_seq: out-of-order arrival, doesn't advance expected_seq.
    if !state.out_of_order.contains_key(&packet.seq) {
        state.out_of_order.insert(packet.seq, packet.payload.clone());
        AckAction::ArmTimer
    } else {
        // Already buffered: silently dropped, but a pending timer still fires.
        AckAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkt(seq: u32, payload: &[u8]) -> DataPacket {
        DataPacket::new(seq, payload.to_vec())
    }

    #[test]
    fn checksum_failure_yields_no_ack() {
        let mut state = ReceiverState::new();
        let mut packet = pkt(0, b"hello");
        packet.payload[0] ^= 0xFF;
        assert_eq!(process_packet(&mut state, &packet), AckAction::None);
        assert_eq!(state.total_checksum_errors, 1);
        assert_eq!(state.expected_seq, 0);
    }

    #[test]
    fn in_order_packet_advances_expected_seq() {
        let mut state = ReceiverState::new();
        let action = process_packet(&mut state, &pkt(0, b"hello"));
        assert_eq!(action, AckAction::ArmTimer);
        assert_eq!(state.expected_seq, 5);
        assert_eq!(state.delivered, b"hello");
    }

    #[test]
    fn out_of_order_packet_is_buffered_without_advancing() {
        let mut state = ReceiverState::new();
        let action = process_packet(&mut state, &pkt(5, b"world"));
        assert_eq!(action, AckAction::ArmTimer);
        assert_eq!(state.expected_seq, 0);
        assert!(state.out_of_order.contains_key(&5));
    }

    #[test]
    fn gap_fill_drains_buffered_segments_in_order() {
        let mut state = ReceiverState::new();
        process_packet(&mut state, &pkt(5, b"world"));
        process_packet(&mut state, &pkt(0, b"hello"));
        assert_eq!(state.expected_seq, 10);
        assert_eq!(state.delivered, b"helloworld");
        assert!(state.out_of_order.is_empty());
    }

    #[test]
    fn duplicate_of_delivered_data_sends_immediate_ack() {
        let mut state = ReceiverState::new();
        process_packet(&mut state, &pkt(0, b"hello"));
        let action = process_packet(&mut state, &pkt(0, b"hello"));
        assert_eq!(action, AckAction::Immediate(5));
    }

    #[test]
    fn duplicate_buffered_out_of_order_is_dropped_silently() {
        let mut state = ReceiverState::new();
        process_packet(&mut state, &pkt(5, b"world"));
        let action = process_packet(&mut state, &pkt(5, b"world"));
        assert_eq!(action, AckAction::None);
    }

    #[test]
    fn reassembly_is_order_independent() {
        let mut a = ReceiverState::new();
        process_packet(&mut a, &pkt(0, b"AAAAA"));
        process_packet(&mut a, &pkt(5, b"BBBBB"));
        process_packet(&mut a, &pkt(10, b"CCCCC"));

        let mut b = ReceiverState::new();
        process_packet(&mut b, &pkt(10, b"CCCCC"));
        process_packet(&mut b, &pkt(0, b"AAAAA"));
        process_packet(&mut b, &pkt(5, b"BBBBB"));

        assert_eq!(a.delivered, b.delivered);
    }
}
