use rft_core::congestion::{CongestionController, Phase};
use rft_core::segment::segment_file;

/// Scenario 1 (spec.md §8): a 3072-byte file produces three 1024-byte
/// segments at the expected offsets, and a lossless run of cumulative ACKs
/// grows cwnd monotonically through slow start without triggering a fast
/// retransmit or timeout reaction.
#[test]
fn three_segment_file_and_monotonic_cwnd_growth() {
    let data = vec![0u8; 3072];
    let segments = segment_file(&data).unwrap();
    let seqs: Vec<u32> = segments.iter().map(|s| s.seq).collect();
    assert_eq!(seqs, vec![0, 1024, 2048]);

    let mut cc = CongestionController::new();
    let mut history = vec![cc.cwnd()];
    // One cumulative ACK per segment, as if each arrived in its own round.
    for _ in 0..segments.len() {
        cc.on_new_ack(1);
        history.push(cc.cwnd());
    }

    assert!(history.windows(2).all(|w| w[1] >= w[0]), "{history:?}");
    assert_eq!(cc.phase(), Phase::SlowStart);
}

/// Scenario 2 (spec.md §8): three duplicate ACKs on the same offset trigger
/// a fast retransmit, halve ssthresh, and move the controller into
/// congestion avoidance — without ever going through a timeout.
#[test]
fn three_duplicate_acks_trigger_fast_retransmit_reaction() {
    let mut cc = CongestionController::new();
    for _ in 0..5 {
        cc.on_new_ack(1);
    }
    let cwnd_before_loss = cc.cwnd();

    // Three duplicate ACKs observed by the caller; on the third, the caller
    // invokes the fast-retransmit reaction exactly once.
    cc.on_fast_retransmit();

    assert_eq!(cc.ssthresh(), std::cmp::max(cwnd_before_loss / 2, 2));
    assert_eq!(cc.cwnd(), cc.ssthresh() + 3);
    assert_eq!(cc.phase(), Phase::CongestionAvoidance);
}
