use std::time::Duration;

/// Maximum payload bytes carried by a single data segment.
pub const MAX_PAYLOAD: usize = 1024;

/// Initial slow-start threshold, in segments.
pub const INITIAL_SSTHRESH: u32 = 64;

/// Floor below which `ssthresh` may never drop.
pub const MIN_SSTHRESH: u32 = 2;

/// Fixed retransmission timeout. Not RTT-derived by design (spec.md §4.3).
pub const TIMEOUT: Duration = Duration::from_millis(500);

/// Delay the receiver waits before emitting a coalesced cumulative ACK.
pub const RTT_DELAY: Duration = Duration::from_millis(100);

/// Number of duplicate ACKs that trigger a fast retransmit.
pub const FAST_RETRANSMIT_DUP_ACKS: u32 = 3;

/// Sender poll interval used by the window pump when the window is closed.
pub const PUMP_IDLE_INTERVAL: Duration = Duration::from_millis(10);

/// Grace period the sender waits after `unacked` drains, to catch a final
/// in-flight ACK before declaring the transfer complete.
pub const SEND_COMPLETE_GRACE: Duration = Duration::from_secs(1);

/// How long the receiver will wait for a next datagram, after delivering at
/// least one segment, before declaring the session over by quiescence.
pub const RECEIVER_QUIESCENCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Socket read timeout the receiver uses as its maintenance-tick wakeup.
pub const RECEIVER_SOCKET_TIMEOUT: Duration = Duration::from_secs(2);

/// Default loss probability (percent) for the receiver's loss injector.
pub const DEFAULT_LOSS_PERCENT: u32 = 10;

/// Default transport port.
pub const DEFAULT_PORT: u16 = 8888;

/// Default transport host.
pub const DEFAULT_HOST: &str = "localhost";

/// Fixed path the receiver writes the reassembled byte stream to.
pub const OUTPUT_FILE: &str = "received.txt";
