/// Fatal, session-ending errors.
///
/// Per spec.md §7, protocol-level conditions (checksum mismatch, loss,
/// duplicates, timeouts) are not errors — they're handled as ordinary
/// control flow and never surface here. Only conditions that make starting
/// or continuing a session impossible do.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid address {0:?}: {1}")]
    InvalidAddress(String, std::net::AddrParseError),

    #[error("segment payload of {0} bytes exceeds maximum of {max}", max = crate::MAX_PAYLOAD)]
    SegmentTooLarge(usize),
}
