use core::fmt;

/// Mailbox errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MboxError {
    /// Operation attempted before a successful `init`.
    NotInitialized,
    /// A message is already in flight.
    Busy,
    /// `init` was already run.
    AlreadyInitialized,
    /// The LPC bus is absent or reported unhealthy.
    TransportUnavailable,
    /// Platform configuration lacks what the mailbox needs.
    ConfigurationMissing,
    /// A response was registered but no message is known in flight.
    ProtocolViolation,
    /// Attention flags this driver does not know.
    UnrecognizedAttentionFlags(u8),
    /// The response does not carry the in-flight sequence number.
    SequenceMismatch { expected: u8, found: u8 },
    /// The BMC did not respond within the configured timeout.
    Timeout,
}

impl fmt::Display for MboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MboxError::NotInitialized => write!(f, "mailbox used before init"),
            MboxError::Busy => write!(f, "message already in flight"),
            MboxError::AlreadyInitialized => write!(f, "mailbox already initialized"),
            MboxError::TransportUnavailable => write!(f, "LPC bus unavailable"),
            MboxError::ConfigurationMissing => write!(f, "mailbox configuration missing"),
            MboxError::ProtocolViolation => write!(f, "response with no message in flight"),
            MboxError::UnrecognizedAttentionFlags(flags) => {
                write!(f, "unrecognized attention flags {flags:#04x}")
            }
            MboxError::SequenceMismatch { expected, found } => write!(
                f,
                "response sequence {found:#04x} does not match in-flight {expected:#04x}"
            ),
            MboxError::Timeout => write!(f, "no response from BMC"),
        }
    }
}
