//! Run-time mailbox configuration.

/// Poll period while completion interrupts are unconfirmed.
pub const MBOX_DEFAULT_POLL_MS: u32 = 200;

/// Mailbox driver configuration.
///
/// The default reproduces the plain protocol: timed polling until the first
/// interrupt, no response timeout, sequence numbers carried but unchecked.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MboxConfig {
    /// Poll period in milliseconds while in polling mode.
    pub poll_interval_ms: u32,
    /// Give up on an in-flight message after this many milliseconds.
    ///
    /// A response the BMC sends after the timeout is not tied to the
    /// reclaimed message: if another message is in flight by then, it gets
    /// that late response. Enable [`match_sequence`](Self::match_sequence)
    /// alongside the timeout to drop such responses.
    pub response_timeout_ms: Option<u32>,
    /// Drop responses whose sequence number differs from the in-flight one.
    pub match_sequence: bool,
}

impl MboxConfig {
    pub const fn new() -> Self {
        Self {
            poll_interval_ms: MBOX_DEFAULT_POLL_MS,
            response_timeout_ms: None,
            match_sequence: false,
        }
    }

    pub const fn with_poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub const fn with_response_timeout_ms(mut self, ms: u32) -> Self {
        self.response_timeout_ms = Some(ms);
        self
    }

    pub const fn with_sequence_matching(mut self, enabled: bool) -> Self {
        self.match_sequence = enabled;
        self
    }

    pub(crate) fn poll_interval_us(&self) -> u32 {
        self.poll_interval_ms.saturating_mul(1000)
    }

    pub(crate) fn response_timeout_us(&self) -> Option<u64> {
        self.response_timeout_ms.map(|ms| u64::from(ms) * 1000)
    }
}

impl Default for MboxConfig {
    fn default() -> Self {
        Self::new()
    }
}
