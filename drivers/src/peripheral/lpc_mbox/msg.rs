//! Mailbox message record and its register codec.

use super::regs::{BMC_MBOX_DATA_REGS, MBOX_FLAG_REG};

/// One mailbox message: exactly `N` opaque bytes, one per data register.
///
/// Byte 0 is the sequence number. The driver never interprets the rest.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BmcMboxMsg<const N: usize = BMC_MBOX_DATA_REGS> {
    bytes: [u8; N],
}

impl<const N: usize> BmcMboxMsg<N> {
    /// Message width in bytes (and data registers).
    pub const WIDTH: usize = N;

    /// An all-zero message.
    pub const fn new() -> Self {
        Self::from_bytes([0; N])
    }

    /// Wrap raw message bytes.
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        const {
            assert!(
                N > 0 && N <= MBOX_FLAG_REG as usize,
                "message must fit in the data registers"
            )
        };
        Self { bytes }
    }

    /// Sequence number (byte 0).
    pub const fn seq(&self) -> u8 {
        self.bytes[0]
    }

    pub fn set_seq(&mut self, seq: u8) {
        self.bytes[0] = seq;
    }

    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.bytes
    }

    /// Register image of this message: byte `i` goes to data register `i`.
    pub const fn encode(&self) -> [u8; N] {
        self.bytes
    }

    /// Rebuild a message from a register image.
    pub const fn decode(regs: [u8; N]) -> Self {
        Self::from_bytes(regs)
    }
}

impl<const N: usize> Default for BmcMboxMsg<N> {
    fn default() -> Self {
        Self::new()
    }
}
