//! LPC mailbox register map.
//!
//! Byte offsets from the mailbox I/O base. Offsets below [`MBOX_FLAG_REG`]
//! are data registers shared by both directions. Status-type bits are
//! write-one-to-clear.

use bitflags::bitflags;

/// Number of data registers carrying a message.
pub const BMC_MBOX_DATA_REGS: usize = 14;

/// Attention action flags written by the BMC.
pub const MBOX_FLAG_REG: u8 = 0x0f;
pub const MBOX_STATUS_0: u8 = 0x10;
/// Carries [`Status::ATTN`].
pub const MBOX_STATUS_1: u8 = 0x11;
pub const MBOX_BMC_CTRL: u8 = 0x12;
pub const MBOX_HOST_CTRL: u8 = 0x13;
pub const MBOX_BMC_INT_EN_0: u8 = 0x14;
pub const MBOX_BMC_INT_EN_1: u8 = 0x15;
pub const MBOX_HOST_INT_EN_0: u8 = 0x16;
pub const MBOX_HOST_INT_EN_1: u8 = 0x17;

bitflags! {
    /// Status register bits.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Status: u8 {
        /// The BMC has something to tell the host. W1C.
        const ATTN = 1 << 7;
    }
}

bitflags! {
    /// BMC/host control register bits.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Ctrl: u8 {
        /// A response was registered for the message just sent. W1C.
        const INT_STATUS = 1 << 7;
        /// Mask the control interrupt.
        const INT_MASK = 1 << 1;
        /// Doorbell: tell the peer a message is ready.
        const INT_SEND = 1 << 0;
    }
}

bitflags! {
    /// Attention actions found in [`MBOX_FLAG_REG`].
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct AttnFlags: u8 {
        /// The BMC has reset.
        const BMC_RESET = 1 << 0;
        /// Reserved by the protocol; not acted upon by this driver.
        const BMC_COMPLETE = 1 << 1;
    }
}
