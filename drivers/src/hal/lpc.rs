//! LPC Bus Hardware Abstraction Layer.
//!
//! Low Pin Count bus access as seen from the host: byte reads and writes at
//! absolute addresses within an address space, plus routing of a serial IRQ
//! line to a client.

use core::fmt;

/// LPC serial IRQ number.
pub type IrqNumber = u32;

/// LPC address spaces, numbered the way firmware configuration encodes them
/// in the first cell of a `reg` property.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum LpcSpace {
    /// Memory cycles.
    Mem = 0,
    /// I/O port cycles.
    Io = 1,
    /// Firmware cycles.
    Fw = 2,
}

impl LpcSpace {
    /// Decode an address-space cell.
    pub fn from_cell(cell: u32) -> Option<Self> {
        match cell {
            0 => Some(LpcSpace::Mem),
            1 => Some(LpcSpace::Io),
            2 => Some(LpcSpace::Fw),
            _ => None,
        }
    }
}

/// LPC bus errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LpcError {
    /// The IRQ number cannot be routed.
    InvalidIrq(IrqNumber),
}

impl fmt::Display for LpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LpcError::InvalidIrq(irq) => write!(f, "LPC IRQ {irq} cannot be routed"),
        }
    }
}

/// Byte-wide access to the LPC I/O space.
///
/// All methods take `&self`: the bus is shared between ordinary code and the
/// interrupt/timer context, so implementations serialize internally.
pub trait LpcBus {
    /// Read one byte from an absolute I/O address.
    fn inb(&self, addr: u32) -> u8;

    /// Write one byte to an absolute I/O address.
    fn outb(&self, val: u8, addr: u32);

    /// Whether an LPC bus exists at all.
    fn is_present(&self) -> bool;

    /// Whether the bus is currently healthy.
    ///
    /// A `false` here is a warning, not a veto: accesses may still succeed.
    fn is_ok(&self) -> bool;

    /// Route serial IRQ `irq` on chip `chip_id` to the caller.
    ///
    /// The platform's interrupt dispatch is then responsible for invoking
    /// the client's handler (for the mailbox,
    /// [`Mailbox::interrupt`](crate::peripheral::lpc_mbox::Mailbox::interrupt))
    /// whenever the line fires.
    fn register_client(&self, chip_id: u32, irq: IrqNumber) -> Result<(), LpcError>;
}

impl<B: LpcBus + ?Sized> LpcBus for &B {
    fn inb(&self, addr: u32) -> u8 {
        (**self).inb(addr)
    }

    fn outb(&self, val: u8, addr: u32) {
        (**self).outb(val, addr)
    }

    fn is_present(&self) -> bool {
        (**self).is_present()
    }

    fn is_ok(&self) -> bool {
        (**self).is_ok()
    }

    fn register_client(&self, chip_id: u32, irq: IrqNumber) -> Result<(), LpcError> {
        (**self).register_client(chip_id, irq)
    }
}
