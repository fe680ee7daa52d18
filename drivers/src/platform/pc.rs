//! LPC access through x86 I/O ports.
//!
//! On PC-class machines the LPC I/O space is the CPU's port space, so
//! mailbox registers are reached with plain `in`/`out` instructions.

use log::{debug, warn};
use x86::io::{inb, outb};

use crate::hal::lpc::{IrqNumber, LpcBus, LpcError};

/// Highest legacy ISA/LPC serial IRQ.
const MAX_SERIRQ: IrqNumber = 15;

/// [`LpcBus`] backed by x86 port I/O.
#[derive(Debug)]
pub struct PortIoLpc {
    _private: (),
}

impl PortIoLpc {
    /// Create the port-I/O backend.
    ///
    /// # Safety
    ///
    /// - The caller must run at an I/O privilege level allowing port access
    /// - Nothing else may drive the ports the mailbox is configured at
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }

    fn port(addr: u32) -> Option<u16> {
        u16::try_from(addr).ok()
    }
}

impl LpcBus for PortIoLpc {
    fn inb(&self, addr: u32) -> u8 {
        match Self::port(addr) {
            // SAFETY: port access was granted at construction.
            Some(port) => unsafe { inb(port) },
            None => {
                warn!("LPC read from {addr:#x} outside the port space");
                0xff
            }
        }
    }

    fn outb(&self, val: u8, addr: u32) {
        match Self::port(addr) {
            // SAFETY: port access was granted at construction.
            Some(port) => unsafe { outb(port, val) },
            None => warn!("LPC write to {addr:#x} outside the port space"),
        }
    }

    fn is_present(&self) -> bool {
        true
    }

    fn is_ok(&self) -> bool {
        true
    }

    fn register_client(&self, chip_id: u32, irq: IrqNumber) -> Result<(), LpcError> {
        if irq > MAX_SERIRQ {
            return Err(LpcError::InvalidIrq(irq));
        }
        // SERIRQ routing to a vector is owned by the interrupt controller setup
        debug!("LPC IRQ {irq} on chip {chip_id} left to the interrupt controller");
        Ok(())
    }
}
