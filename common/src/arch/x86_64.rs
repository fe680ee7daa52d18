//! Local interrupt masking for bare-metal x86_64.

use x86::bits64::rflags::{self, RFlags};

use crate::sync::irq::IrqControl;

/// Masks maskable interrupts through RFLAGS.IF.
pub struct X86Irq;

impl IrqControl for X86Irq {
    type State = bool;

    #[inline(always)]
    fn disable() -> bool {
        let was_enabled = rflags::read().contains(RFlags::FLAGS_IF);
        // SAFETY: `cli` only affects the local interrupt flag.
        unsafe { x86::irq::disable() };
        was_enabled
    }

    #[inline(always)]
    fn restore(was_enabled: bool) {
        if was_enabled {
            // SAFETY: interrupts were enabled when the section was entered.
            unsafe { x86::irq::enable() };
        }
    }
}
