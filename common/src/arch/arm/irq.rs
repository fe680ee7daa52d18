use crate::sync::irq::IrqControl;

/// IRQ disable bit in the CPSR.
const CPSR_I_BIT: u32 = 1 << 7;

/// Local IRQ masking for 32-bit ARM cores.
///
/// The saved state is whether IRQs were enabled before [`disable`] ran, so
/// nested critical sections only re-enable IRQs at the outermost level.
///
/// [`disable`]: IrqControl::disable
pub struct ArmIrq;

impl IrqControl for ArmIrq {
    type State = bool;

    #[inline(always)]
    fn disable() -> bool {
        let cpsr: u32;
        // SAFETY: reads CPSR and sets the I bit; touches no memory.
        unsafe {
            core::arch::asm!(
                "mrs {0}, cpsr",
                "cpsid i",
                out(reg) cpsr,
                options(nomem, nostack)
            );
        }
        cpsr & CPSR_I_BIT == 0
    }

    #[inline(always)]
    fn restore(was_enabled: bool) {
        if was_enabled {
            // SAFETY: only re-enables IRQs that were enabled on entry.
            unsafe {
                core::arch::asm!("cpsie i", options(nomem, nostack));
            }
        }
    }
}
