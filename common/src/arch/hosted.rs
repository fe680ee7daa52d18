//! Hosted builds have no local interrupts to mask.

use crate::sync::irq::IrqControl;

/// No-op [`IrqControl`] used when running under an operating system.
///
/// Preemption there comes from other threads, which the spinlock itself
/// already excludes.
pub struct HostedIrq;

impl IrqControl for HostedIrq {
    type State = ();

    #[inline(always)]
    fn disable() {}

    #[inline(always)]
    fn restore(_state: ()) {}
}
