use core::fmt::Debug;

/// Local interrupt masking interface.
///
/// One implementation per architecture; see [`crate::arch::CurrentIrq`].
pub trait IrqControl {
    /// Interrupt state saved by [`disable`](IrqControl::disable).
    type State: Copy + Debug;

    /// Mask local interrupts and return the previous state.
    fn disable() -> Self::State;

    /// Put local interrupts back into a previously saved state.
    fn restore(state: Self::State);
}
