//! Architecture selection.
//!
//! Exactly one [`IrqControl`](crate::sync::irq::IrqControl) implementation is
//! exported as [`CurrentIrq`]. Bare-metal ARM and x86_64 targets mask real
//! interrupts; every hosted target (unit tests, simulators) gets a no-op.

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "arm", target_os = "none"))] {
        pub mod arm;
        pub use arm::irq::ArmIrq as CurrentIrq;
    } else if #[cfg(all(target_arch = "x86_64", target_os = "none"))] {
        pub mod x86_64;
        pub use x86_64::X86Irq as CurrentIrq;
    } else {
        pub mod hosted;
        pub use hosted::HostedIrq as CurrentIrq;
    }
}
