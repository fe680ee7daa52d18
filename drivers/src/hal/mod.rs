//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! The mailbox driver never touches hardware directly. Everything it needs
//! from the platform is expressed as a trait here and injected at
//! construction time, so the same driver runs on real firmware and against
//! test doubles.
//!
//! # Available Interfaces
//!
//! - [`lpc`]: Byte-wide register access on the LPC bus, IRQ client registration
//! - [`timer`]: One-shot poller scheduling and a free-running clock
//! - [`devtree`]: Platform configuration lookup (device tree style)
//! - [`serial`]: Byte output used by the console logger

pub mod devtree;
pub mod lpc;
pub mod serial;
pub mod timer;
