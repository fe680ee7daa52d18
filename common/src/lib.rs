//! Low-level primitives shared by the driver crates.
//!
//! - [`arch`]: per-target local interrupt masking
//! - [`sync`]: interrupt-safe locking and lock-free hand-off slots

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod sync;
