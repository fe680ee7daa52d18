//! Host-side BMC mailbox driver
//!
//! Firmware talks to the baseboard management controller through a small
//! register window on the LPC bus: one request at a time, answered either by
//! an interrupt or found by timed polling, plus an attention channel for
//! unsolicited BMC notifications.
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent traits the driver is built on
//! - [`peripheral`]: The LPC mailbox driver itself
//! - [`platform`]: Discovery from platform configuration and bus backends
//! - [`console`]: `log` backend over a serial port
//!
//! # Design Principles
//!
//! 1. **Injected state**: every mailbox is an explicitly constructed object;
//!    there is no hidden global
//! 2. **No locks across I/O**: the in-flight slot is lock-free and register
//!    access never happens under a lock
//! 3. **Absorb asynchronous errors**: the completion detector logs what goes
//!    wrong and keeps running

#![cfg_attr(not(test), no_std)]

pub mod console;
pub mod hal;
pub mod peripheral;
pub mod platform;

// Re-export commonly used types
pub use hal::lpc::LpcBus;
pub use hal::timer::{CountingTimer, Deadline, Timer};
pub use peripheral::lpc_mbox::{BmcMboxMsg, Mailbox, MboxClient, MboxConfig, MboxError};
