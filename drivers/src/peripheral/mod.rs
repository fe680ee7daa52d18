//! Peripheral Drivers
//!
//! Drivers for peripherals that sit behind a platform bus and do not depend
//! on a particular SoC.
//!
//! # Available Peripherals
//!
//! - [`lpc_mbox`]: Host side of the LPC BMC mailbox

pub mod lpc_mbox;
