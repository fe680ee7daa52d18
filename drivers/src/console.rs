//! Console log backend.
//!
//! Renders [`log`] records to a serial port. The port sits behind an
//! [`IrqSpinLock`], so records emitted from the mailbox completion context
//! interleave cleanly with ordinary ones.

use core::fmt::Write;

use common::arch::CurrentIrq;
use common::sync::IrqSpinLock;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::hal::serial::{SerialError, SerialPort, SerialWriter};

/// Serial ports the console can drive.
pub type ConsolePort = dyn SerialPort<Error = SerialError> + Send;

/// [`Log`] implementation writing one line per record.
pub struct ConsoleLogger {
    level: LevelFilter,
    port: IrqSpinLock<Option<&'static mut ConsolePort>, CurrentIrq>,
}

impl ConsoleLogger {
    /// Logger with no port attached; records are dropped until one is.
    pub const fn new(level: LevelFilter) -> Self {
        Self {
            level,
            port: IrqSpinLock::new(None),
        }
    }

    /// Attach `port`, returning the previously attached one.
    pub fn attach(&self, port: &'static mut ConsolePort) -> Option<&'static mut ConsolePort> {
        self.port.lock().replace(port)
    }

    /// Detach and return the current port.
    pub fn detach(&self) -> Option<&'static mut ConsolePort> {
        self.port.lock().take()
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut port = self.port.lock();
        if let Some(port) = port.as_deref_mut() {
            // Nowhere to report a failing console
            let _ = writeln!(
                SerialWriter(port),
                "[{:<5}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Some(port) = self.port.lock().as_deref_mut() {
            let _ = port.flush();
        }
    }
}

static LOGGER: ConsoleLogger = ConsoleLogger::new(LevelFilter::Trace);

/// Install the console as the global logger.
///
/// `level` is the global maximum; records above it are discarded before
/// formatting.
pub fn init(port: &'static mut ConsolePort, level: LevelFilter) -> Result<(), SetLoggerError> {
    LOGGER.attach(port);
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
