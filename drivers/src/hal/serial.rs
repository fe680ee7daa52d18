//! Serial Port Hardware Abstraction Layer.
//!
//! Only the transmit side is modelled; the console logger is the sole user.

use core::fmt;

/// Serial port errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SerialError {
    /// Operation would block but non-blocking mode was requested.
    WouldBlock,
    /// Other platform-specific error.
    Other,
}

/// Serial port trait.
pub trait SerialPort {
    /// Error type for serial operations.
    type Error: core::fmt::Debug;

    /// Write a single byte (blocking).
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write multiple bytes (blocking).
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(bytes.len())
    }

    /// Flush the write buffer.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Adapter implementing [`core::fmt::Write`] on top of a borrowed
/// [`SerialPort`], so `write!`/`writeln!` can target it.
///
/// Line feeds are expanded to CR LF.
pub struct SerialWriter<'a, T: SerialPort + ?Sized>(pub &'a mut T);

impl<T> fmt::Write for SerialWriter<'_, T>
where
    T: SerialPort + ?Sized,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.0.write_byte(b'\r').map_err(|_| fmt::Error)?;
            }
            self.0.write_byte(byte).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}
