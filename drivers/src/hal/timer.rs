//! Timer Hardware Abstraction Layer.
//!
//! Drivers that poll hardware own a single one-shot poller. Each time the
//! poller fires, the platform calls back into the driver, which decides
//! whether and when to schedule it again.

/// When a scheduled poller should next fire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Deadline {
    /// At the next poll opportunity: the next interrupt or the platform's
    /// idle/poll loop, whichever comes first.
    NextPoll,
    /// After the given number of microseconds.
    AfterUs(u32),
}

/// One-shot poller bound to a single callback.
///
/// Scheduling an already pending poller moves its deadline.
pub trait Timer {
    /// Error type for timer operations.
    type Error: core::fmt::Debug;

    /// Arm the poller.
    fn schedule(&self, deadline: Deadline) -> Result<(), Self::Error>;
}

/// Extension trait for timers that can read a free-running clock.
pub trait CountingTimer: Timer {
    /// Current time in microseconds. Wraps.
    fn now_us(&self) -> u64;

    /// Microseconds elapsed since `since`, tolerating wrap-around.
    fn elapsed_us(&self, since: u64) -> u64 {
        self.now_us().wrapping_sub(since)
    }
}

impl<T: Timer + ?Sized> Timer for &T {
    type Error = T::Error;

    fn schedule(&self, deadline: Deadline) -> Result<(), Self::Error> {
        (**self).schedule(deadline)
    }
}

impl<T: CountingTimer + ?Sized> CountingTimer for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
