//! Lock-free single-occupant hand-off slot.
//!
//! A producer lends a `&'static mut T` to the slot; a consumer running in
//! another context (typically an interrupt handler or timer callback) later
//! claims it, works on it, and frees the slot. The slot moves through three
//! states:
//!
//! ```text
//!   Empty --try_put--> Occupied --claim--> Claimed --release--> Empty
//!                          ^                  |
//!                          +----restore-------+
//! ```
//!
//! `try_put` only succeeds from `Empty`, so a claimed item still counts as
//! occupying the slot until the consumer calls [`AtomicSlot::release`]. Every
//! transition is a single atomic operation; nothing spins, so a consumer that
//! preempts a producer can never deadlock against it.

use core::marker::PhantomData;
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

/// Single-occupant slot holding a lent `&'static mut T`.
pub struct AtomicSlot<T: 'static> {
    ptr: AtomicPtr<T>,
    _owns: PhantomData<&'static mut T>,
}

// SAFETY: the slot hands out each reference to exactly one party at a time.
unsafe impl<T: Send> Send for AtomicSlot<T> {}
unsafe impl<T: Send> Sync for AtomicSlot<T> {}

impl<T: 'static> AtomicSlot<T> {
    /// Create an empty slot.
    ///
    /// `T` must not be zero-sized: the claimed marker is an address no real
    /// object of non-zero size can occupy.
    pub const fn new() -> Self {
        const { assert!(core::mem::size_of::<T>() != 0) };
        Self {
            ptr: AtomicPtr::new(ptr::null_mut()),
            _owns: PhantomData,
        }
    }

    #[inline(always)]
    fn claimed_marker() -> *mut T {
        ptr::without_provenance_mut(usize::MAX)
    }

    /// Lend `item` to the slot if it is empty.
    ///
    /// Returns the item untouched when the slot is occupied or claimed.
    pub fn try_put(&self, item: &'static mut T) -> Result<(), &'static mut T> {
        let raw: *mut T = item;
        match self
            .ptr
            .compare_exchange(ptr::null_mut(), raw, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(()),
            // SAFETY: the exchange failed, so `raw` was never published.
            Err(_) => Err(unsafe { &mut *raw }),
        }
    }

    /// Take exclusive access to the occupant while keeping the slot busy.
    ///
    /// Returns `None` when the slot is empty or already claimed. The caller
    /// must finish with either [`release`](Self::release) or
    /// [`restore`](Self::restore).
    pub fn claim(&self) -> Option<&'static mut T> {
        let marker = Self::claimed_marker();
        let mut current = self.ptr.load(Ordering::Acquire);
        loop {
            if current.is_null() || current == marker {
                return None;
            }
            match self.ptr.compare_exchange_weak(
                current,
                marker,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                // SAFETY: `current` came from `try_put`/`restore`, and the
                // exchange removed it from the slot, so we are its only holder.
                Ok(_) => return Some(unsafe { &mut *current }),
                Err(actual) => current = actual,
            }
        }
    }

    /// Free a claimed slot.
    pub fn release(&self) {
        let previous = self.ptr.swap(ptr::null_mut(), Ordering::AcqRel);
        debug_assert!(previous == Self::claimed_marker(), "release without claim");
    }

    /// Put a claimed item back, making it the occupant again.
    pub fn restore(&self, item: &'static mut T) {
        let previous = self.ptr.swap(item, Ordering::AcqRel);
        debug_assert!(previous == Self::claimed_marker(), "restore without claim");
    }

    /// Whether the slot is occupied or claimed.
    pub fn is_occupied(&self) -> bool {
        !self.ptr.load(Ordering::Acquire).is_null()
    }

    /// Whether the slot is claimed by a consumer right now.
    pub fn is_claimed(&self) -> bool {
        self.ptr.load(Ordering::Acquire) == Self::claimed_marker()
    }

    /// Whether `item` is the current (unclaimed) occupant.
    pub fn holds(&self, item: *const T) -> bool {
        ptr::eq(self.ptr.load(Ordering::Acquire), item)
    }
}

impl<T: 'static> Default for AtomicSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
