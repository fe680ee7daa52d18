pub mod irq;
pub mod irq_spinlock;
pub use irq_spinlock::IrqSpinLock;
pub mod slot;
pub use slot::AtomicSlot;
