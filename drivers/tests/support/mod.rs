//! Test doubles: an LPC bus emulating the BMC side of the register window,
//! a manually driven poller, and a client recording completions.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use bmc_mbox::hal::lpc::{IrqNumber, LpcBus, LpcError};
use bmc_mbox::hal::timer::{CountingTimer, Deadline, Timer};
use bmc_mbox::peripheral::lpc_mbox::regs::{
    Ctrl, MBOX_FLAG_REG, MBOX_HOST_CTRL, MBOX_STATUS_0, MBOX_STATUS_1, Status,
};
use bmc_mbox::peripheral::lpc_mbox::{BmcMboxMsg, MboxClient, MboxResources};

pub const BASE: u32 = 0x1000;

pub const RESOURCES: MboxResources = MboxResources {
    base: BASE,
    irq: 9,
    chip_id: 0,
};

const WINDOW: usize = 0x18;

/// LPC bus with a mailbox register window at [`BASE`].
///
/// Status bits in the status and host control registers are
/// write-one-to-clear; every other register simply latches the value.
pub struct FakeLpc {
    regs: Mutex<[u8; WINDOW]>,
    writes: Mutex<Vec<(u8, u8)>>,
    doorbells: AtomicUsize,
    present: AtomicBool,
    healthy: AtomicBool,
    irq_client: Mutex<Option<(u32, IrqNumber)>>,
    reject_irq: AtomicBool,
}

impl FakeLpc {
    pub fn new() -> Self {
        Self {
            regs: Mutex::new([0; WINDOW]),
            writes: Mutex::new(Vec::new()),
            doorbells: AtomicUsize::new(0),
            present: AtomicBool::new(true),
            healthy: AtomicBool::new(true),
            irq_client: Mutex::new(None),
            reject_irq: AtomicBool::new(false),
        }
    }

    pub fn absent() -> Self {
        let bus = Self::new();
        bus.present.store(false, Ordering::SeqCst);
        bus
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn reject_irq_registration(&self) {
        self.reject_irq.store(true, Ordering::SeqCst);
    }

    pub fn reg(&self, reg: u8) -> u8 {
        self.regs.lock().unwrap()[reg as usize]
    }

    pub fn data(&self, width: usize) -> Vec<u8> {
        self.regs.lock().unwrap()[..width].to_vec()
    }

    /// Register writes made by the host, oldest first.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().unwrap().clear();
    }

    pub fn doorbells(&self) -> usize {
        self.doorbells.load(Ordering::SeqCst)
    }

    pub fn irq_client(&self) -> Option<(u32, IrqNumber)> {
        *self.irq_client.lock().unwrap()
    }

    /// BMC side: place a response in the data registers and flag it.
    pub fn bmc_respond(&self, data: &[u8]) {
        let mut regs = self.regs.lock().unwrap();
        regs[..data.len()].copy_from_slice(data);
        regs[MBOX_HOST_CTRL as usize] |= Ctrl::INT_STATUS.bits();
    }

    /// BMC side: raise attention with `action` in the flag register.
    pub fn bmc_attention(&self, action: u8) {
        let mut regs = self.regs.lock().unwrap();
        regs[MBOX_FLAG_REG as usize] = action;
        regs[MBOX_STATUS_1 as usize] |= Status::ATTN.bits();
    }

    fn offset(addr: u32) -> usize {
        let offset = addr
            .checked_sub(BASE)
            .expect("access below the mailbox window") as usize;
        assert!(offset < WINDOW, "access above the mailbox window: {addr:#x}");
        offset
    }
}

impl LpcBus for FakeLpc {
    fn inb(&self, addr: u32) -> u8 {
        self.regs.lock().unwrap()[Self::offset(addr)]
    }

    fn outb(&self, val: u8, addr: u32) {
        let offset = Self::offset(addr);
        self.writes.lock().unwrap().push((offset as u8, val));

        let mut regs = self.regs.lock().unwrap();
        match offset as u8 {
            MBOX_STATUS_0 | MBOX_STATUS_1 => regs[offset] &= !val,
            MBOX_HOST_CTRL => {
                regs[offset] &= !(val & Ctrl::INT_STATUS.bits());
                if val & Ctrl::INT_SEND.bits() != 0 {
                    self.doorbells.fetch_add(1, Ordering::SeqCst);
                }
            }
            _ => regs[offset] = val,
        }
    }

    fn is_present(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }

    fn is_ok(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    fn register_client(&self, chip_id: u32, irq: IrqNumber) -> Result<(), LpcError> {
        if self.reject_irq.load(Ordering::SeqCst) {
            return Err(LpcError::InvalidIrq(irq));
        }
        *self.irq_client.lock().unwrap() = Some((chip_id, irq));
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PollerFault;

/// Poller that records every deadline it is given and never fires on its
/// own; tests call `poll`/`interrupt` themselves.
pub struct FakeTimer {
    scheduled: Mutex<Vec<Deadline>>,
    now_us: AtomicU64,
    failing: AtomicBool,
}

impl FakeTimer {
    pub fn new() -> Self {
        Self {
            scheduled: Mutex::new(Vec::new()),
            now_us: AtomicU64::new(1_000),
            failing: AtomicBool::new(false),
        }
    }

    pub fn scheduled(&self) -> Vec<Deadline> {
        self.scheduled.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Deadline> {
        self.scheduled.lock().unwrap().last().copied()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_us.fetch_add(ms * 1000, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Timer for FakeTimer {
    type Error = PollerFault;

    fn schedule(&self, deadline: Deadline) -> Result<(), PollerFault> {
        self.scheduled.lock().unwrap().push(deadline);
        if self.failing.load(Ordering::SeqCst) {
            return Err(PollerFault);
        }
        Ok(())
    }
}

impl CountingTimer for FakeTimer {
    fn now_us(&self) -> u64 {
        self.now_us.load(Ordering::SeqCst)
    }
}

/// Client keeping every message handed back to it.
pub struct Recorder<const N: usize> {
    responses: Mutex<Vec<&'static mut BmcMboxMsg<N>>>,
    timeouts: Mutex<Vec<&'static mut BmcMboxMsg<N>>>,
    delivered: AtomicUsize,
}

impl<const N: usize> Recorder<N> {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            timeouts: Mutex::new(Vec::new()),
            delivered: AtomicUsize::new(0),
        }
    }

    /// Responses received so far, including ones already taken back.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }

    pub fn response_count(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    pub fn timeout_count(&self) -> usize {
        self.timeouts.lock().unwrap().len()
    }

    pub fn response_bytes(&self) -> Vec<[u8; N]> {
        self.responses
            .lock()
            .unwrap()
            .iter()
            .map(|msg| *msg.as_bytes())
            .collect()
    }

    /// Take back the most recently answered message.
    pub fn take_response(&self) -> Option<&'static mut BmcMboxMsg<N>> {
        self.responses.lock().unwrap().pop()
    }

    pub fn take_timed_out(&self) -> Option<&'static mut BmcMboxMsg<N>> {
        self.timeouts.lock().unwrap().pop()
    }
}

impl<const N: usize> MboxClient<N> for Recorder<N> {
    fn response_received(&self, msg: &'static mut BmcMboxMsg<N>) {
        self.delivered.fetch_add(1, Ordering::SeqCst);
        self.responses.lock().unwrap().push(msg);
    }

    fn response_timed_out(&self, msg: &'static mut BmcMboxMsg<N>) {
        self.timeouts.lock().unwrap().push(msg);
    }
}

pub fn leak_msg<const N: usize>(bytes: [u8; N]) -> &'static mut BmcMboxMsg<N> {
    Box::leak(Box::new(BmcMboxMsg::from_bytes(bytes)))
}
