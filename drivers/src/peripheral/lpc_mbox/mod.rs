//! LPC BMC Mailbox Driver (host side)
//!
//! The BMC exposes a small register window on the LPC bus: a block of data
//! registers holding one message, a host control register with a doorbell
//! and a "response registered" bit, and a status register with an
//! "attention" bit for unsolicited notifications such as a BMC reset.
//!
//! # Protocol
//!
//! - At most one message is in flight. [`Mailbox::enqueue`] writes it to the
//!   data registers and rings the doorbell; a second `enqueue` before the
//!   response arrives is rejected with [`MboxError::Busy`].
//! - [`Mailbox::poll`] is the completion detector. It services the response
//!   bit and the attention bit independently, then re-arms the poller.
//! - Until the first LPC interrupt is seen the poller fires every
//!   [`MboxConfig::poll_interval_ms`]. [`Mailbox::interrupt`] switches the
//!   driver to interrupt-driven completion for good.
//!
//! # Usage
//!
//! ```no_run
//! # use bmc_mbox::hal::lpc::LpcBus;
//! # use bmc_mbox::hal::timer::CountingTimer;
//! use bmc_mbox::peripheral::lpc_mbox::{BmcMboxMsg, Mailbox, MboxClient, MboxConfig, MboxResources};
//!
//! struct Flash;
//!
//! impl MboxClient for Flash {
//!     fn response_received(&self, _msg: &'static mut BmcMboxMsg) {
//!         // parse msg, then keep it around for the next request
//!     }
//! }
//!
//! # fn run<B: LpcBus + Sync, T: CountingTimer + Sync>(bus: B, poller: T, msg: &'static mut BmcMboxMsg) {
//! static FLASH: Flash = Flash;
//! let mbox: Mailbox<'_, B, T> = Mailbox::new(bus, poller, MboxConfig::default());
//! mbox.register_client(&FLASH);
//! mbox.init(MboxResources { base: 0x1000, irq: 9, chip_id: 0 }).ok();
//! mbox.enqueue(msg).ok();
//! # }
//! ```

mod config;
mod error;
mod msg;
pub mod regs;

pub use config::{MBOX_DEFAULT_POLL_MS, MboxConfig};
pub use error::MboxError;
pub use msg::BmcMboxMsg;

use core::sync::atomic::{AtomicBool, Ordering};

use common::arch::CurrentIrq;
use common::sync::{AtomicSlot, IrqSpinLock};
use log::{debug, error, info, trace, warn};
use spin::Once;

use crate::hal::lpc::{IrqNumber, LpcBus};
use crate::hal::timer::{CountingTimer, Deadline};
use regs::{
    AttnFlags, BMC_MBOX_DATA_REGS, Ctrl, MBOX_BMC_CTRL, MBOX_FLAG_REG, MBOX_HOST_CTRL,
    MBOX_HOST_INT_EN_0, MBOX_HOST_INT_EN_1, MBOX_STATUS_1, Status,
};

/// Receiver of mailbox completions.
///
/// Called from the completion context (timer or interrupt), so
/// implementations must be quick and must not block.
pub trait MboxClient<const N: usize = BMC_MBOX_DATA_REGS>: Sync {
    /// The BMC answered. `msg` now holds the response and ownership returns
    /// to the client.
    ///
    /// The mailbox still counts as busy until this returns.
    fn response_received(&self, msg: &'static mut BmcMboxMsg<N>);

    /// The response timeout expired; `msg` is handed back unanswered.
    fn response_timed_out(&self, msg: &'static mut BmcMboxMsg<N>) {
        warn!("Dropping timed out mbox message seq {:#04x}", msg.seq());
    }
}

/// Where the mailbox lives and which interrupt it raises.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MboxResources {
    /// LPC I/O base of the register window.
    pub base: u32,
    /// LPC serial IRQ.
    pub irq: IrqNumber,
    /// Chip owning the LPC bus.
    pub chip_id: u32,
}

/// How completions are detected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Timed polling; no interrupt seen yet.
    Polling,
    /// At least one LPC interrupt arrived.
    InterruptConfirmed,
}

/// What a single detector pass observed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PollOutcome {
    /// `None` if the response bit was clear.
    pub response: Option<Result<(), MboxError>>,
    /// `None` if the attention bit was clear; otherwise the flags seen.
    pub attention: Option<Result<AttnFlags, MboxError>>,
    /// The in-flight message was reclaimed by the response timeout.
    pub timed_out: bool,
}

/// Host side of the LPC BMC mailbox.
///
/// One instance per mailbox, shared by reference between ordinary code
/// (`enqueue`) and the completion context (`poll`, `interrupt`).
pub struct Mailbox<'a, B, T, const N: usize = BMC_MBOX_DATA_REGS>
where
    B: LpcBus,
    T: CountingTimer,
{
    bus: B,
    poller: T,
    config: MboxConfig,
    base: Once<u32>,
    irq_ok: AtomicBool,
    in_flight: AtomicSlot<BmcMboxMsg<N>>,
    sent_at_us: IrqSpinLock<Option<u64>, CurrentIrq>,
    client: IrqSpinLock<Option<&'a dyn MboxClient<N>>, CurrentIrq>,
}

impl<'a, B, T, const N: usize> Mailbox<'a, B, T, N>
where
    B: LpcBus,
    T: CountingTimer,
{
    /// Create an uninitialized mailbox.
    pub const fn new(bus: B, poller: T, config: MboxConfig) -> Self {
        Self {
            bus,
            poller,
            config,
            base: Once::new(),
            irq_ok: AtomicBool::new(false),
            in_flight: AtomicSlot::new(),
            sent_at_us: IrqSpinLock::new(None),
            client: IrqSpinLock::new(None),
        }
    }

    /// LPC bus the mailbox window lives on.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Poller driving the completion detector.
    pub fn poller(&self) -> &T {
        &self.poller
    }

    /// Configuration the mailbox was built with.
    pub fn config(&self) -> &MboxConfig {
        &self.config
    }

    /// I/O base, once initialized.
    pub fn base(&self) -> Option<u32> {
        self.base.get().copied()
    }

    pub fn mode(&self) -> DeliveryMode {
        if self.irq_ok.load(Ordering::Acquire) {
            DeliveryMode::InterruptConfirmed
        } else {
            DeliveryMode::Polling
        }
    }

    /// Whether a message is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_occupied()
    }

    /// Whether `msg` is the message currently awaiting a response.
    pub fn is_in_flight(&self, msg: *const BmcMboxMsg<N>) -> bool {
        self.in_flight.holds(msg)
    }

    /// Set the receiver of completions, replacing any previous one.
    pub fn register_client(&self, client: &'a dyn MboxClient<N>) {
        self.client.with(|slot| *slot = Some(client));
    }

    // ========================================================================
    // Register access
    // ========================================================================

    #[inline]
    fn outb(&self, base: u32, val: u8, reg: u8) {
        self.bus.outb(val, base + u32::from(reg));
    }

    #[inline]
    fn inb(&self, base: u32, reg: u8) -> u8 {
        self.bus.inb(base + u32::from(reg))
    }

    fn recv_message(&self, base: u32) -> [u8; N] {
        core::array::from_fn(|reg| self.inb(base, reg as u8))
    }

    fn send_message(&self, base: u32, data: &[u8; N]) {
        if !self.bus.is_ok() {
            error!("{}, writing message anyway", MboxError::TransportUnavailable);
        }
        for (reg, byte) in data.iter().enumerate() {
            self.outb(base, *byte, reg as u8);
        }

        debug!("Sending BMC interrupt");
        self.outb(base, Ctrl::INT_SEND.bits(), MBOX_HOST_CTRL);
    }

    // ========================================================================
    // Initialization
    // ========================================================================

    fn init_hw(&self, base: u32) {
        // Only attention may interrupt the host
        self.outb(base, 0x00, MBOX_HOST_INT_EN_0);
        self.outb(base, Status::ATTN.bits(), MBOX_HOST_INT_EN_1);

        // Drop any response left over from an earlier boot stage
        self.outb(base, Ctrl::INT_STATUS.bits(), MBOX_HOST_CTRL);

        // BMC-side control interrupt stays masked
        self.outb(base, Ctrl::INT_MASK.bits(), MBOX_BMC_CTRL);
    }

    /// Bring up the mailbox at `res.base` and start polling.
    ///
    /// # Errors
    ///
    /// - [`MboxError::AlreadyInitialized`] on a repeat call
    /// - [`MboxError::TransportUnavailable`] if there is no LPC bus
    pub fn init(&self, res: MboxResources) -> Result<(), MboxError> {
        if self.base.is_completed() {
            error!("Duplicate mailbox init");
            return Err(MboxError::AlreadyInitialized);
        }
        if !self.bus.is_present() {
            error!("LPC not present");
            return Err(MboxError::TransportUnavailable);
        }

        self.init_hw(res.base);

        let mut first = false;
        self.base.call_once(|| {
            first = true;
            res.base
        });
        if !first {
            error!("Duplicate mailbox init");
            return Err(MboxError::AlreadyInitialized);
        }

        if let Err(err) = self.bus.register_client(res.chip_id, res.irq) {
            warn!("{err}, mailbox will rely on polling");
        }

        self.rearm();

        debug!(
            "Enabled on chip {}, IO port {:#x}, IRQ {}",
            res.chip_id, res.base, res.irq
        );
        Ok(())
    }

    // ========================================================================
    // Transmit path
    // ========================================================================

    /// Send `msg` to the BMC.
    ///
    /// On success the message is lent to the mailbox until the response
    /// arrives and comes back through [`MboxClient::response_received`]. On
    /// failure it is returned untouched with the reason.
    ///
    /// # Errors
    ///
    /// - [`MboxError::NotInitialized`] before [`init`](Self::init); no
    ///   register is touched
    /// - [`MboxError::Busy`] while another message is in flight
    pub fn enqueue(
        &self,
        msg: &'static mut BmcMboxMsg<N>,
    ) -> Result<(), (MboxError, &'static mut BmcMboxMsg<N>)> {
        let Some(base) = self.base() else {
            error!("Using mailbox without init!");
            return Err((MboxError::NotInitialized, msg));
        };

        let data = msg.encode();
        let seq = msg.seq();

        if let Err(msg) = self.in_flight.try_put(msg) {
            debug!("Mailbox message already in flight");
            return Err((MboxError::Busy, msg));
        }
        *self.sent_at_us.lock() = Some(self.poller.now_us());

        self.send_message(base, &data);
        trace!("Sent message seq {seq:#04x}");

        self.rearm();
        Ok(())
    }

    // ========================================================================
    // Completion detector
    // ========================================================================

    /// Run one detector pass.
    ///
    /// Called by the platform when the poller fires. Services a registered
    /// response and a pending attention independently, applies the response
    /// timeout if one is configured, and always re-arms the poller. Problems
    /// are logged; none of them stop the detector.
    pub fn poll(&self) -> PollOutcome {
        let Some(base) = self.base() else {
            debug!("Mailbox poll before init");
            return PollOutcome::default();
        };

        let response = self.check_response(base);
        let attention = self.check_attention(base);
        let timed_out = response.is_none() && self.check_timeout();

        self.rearm();

        PollOutcome {
            response,
            attention,
            timed_out,
        }
    }

    /// LPC interrupt handler.
    ///
    /// The first call after [`init`](Self::init) confirms interrupt
    /// delivery; from then on the poller is only armed for the next poll
    /// opportunity. There is no way back to timed polling. Before `init` the
    /// call is ignored.
    pub fn interrupt(&self) -> PollOutcome {
        if self.base().is_none() {
            debug!("Mailbox interrupt before init");
            return PollOutcome::default();
        }
        if !self.irq_ok.swap(true, Ordering::AcqRel) {
            info!("LPC interrupt seen, mailbox switching to interrupt-driven completion");
        }
        self.poll()
    }

    fn rearm(&self) {
        let deadline = match self.mode() {
            DeliveryMode::InterruptConfirmed => Deadline::NextPoll,
            DeliveryMode::Polling => Deadline::AfterUs(self.config.poll_interval_us()),
        };
        if let Err(err) = self.poller.schedule(deadline) {
            error!("Failed to arm mailbox poller: {err:?}");
        }
    }

    fn check_response(&self, base: u32) -> Option<Result<(), MboxError>> {
        let ctrl = Ctrl::from_bits_retain(self.inb(base, MBOX_HOST_CTRL));
        if !ctrl.contains(Ctrl::INT_STATUS) {
            return None;
        }
        self.outb(base, Ctrl::INT_STATUS.bits(), MBOX_HOST_CTRL);
        trace!("Response registered");

        Some(self.complete(base))
    }

    fn complete(&self, base: u32) -> Result<(), MboxError> {
        let Some(msg) = self.in_flight.claim() else {
            error!("Response registered with no message in flight");
            return Err(MboxError::ProtocolViolation);
        };

        if self.config.match_sequence {
            let expected = msg.seq();
            let found = self.inb(base, 0);
            if found != expected {
                self.in_flight.restore(msg);
                let err = MboxError::SequenceMismatch { expected, found };
                error!("Dropping response: {err}");
                return Err(err);
            }
        }

        *msg = BmcMboxMsg::decode(self.recv_message(base));
        *self.sent_at_us.lock() = None;

        match self.client.with(|client| *client) {
            Some(client) => client.response_received(msg),
            None => error!("No client for mailbox response seq {:#04x}", msg.seq()),
        }

        self.in_flight.release();
        Ok(())
    }

    fn check_attention(&self, base: u32) -> Option<Result<AttnFlags, MboxError>> {
        let status = Status::from_bits_retain(self.inb(base, MBOX_STATUS_1));
        if !status.contains(Status::ATTN) {
            return None;
        }
        self.outb(base, Status::ATTN.bits(), MBOX_STATUS_1);

        let seen = AttnFlags::from_bits_retain(self.inb(base, MBOX_FLAG_REG));
        trace!("Attention with action {:#04x}", seen.bits());

        let mut unknown = seen;
        if unknown.contains(AttnFlags::BMC_RESET) {
            // TODO: re-synchronize with the BMC instead of only reporting it
            warn!("BMC reset detected");
            unknown.remove(AttnFlags::BMC_RESET);
        }

        if !unknown.is_empty() {
            let err = MboxError::UnrecognizedAttentionFlags(unknown.bits());
            error!("{err}");
            return Some(Err(err));
        }
        Some(Ok(seen))
    }

    fn check_timeout(&self) -> bool {
        let Some(timeout_us) = self.config.response_timeout_us() else {
            return false;
        };
        let Some(sent_at) = *self.sent_at_us.lock() else {
            return false;
        };
        if self.poller.elapsed_us(sent_at) < timeout_us {
            return false;
        }

        let Some(msg) = self.in_flight.claim() else {
            return false;
        };
        *self.sent_at_us.lock() = None;
        error!(
            "{} for message seq {:#04x} after {} us",
            MboxError::Timeout,
            msg.seq(),
            timeout_us
        );

        match self.client.with(|client| *client) {
            Some(client) => client.response_timed_out(msg),
            None => error!("No client to return timed out message to"),
        }

        self.in_flight.release();
        true
    }
}
