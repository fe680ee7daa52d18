//! Platform glue
//!
//! Everything between "firmware booted" and "mailbox driver running":
//! finding the mailbox in the platform configuration tree, and concrete
//! [`LpcBus`] backends selected by Cargo features.
//!
//! # Usage
//!
//! ```no_run
//! # use bmc_mbox::hal::{devtree::DeviceTree, lpc::LpcBus, timer::CountingTimer};
//! # use bmc_mbox::peripheral::lpc_mbox::{Mailbox, MboxConfig};
//! # fn boot<D: DeviceTree, B: LpcBus, T: CountingTimer>(dt: &D, bus: B, poller: T) {
//! let mbox: Mailbox<'_, B, T> = Mailbox::new(bus, poller, MboxConfig::default());
//! if let Err(err) = bmc_mbox::platform::probe(&mbox, dt) {
//!     log::error!("no BMC mailbox: {err}");
//! }
//! # }
//! ```

use log::{debug, error};

use crate::hal::devtree::{DeviceTree, DtNode};
use crate::hal::lpc::{LpcBus, LpcSpace};
use crate::hal::timer::CountingTimer;
use crate::peripheral::lpc_mbox::{Mailbox, MboxError, MboxResources};

/// Compatible string of the mailbox node.
pub const MBOX_COMPATIBLE: &str = "mbox";

cfg_if::cfg_if! {
    if #[cfg(all(feature = "pc", target_arch = "x86_64"))] {
        pub mod pc;
        pub use pc::PortIoLpc;
    }
}

/// Locate the mailbox in the configuration tree.
///
/// # Errors
///
/// - [`MboxError::ConfigurationMissing`] if there is no mailbox node, no
///   usable `interrupts` or `reg` property, or `reg` is not an LPC I/O range
/// - [`MboxError::TransportUnavailable`] if the LPC bus is absent
pub fn discover<D, B>(dt: &D, bus: &B) -> Result<MboxResources, MboxError>
where
    D: DeviceTree,
    B: LpcBus + ?Sized,
{
    debug!("Attempting mailbox discovery");

    let Some(node) = dt.find_compatible(MBOX_COMPATIBLE) else {
        error!("No device tree entry");
        return Err(MboxError::ConfigurationMissing);
    };

    let irq = node.prop_u32_or("interrupts", 0);
    if irq == 0 {
        error!("No interrupts property");
        return Err(MboxError::ConfigurationMissing);
    }

    if !bus.is_present() {
        error!("LPC not present");
        return Err(MboxError::TransportUnavailable);
    }

    let Some(reg) = node.property("reg") else {
        error!("Can't find reg property");
        return Err(MboxError::ConfigurationMissing);
    };
    if reg.cell(0).and_then(LpcSpace::from_cell) != Some(LpcSpace::Io) {
        error!("Only supports IO addresses");
        return Err(MboxError::ConfigurationMissing);
    }
    let Some(base) = reg.cell(1) else {
        error!("reg property has no address cell");
        return Err(MboxError::ConfigurationMissing);
    };

    Ok(MboxResources {
        base,
        irq,
        chip_id: node.chip_id(),
    })
}

/// Discover the mailbox and initialize `mbox` with what was found.
pub fn probe<B, T, D, const N: usize>(
    mbox: &Mailbox<'_, B, T, N>,
    dt: &D,
) -> Result<(), MboxError>
where
    B: LpcBus,
    T: CountingTimer,
    D: DeviceTree,
{
    let res = discover(dt, mbox.bus())?;
    mbox.init(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::devtree::Property;
    use crate::hal::lpc::{IrqNumber, LpcError};

    struct FakeNode {
        props: Vec<(&'static str, Vec<u8>)>,
        chip_id: u32,
    }

    impl DtNode for FakeNode {
        fn property(&self, name: &str) -> Option<Property<'_>> {
            self.props
                .iter()
                .find(|(prop, _)| *prop == name)
                .map(|(_, raw)| Property::new(raw))
        }

        fn chip_id(&self) -> u32 {
            self.chip_id
        }
    }

    struct FakeTree {
        mbox: Option<FakeNode>,
    }

    impl DeviceTree for FakeTree {
        type Node<'a> = &'a FakeNode;

        fn find_compatible(&self, compatible: &str) -> Option<&FakeNode> {
            if compatible == MBOX_COMPATIBLE {
                self.mbox.as_ref()
            } else {
                None
            }
        }
    }

    impl DtNode for &FakeNode {
        fn property(&self, name: &str) -> Option<Property<'_>> {
            (**self).property(name)
        }

        fn chip_id(&self) -> u32 {
            (**self).chip_id()
        }
    }

    struct Bus {
        present: bool,
    }

    impl LpcBus for Bus {
        fn inb(&self, _addr: u32) -> u8 {
            0
        }

        fn outb(&self, _val: u8, _addr: u32) {}

        fn is_present(&self) -> bool {
            self.present
        }

        fn is_ok(&self) -> bool {
            true
        }

        fn register_client(&self, _chip_id: u32, _irq: IrqNumber) -> Result<(), LpcError> {
            Ok(())
        }
    }

    fn cells(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    fn mbox_node() -> FakeNode {
        FakeNode {
            props: vec![
                ("interrupts", cells(&[9, 3])),
                ("reg", cells(&[LpcSpace::Io as u32, 0x1000, 0x18])),
            ],
            chip_id: 8,
        }
    }

    fn without(mut node: FakeNode, name: &str) -> FakeNode {
        node.props.retain(|(prop, _)| *prop != name);
        node
    }

    const LPC: Bus = Bus { present: true };

    #[test]
    fn finds_io_base_irq_and_chip() {
        let tree = FakeTree {
            mbox: Some(mbox_node()),
        };
        assert_eq!(
            discover(&tree, &LPC),
            Ok(MboxResources {
                base: 0x1000,
                irq: 9,
                chip_id: 8,
            })
        );
    }

    #[test]
    fn missing_node_is_configuration_missing() {
        let tree = FakeTree { mbox: None };
        assert_eq!(discover(&tree, &LPC), Err(MboxError::ConfigurationMissing));
    }

    #[test]
    fn missing_or_zero_interrupts_is_configuration_missing() {
        let tree = FakeTree {
            mbox: Some(without(mbox_node(), "interrupts")),
        };
        assert_eq!(discover(&tree, &LPC), Err(MboxError::ConfigurationMissing));

        let mut node = without(mbox_node(), "interrupts");
        node.props.push(("interrupts", cells(&[0])));
        let tree = FakeTree { mbox: Some(node) };
        assert_eq!(discover(&tree, &LPC), Err(MboxError::ConfigurationMissing));
    }

    #[test]
    fn absent_lpc_is_transport_unavailable() {
        let tree = FakeTree {
            mbox: Some(mbox_node()),
        };
        let bus = Bus { present: false };
        assert_eq!(discover(&tree, &bus), Err(MboxError::TransportUnavailable));
    }

    #[test]
    fn reg_must_be_an_io_range() {
        let tree = FakeTree {
            mbox: Some(without(mbox_node(), "reg")),
        };
        assert_eq!(discover(&tree, &LPC), Err(MboxError::ConfigurationMissing));

        let mut node = without(mbox_node(), "reg");
        node.props
            .push(("reg", cells(&[LpcSpace::Mem as u32, 0x1000, 0x18])));
        let tree = FakeTree { mbox: Some(node) };
        assert_eq!(discover(&tree, &LPC), Err(MboxError::ConfigurationMissing));

        let mut node = without(mbox_node(), "reg");
        node.props.push(("reg", cells(&[LpcSpace::Io as u32])));
        let tree = FakeTree { mbox: Some(node) };
        assert_eq!(discover(&tree, &LPC), Err(MboxError::ConfigurationMissing));
    }
}
