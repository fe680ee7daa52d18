//! Platform configuration lookup.
//!
//! Firmware describes devices in a tree of nodes carrying named properties.
//! Property values are raw big-endian byte strings; most are arrays of
//! 32-bit cells. Drivers only need to find a node by compatible string and
//! read cells out of its properties.

/// A raw property value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Property<'a> {
    raw: &'a [u8],
}

impl<'a> Property<'a> {
    /// Wrap a raw property value.
    pub const fn new(raw: &'a [u8]) -> Self {
        Self { raw }
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }

    /// Number of complete 32-bit cells.
    pub fn cell_count(&self) -> usize {
        self.raw.len() / 4
    }

    /// Big-endian cell `index`, if the property is long enough.
    pub fn cell(&self, index: usize) -> Option<u32> {
        let start = index.checked_mul(4)?;
        let bytes = self.raw.get(start..start.checked_add(4)?)?;
        Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// A node of the configuration tree.
pub trait DtNode {
    /// Look up a property by name.
    fn property(&self, name: &str) -> Option<Property<'_>>;

    /// Chip the node belongs to.
    ///
    /// Nodes outside any chip report chip 0.
    fn chip_id(&self) -> u32;

    /// Cell 0 of `name`, or `default` when the property is absent or short.
    fn prop_u32_or(&self, name: &str, default: u32) -> u32 {
        self.property(name)
            .and_then(|prop| prop.cell(0))
            .unwrap_or(default)
    }
}

/// The platform configuration tree.
pub trait DeviceTree {
    /// Node handle type.
    type Node<'a>: DtNode
    where
        Self: 'a;

    /// First node whose `compatible` list contains `compatible`.
    fn find_compatible(&self, compatible: &str) -> Option<Self::Node<'_>>;
}
