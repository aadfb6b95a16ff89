//! Node identifiers and their resolution from network hardware.

use std::fmt;

/// A 48-bit node identifier, either a hardware address or a random value with the multicast bit
/// set.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Node([u8; 6]);

impl Node {
    /// Creates a node from raw bytes.
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Creates a non-hardware node from random bytes, setting the multicast bit (the least
    /// significant bit of the first octet) so that it cannot collide with a real IEEE 802 address.
    pub const fn random_multicast(mut bytes: [u8; 6]) -> Self {
        bytes[0] |= 0x01;
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Returns true if the multicast bit is set.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }
}

impl From<[u8; 6]> for Node {
    fn from(src: [u8; 6]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Node {
    type Error = std::array::TryFromSliceError;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 6]>::try_from(src).map(Self)
    }
}

impl PartialEq<[u8]> for Node {
    fn eq(&self, other: &[u8]) -> bool {
        self.0[..] == *other
    }
}

impl fmt::Display for Node {
    /// Returns the lowercase hexadecimal representation without separators.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{:02x}", b))
    }
}

/// A trait that defines the node resolution interface for [`Generator`](crate::Generator).
///
/// Returning `None` tells the generator to fall back to a random multicast node.
pub trait NodeSource {
    /// Returns the node identifier of this host, if one can be resolved.
    fn node(&mut self) -> Option<Node>;
}

impl<F: FnMut() -> Option<Node>> NodeSource for F {
    fn node(&mut self) -> Option<Node> {
        self()
    }
}

/// The default node source that picks the first non-zero hardware address of the host's network
/// interfaces.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct HardwareNode;

impl NodeSource for HardwareNode {
    fn node(&mut self) -> Option<Node> {
        find_first_hardware_address()
    }
}

#[cfg(feature = "hardware_node")]
fn find_first_hardware_address() -> Option<Node> {
    let iter = match mac_address::MacAddressIterator::new() {
        Ok(iter) => iter,
        Err(err) => {
            log::debug!("could not enumerate network interfaces: {}", err);
            return None;
        }
    };
    iter.map(|addr| Node(addr.bytes()))
        .find(|node| node.0 != [0u8; 6])
}

#[cfg(not(feature = "hardware_node"))]
fn find_first_hardware_address() -> Option<Node> {
    None
}
