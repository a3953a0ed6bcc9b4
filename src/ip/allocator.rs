//! Positional address allocation inside the tunnel network.
//!
//! The server always takes the first usable address of the range. A member
//! at position `index` of the original member list takes ordinal
//! `index + 1`, i.e. the address `index + 2` past the network address.
//! Revoked members keep their slot, so revoking someone never moves anybody
//! else's address.

use super::AddressError;
use ipnet::IpNet;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// A parsed tunnel network range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    net: IpNet,
}

impl AddressRange {
    /// Parse a CIDR string such as `10.0.0.0/24`. Host bits are truncated.
    pub fn parse(cidr: &str) -> Result<Self, AddressError> {
        let net: IpNet = cidr
            .trim()
            .parse()
            .map_err(|source| AddressError::InvalidCidr {
                cidr: cidr.to_string(),
                source,
            })?;

        let range = Self { net: net.trunc() };
        if range.capacity() == 0 {
            return Err(AddressError::RangeTooSmall {
                cidr: cidr.to_string(),
            });
        }
        Ok(range)
    }

    /// Prefix length of the range, used for the server's own address
    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    /// Prefix length of a single host: 32 for IPv4, 128 for IPv6
    pub fn host_prefix_len(&self) -> u8 {
        self.net.max_prefix_len()
    }

    /// First usable address of the range, reserved for the server
    pub fn first(&self) -> IpAddr {
        offset_addr(self.net.network(), 1)
    }

    /// Number of member ordinals the range can hold
    pub fn capacity(&self) -> u128 {
        self.usable_hosts().saturating_sub(1)
    }

    /// Address for a 1-based member ordinal. Ordinal 0 is the server.
    pub fn allocate(&self, ordinal: usize) -> Result<IpAddr, AddressError> {
        let offset = ordinal as u128 + 1;
        if offset > self.usable_hosts() {
            return Err(AddressError::OrdinalOutOfRange {
                cidr: self.net.to_string(),
                ordinal,
                capacity: self.capacity(),
            });
        }
        Ok(offset_addr(self.net.network(), offset))
    }

    /// Server interface address, e.g. `10.0.0.1/24`
    pub fn server_address(&self) -> String {
        format!("{}/{}", self.first(), self.prefix_len())
    }

    /// Member host address, e.g. `10.0.0.2/32`
    pub fn member_address(&self, ordinal: usize) -> Result<String, AddressError> {
        Ok(format!("{}/{}", self.allocate(ordinal)?, self.host_prefix_len()))
    }

    // Addresses past the network address, excluding the IPv4 broadcast
    fn usable_hosts(&self) -> u128 {
        let host_bits = u32::from(self.host_prefix_len() - self.prefix_len());
        let span = 1u128.checked_shl(host_bits).unwrap_or(0).wrapping_sub(1);
        match self.net {
            IpNet::V4(_) => span.saturating_sub(1),
            IpNet::V6(_) => span,
        }
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

// `offset` is bounded by usable_hosts(), so the sum stays inside the range
fn offset_addr(base: IpAddr, offset: u128) -> IpAddr {
    match base {
        IpAddr::V4(addr) => {
            IpAddr::V4(Ipv4Addr::from((u128::from(u32::from(addr)) + offset) as u32))
        }
        IpAddr::V6(addr) => IpAddr::V6(Ipv6Addr::from(u128::from(addr) + offset)),
    }
}
