//! Tunnel address allocation.
//!
//! Addresses are a pure function of the network range and a member's
//! position in the original member list; nothing here keeps state between
//! runs.

pub mod allocator;

pub use allocator::AddressRange;

/// Address allocation errors
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("invalid CIDR '{cidr}': {source}")]
    InvalidCidr {
        cidr: String,
        #[source]
        source: ipnet::AddrParseError,
    },
    #[error("range '{cidr}' has no room for a server and members")]
    RangeTooSmall { cidr: String },
    #[error("ordinal {ordinal} is outside range '{cidr}' (capacity {capacity})")]
    OrdinalOutOfRange {
        cidr: String,
        ordinal: usize,
        capacity: u128,
    },
}
