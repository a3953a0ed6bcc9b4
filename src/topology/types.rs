//! Topology output types.

use crate::ip::AddressError;
use crate::keys::KeyError;
use crate::node::NodeDescriptor;
use serde::Serialize;

/// The generated hub-and-spoke network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    pub server: NodeDescriptor,
    /// Derived from the server private key; members list it as their peer
    pub server_public_key: String,
    /// Active members in original list order
    pub members: Vec<MemberNode>,
}

/// Configuration generated for one active member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberNode {
    /// Position in the original user list
    pub index: usize,
    pub public_key: String,
    pub node: NodeDescriptor,
}

/// Errors that abort topology generation
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to resolve server key: {0}")]
    KeyResolution(#[from] KeyError),
    #[error("invalid tunnel network: {0}")]
    Address(#[from] AddressError),
    #[error("cannot allocate address for user at index {index}: {source}")]
    MemberAddress {
        index: usize,
        #[source]
        source: AddressError,
    },
}
