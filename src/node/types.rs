//! Node descriptor types.
//!
//! Optional directives are `Option`s: `None` means the directive is not
//! written at all, while `Some(String::new())` writes it with an empty
//! value.

use serde::Serialize;

/// One WireGuard interface with its peers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub interface: InterfaceDescriptor,
    pub peers: Vec<PeerDescriptor>,
}

/// The `[Interface]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDescriptor {
    /// CIDR-qualified address, e.g. `10.0.0.1/24`
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_port: Option<u16>,
    /// Only ever set on the server node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_up: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_up: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_down: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_down: Option<String>,
}

/// A `[Peer]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerDescriptor {
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// One or more comma-separated CIDR ranges
    #[serde(rename = "allowedIPs")]
    pub allowed_ips: String,
}

impl NodeDescriptor {
    pub fn new(interface: InterfaceDescriptor) -> Self {
        Self {
            interface,
            peers: Vec::new(),
        }
    }
}
