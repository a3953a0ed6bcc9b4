//! Topology builder.
//!
//! Turns a validated [`NetworkSpec`] into one server node and one node per
//! active member. Member addresses come from the member's position in the
//! original user list (ordinal = index + 1), never from the number of
//! active members before it.

use super::types::{BuildError, MemberNode, Topology};
use crate::config::NetworkSpec;
use crate::ip::AddressRange;
use crate::keys::KeyPair;
use crate::node::{InterfaceDescriptor, NodeDescriptor, PeerDescriptor};
use log::{debug, info, warn};
use std::net::Ipv6Addr;

/// Build the server node and all member nodes.
///
/// Any failure aborts the whole build; no partial topology is returned.
pub fn build(spec: &NetworkSpec) -> Result<Topology, BuildError> {
    let secret = spec.private_key.resolve()?;
    let keys = KeyPair::from_base64(&secret)?;
    let server_public_key = keys.public_key_base64();
    info!("Server public key: {}", server_public_key);

    let range = AddressRange::parse(&spec.cidr)?;

    let post_up = spec
        .firewall_plan()
        .map(|plan| plan.script().to_one_line());
    if post_up.is_none() {
        warn!("No routes configured; server config will not install firewall rules");
    }

    let mut server = NodeDescriptor::new(InterfaceDescriptor {
        address: range.server_address(),
        listen_port: Some(spec.listen_port),
        private_key: Some(keys.private_key_base64()),
        post_up,
        ..Default::default()
    });

    let dns = (!spec.dns.is_empty()).then(|| spec.dns.join(","));
    let member_allowed_ips = spec
        .routes
        .as_ref()
        .map(|routes| routes.accept.join(", "))
        .unwrap_or_default();
    let endpoint = format_endpoint(&spec.endpoint, spec.listen_port);

    let mut members = Vec::with_capacity(spec.users.len());

    for (index, user) in spec.users.iter().enumerate() {
        if user.revoked {
            debug!("Skipping revoked user {} (slot {} stays reserved)", index, index + 1);
            continue;
        }

        let address = range
            .member_address(index + 1)
            .map_err(|source| BuildError::MemberAddress { index, source })?;
        debug!("Assigned {} to user {}", address, index);

        let public_key = user.public_key.trim().to_string();
        server.peers.push(PeerDescriptor {
            public_key: public_key.clone(),
            endpoint: None,
            allowed_ips: address.clone(),
        });

        let mut node = NodeDescriptor::new(InterfaceDescriptor {
            address,
            dns: dns.clone(),
            ..Default::default()
        });
        node.peers.push(PeerDescriptor {
            public_key: server_public_key.clone(),
            endpoint: Some(endpoint.clone()),
            allowed_ips: member_allowed_ips.clone(),
        });

        members.push(MemberNode {
            index,
            public_key,
            node,
        });
    }

    info!(
        "Built topology for {}: {} active members, {} revoked",
        range,
        members.len(),
        spec.users.len() - members.len()
    );

    Ok(Topology {
        server,
        server_public_key,
        members,
    })
}

// IPv6 literals need brackets before the port
fn format_endpoint(host: &str, port: u16) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}
