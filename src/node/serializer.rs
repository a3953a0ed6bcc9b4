//! Rendering of node descriptors into WireGuard configuration text.

use super::types::{NodeDescriptor, PeerDescriptor};
use std::fmt::Write as _;

/// Render a node as a `wg-quick` configuration file.
///
/// The `[Interface]` section comes first with `Address` followed by the
/// optional directives that are present, in a fixed order. Each `[Peer]`
/// section follows. Every section ends with a blank line.
pub fn render(node: &NodeDescriptor) -> String {
    let mut out = String::new();
    let iface = &node.interface;

    out.push_str("[Interface]\n");
    directive(&mut out, "Address", &iface.address);

    if let Some(port) = iface.listen_port {
        directive(&mut out, "ListenPort", port);
    }

    let optional = [
        ("PrivateKey", &iface.private_key),
        ("DNS", &iface.dns),
        ("PreUp", &iface.pre_up),
        ("PostUp", &iface.post_up),
        ("PreDown", &iface.pre_down),
        ("PostDown", &iface.post_down),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            directive(&mut out, key, value);
        }
    }
    out.push('\n');

    for peer in &node.peers {
        render_peer(&mut out, peer);
    }

    out
}

fn render_peer(out: &mut String, peer: &PeerDescriptor) {
    out.push_str("[Peer]\n");
    directive(out, "PublicKey", &peer.public_key);
    if let Some(endpoint) = &peer.endpoint {
        directive(out, "Endpoint", endpoint);
    }
    directive(out, "AllowedIPs", &peer.allowed_ips);
    out.push('\n');
}

fn directive(out: &mut String, key: &str, value: impl std::fmt::Display) {
    // Writing to a String cannot fail
    let _ = writeln!(out, "{} = {}", key, value);
}
