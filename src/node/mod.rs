//! WireGuard node descriptors and their rendering to `wg-quick` files.

pub mod serializer;
pub mod types;

pub use serializer::render;
pub use types::{InterfaceDescriptor, NodeDescriptor, PeerDescriptor};
