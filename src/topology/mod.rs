//! Hub-and-spoke topology generation.
//!
//! The server is the single hub. Every active member peers only with the
//! server and routes only the accepted destinations through the tunnel.

pub mod builder;
pub mod types;

pub use builder::build;
pub use types::{BuildError, MemberNode, Topology};
