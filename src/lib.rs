//! # wgmesh - WireGuard hub-and-spoke configuration generator
//!
//! This library turns a single declarative description of a private network
//! (one server plus a roster of member peers) into the configuration files
//! needed to bring the network up: one server `wg-quick` file with embedded
//! firewall rules, and one file per active member.
//!
//! ## Architecture
//!
//! - `config`: Network description schema and validation
//! - `config_loader`: YAML loading
//! - `keys`: Private key sources and Curve25519 public key derivation
//! - `ip`: Positional address allocation inside the tunnel range
//! - `firewall`: The server's default-reject routing script
//! - `topology`: Builds the server node and member nodes
//! - `node`: Node descriptors and rendering to configuration text
//! - `orchestrator`: A full generation run and the operator report
//! - `utils`: Shell script composition
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use wgmesh::{config_loader, orchestrator};
//!
//! let spec = config_loader::load_config(Path::new("server.yml"))?;
//! let options = orchestrator::GenerateOptions {
//!     output_path: spec.default_output_path(),
//!     dry_run: false,
//! };
//! let generated = orchestrator::generate(&spec, &options)?;
//!
//! for member in &generated.members {
//!     println!("# user {}\n{}", member.index, member.config);
//! }
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Address Assignment
//!
//! The server takes the first usable address of the range with the range's
//! prefix. The member at position `i` of the user list gets the address
//! `i + 1` past the server's, as a single-host route. Revoked members are
//! dropped from every output but keep their position, so revoking one
//! member never changes another member's address.
//!
//! ## Error Handling
//!
//! Each layer has its own `thiserror` enum (`ValidationError`,
//! `ConfigLoadError`, `KeyError`, `AddressError`, `BuildError`). The
//! orchestrator and binary wrap them with `color_eyre` context. Every error
//! is terminal: either the full set of configurations is produced or
//! nothing is.

pub mod config;
pub mod config_loader;
pub mod firewall;
pub mod ip;
pub mod keys;
pub mod node;
pub mod orchestrator;
pub mod topology;
pub mod utils;
