//! Network description schema.
//!
//! The YAML document holds everything under a top-level `server` key:
//!
//! ```yaml
//! server:
//!   privateKey:
//!     envVar: WG_PRIVATE_KEY
//!   listenPort: 51820
//!   cidr: 10.0.0.0/24
//!   endpoint: vpn.example.com
//!   routes:
//!     accept: ["10.1.0.0/16"]
//!   dns: ["10.1.0.2"]
//!   users:
//!     - publicKey: "..."
//!     - publicKey: "..."
//!       revoked: true
//! ```
//!
//! The order of `users` decides every member's address and must be kept
//! as written.

use crate::firewall::FirewallPlan;
use crate::ip::AddressRange;
use crate::keys::{is_valid_public_key, PrivateKeySource};
use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_TUNNEL_INTERFACE: &str = "wg0";
pub const DEFAULT_UPLINK_INTERFACE: &str = "eth0";

/// Directory `wg-quick` reads interface configurations from
pub const WIREGUARD_CONFIG_DIR: &str = "/etc/wireguard";

/// Top-level document
#[derive(Debug, Clone, Deserialize)]
pub struct ServerFile {
    pub server: NetworkSpec,
}

/// Declarative description of the server and its members
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NetworkSpec {
    pub private_key: PrivateKeySource,
    pub listen_port: u16,
    /// Tunnel network range, e.g. `10.0.0.0/24`
    pub cidr: String,
    /// Routing policy. When absent no firewall script is installed.
    #[serde(default)]
    pub routes: Option<Routes>,
    /// Hostname or IP members use to reach the server
    pub endpoint: String,
    #[serde(default)]
    pub dns: Vec<String>,
    #[serde(default)]
    pub users: Vec<Member>,
    #[serde(default = "default_tunnel_interface")]
    pub tunnel_interface: String,
    #[serde(default = "default_uplink_interface")]
    pub uplink_interface: String,
}

/// Destinations members may reach through the tunnel
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Routes {
    #[serde(default)]
    pub accept: Vec<String>,
}

/// A member peer, identified by its own public key
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Member {
    pub public_key: String,
    /// Revoked members are left out but keep their address slot
    #[serde(default)]
    pub revoked: bool,
}

fn default_tunnel_interface() -> String {
    DEFAULT_TUNNEL_INTERFACE.to_string()
}

fn default_uplink_interface() -> String {
    DEFAULT_UPLINK_INTERFACE.to_string()
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid server configuration: {0}")]
    InvalidServer(String),
    #[error("Invalid routes configuration: {0}")]
    InvalidRoutes(String),
    #[error("Invalid user at index {index}: {reason}")]
    InvalidUser { index: usize, reason: String },
}

impl NetworkSpec {
    /// Validate the description before any keys are resolved or addresses allocated
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.endpoint.trim().is_empty() {
            return Err(ValidationError::InvalidServer(
                "endpoint cannot be empty".to_string(),
            ));
        }

        if self.listen_port == 0 {
            return Err(ValidationError::InvalidServer(
                "listenPort must be non-zero".to_string(),
            ));
        }

        for (field, value) in [
            ("tunnelInterface", &self.tunnel_interface),
            ("uplinkInterface", &self.uplink_interface),
        ] {
            if value.trim().is_empty() || value.contains(char::is_whitespace) {
                return Err(ValidationError::InvalidServer(format!(
                    "{} must be a non-empty interface name, got '{}'",
                    field, value
                )));
            }
        }

        let range = AddressRange::parse(&self.cidr)
            .map_err(|e| ValidationError::InvalidServer(format!("cidr: {}", e)))?;

        if let Some(routes) = &self.routes {
            for (i, destination) in routes.accept.iter().enumerate() {
                if destination.parse::<ipnet::IpNet>().is_err() {
                    return Err(ValidationError::InvalidRoutes(format!(
                        "accept[{}] '{}' is not a valid CIDR",
                        i, destination
                    )));
                }
            }
        }

        self.validate_users(&range)
    }

    fn validate_users(&self, range: &AddressRange) -> Result<(), ValidationError> {
        if self.users.len() as u128 > range.capacity() {
            return Err(ValidationError::InvalidServer(format!(
                "cidr {} holds {} members but {} users are listed",
                range,
                range.capacity(),
                self.users.len()
            )));
        }

        let mut active_keys: HashMap<&str, usize> = HashMap::new();
        for (index, user) in self.users.iter().enumerate() {
            if !is_valid_public_key(&user.public_key) {
                return Err(ValidationError::InvalidUser {
                    index,
                    reason: "publicKey must be a base64-encoded 32-byte key".to_string(),
                });
            }

            if user.revoked {
                continue;
            }

            if let Some(first) = active_keys.insert(user.public_key.trim(), index) {
                return Err(ValidationError::InvalidUser {
                    index,
                    reason: format!("publicKey duplicates active user at index {}", first),
                });
            }
        }

        Ok(())
    }

    /// Members that will appear in the generated configuration
    pub fn active_users(&self) -> impl Iterator<Item = (usize, &Member)> {
        self.users.iter().enumerate().filter(|(_, user)| !user.revoked)
    }

    /// Firewall policy for the server, or `None` when no routes are configured
    pub fn firewall_plan(&self) -> Option<FirewallPlan> {
        self.routes.as_ref().map(|routes| {
            FirewallPlan::new(
                &self.tunnel_interface,
                &self.uplink_interface,
                routes.accept.clone(),
            )
        })
    }

    /// Default location of the server configuration, e.g. `/etc/wireguard/wg0.conf`
    pub fn default_output_path(&self) -> std::path::PathBuf {
        std::path::Path::new(WIREGUARD_CONFIG_DIR).join(format!("{}.conf", self.tunnel_interface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_A: &str = "hSDwCYkwp1R0i33ctD73Wg2/Og0mOBr066SpjqqbTmo=";
    const KEY_B: &str = "3p7bfXt9wbTTW2HC7OQ1Nz+DQ8hbeGdNrfx+FG+IK08=";

    fn parse(yaml: &str) -> NetworkSpec {
        let file: ServerFile = serde_yaml::from_str(yaml).unwrap();
        file.server
    }

    #[test]
    fn test_server_file_parsing() {
        let spec = parse(&format!(
            r#"
server:
  privateKey:
    envVar: WG_PRIVATE_KEY
  listenPort: 51820
  cidr: 10.0.0.0/24
  endpoint: vpn.example.com
  routes:
    accept:
      - 10.1.0.0/16
  dns: ["1.1.1.1", "8.8.8.8"]
  users:
    - publicKey: "{KEY_A}"
    - publicKey: "{KEY_B}"
      revoked: true
"#
        ));

        assert_eq!(spec.private_key, PrivateKeySource::env_var("WG_PRIVATE_KEY"));
        assert_eq!(spec.listen_port, 51820);
        assert_eq!(spec.routes.as_ref().unwrap().accept, vec!["10.1.0.0/16"]);
        assert_eq!(spec.dns.len(), 2);
        assert_eq!(spec.users.len(), 2);
        assert!(!spec.users[0].revoked);
        assert!(spec.users[1].revoked);
        assert_eq!(spec.tunnel_interface, "wg0");
        assert_eq!(spec.uplink_interface, "eth0");
        assert!(spec.validate().is_ok());

        let active: Vec<usize> = spec.active_users().map(|(i, _)| i).collect();
        assert_eq!(active, vec![0]);
    }

    #[test]
    fn test_optional_sections_default() {
        let spec = parse(
            r#"
server:
  privateKey: { envVar: WG_PRIVATE_KEY }
  listenPort: 51820
  cidr: 10.0.0.0/24
  endpoint: 203.0.113.7
"#,
        );
        assert!(spec.routes.is_none());
        assert!(spec.dns.is_empty());
        assert!(spec.users.is_empty());
        assert!(spec.validate().is_ok());
        assert_eq!(
            spec.default_output_path(),
            std::path::PathBuf::from("/etc/wireguard/wg0.conf")
        );
    }

    #[test]
    fn test_firewall_plan_follows_routes() {
        let mut spec = parse(
            r#"
server:
  privateKey: { envVar: WG_PRIVATE_KEY }
  listenPort: 51820
  cidr: 10.0.0.0/24
  endpoint: vpn.example.com
  uplinkInterface: ens5
  routes:
    accept: ["10.1.0.0/16"]
"#,
        );

        let plan = spec.firewall_plan().unwrap();
        assert_eq!(plan.tunnel_interface, "wg0");
        assert_eq!(plan.uplink_interface, "ens5");
        assert_eq!(plan.accept, vec!["10.1.0.0/16"]);

        spec.routes = None;
        assert!(spec.firewall_plan().is_none());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<ServerFile, _> = serde_yaml::from_str(
            r#"
server:
  privateKey: { envVar: WG_PRIVATE_KEY }
  listenPort: 51820
  cidr: 10.0.0.0/24
  endpoint: vpn.example.com
  mtu: 1420
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_errors() {
        let base = format!(
            r#"
server:
  privateKey: {{ envVar: WG_PRIVATE_KEY }}
  listenPort: 51820
  cidr: 10.0.0.0/24
  endpoint: vpn.example.com
  users:
    - publicKey: "{KEY_A}"
"#
        );

        let mut spec = parse(&base);
        spec.cidr = "10.0.0.0/33".to_string();
        assert!(matches!(spec.validate(), Err(ValidationError::InvalidServer(_))));

        let mut spec = parse(&base);
        spec.endpoint = " ".to_string();
        assert!(matches!(spec.validate(), Err(ValidationError::InvalidServer(_))));

        let mut spec = parse(&base);
        spec.routes = Some(Routes {
            accept: vec!["10.1.0.0/16".to_string(), "bogus".to_string()],
        });
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("accept[1]"));

        let mut spec = parse(&base);
        spec.users.push(Member {
            public_key: "too-short".to_string(),
            revoked: false,
        });
        assert!(matches!(
            spec.validate(),
            Err(ValidationError::InvalidUser { index: 1, .. })
        ));

        let mut spec = parse(&base);
        spec.listen_port = 0;
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidServer(_)));
        assert!(err.to_string().contains("listenPort"));

        let mut spec = parse(&base);
        spec.tunnel_interface = String::new();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_duplicate_active_keys() {
        let mut spec = parse(&format!(
            r#"
server:
  privateKey: {{ envVar: WG_PRIVATE_KEY }}
  listenPort: 51820
  cidr: 10.0.0.0/24
  endpoint: vpn.example.com
  users:
    - publicKey: "{KEY_A}"
      revoked: true
    - publicKey: "{KEY_A}"
"#
        ));
        // A revoked key may be reissued to a new slot
        assert!(spec.validate().is_ok());

        spec.users[0].revoked = false;
        assert!(matches!(
            spec.validate(),
            Err(ValidationError::InvalidUser { index: 1, .. })
        ));
    }

    #[test]
    fn test_range_capacity() {
        let mut spec = parse(&format!(
            r#"
server:
  privateKey: {{ envVar: WG_PRIVATE_KEY }}
  listenPort: 51820
  cidr: 10.0.0.0/30
  endpoint: vpn.example.com
  users:
    - publicKey: "{KEY_A}"
"#
        ));
        assert!(spec.validate().is_ok());

        spec.users.push(Member {
            public_key: KEY_B.to_string(),
            revoked: true,
        });
        assert!(spec.validate().is_err());
    }
}
