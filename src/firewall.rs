//! Server firewall rules.
//!
//! Traffic arriving on the tunnel interface is forwarded through a
//! dedicated chain that accepts only the configured destinations and
//! rejects everything else. The script is re-runnable: chain creation and
//! jump/masquerade rules are guarded, and the chain is flushed before its
//! rules are re-added.

use crate::utils::script::ShellScript;

/// Name of the dedicated filtering chain
pub const DEFAULT_CHAIN: &str = "wgroute";

/// Inputs for the server's routing policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallPlan {
    pub chain: String,
    pub tunnel_interface: String,
    pub uplink_interface: String,
    /// Destination ranges members may reach, in rule order
    pub accept: Vec<String>,
}

impl FirewallPlan {
    pub fn new(
        tunnel_interface: impl Into<String>,
        uplink_interface: impl Into<String>,
        accept: Vec<String>,
    ) -> Self {
        Self {
            chain: DEFAULT_CHAIN.to_string(),
            tunnel_interface: tunnel_interface.into(),
            uplink_interface: uplink_interface.into(),
            accept,
        }
    }

    /// Build the bring-up script.
    ///
    /// Order matters: the accept rules only take effect once the chain
    /// exists and FORWARD jumps into it, and the reject rule must be last.
    pub fn script(&self) -> ShellScript {
        let chain = &self.chain;
        let tun = &self.tunnel_interface;
        let uplink = &self.uplink_interface;

        let mut script = ShellScript::new();

        script.push(format!(
            "iptables -N {chain} || echo \"{chain} chain already exists\""
        ));
        script.push(format!(
            "iptables -C FORWARD -i {tun} -j {chain} || iptables -A FORWARD -i {tun} -j {chain}"
        ));
        script.push(format!(
            "iptables -t nat -C POSTROUTING -o {uplink} -j MASQUERADE || iptables -t nat -A POSTROUTING -o {uplink} -j MASQUERADE"
        ));

        script.push(format!("iptables -F {chain}"));

        for destination in &self.accept {
            script.push(format!(
                "iptables -A {chain} -d {destination} -i {tun} -o {uplink} -j ACCEPT"
            ));
        }

        script.push(format!(
            "iptables -A {chain} -j REJECT --reject-with icmp-host-prohibited"
        ));
        script.push("echo \"Done\"");

        script
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::script::ONE_LINE_SEPARATOR;

    fn plan(accept: &[&str]) -> FirewallPlan {
        FirewallPlan::new(
            "wg0",
            "eth0",
            accept.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_script_steps_in_order() {
        let script = plan(&["10.1.0.0/16"]).script();
        let commands = script.commands();

        assert_eq!(commands.len(), 7);
        assert_eq!(commands[0], "iptables -N wgroute || echo \"wgroute chain already exists\"");
        assert_eq!(
            commands[1],
            "iptables -C FORWARD -i wg0 -j wgroute || iptables -A FORWARD -i wg0 -j wgroute"
        );
        assert!(commands[2].contains("POSTROUTING -o eth0 -j MASQUERADE"));
        assert_eq!(commands[3], "iptables -F wgroute");
        assert_eq!(
            commands[4],
            "iptables -A wgroute -d 10.1.0.0/16 -i wg0 -o eth0 -j ACCEPT"
        );
        assert_eq!(
            commands[5],
            "iptables -A wgroute -j REJECT --reject-with icmp-host-prohibited"
        );
        assert_eq!(commands[6], "echo \"Done\"");
    }

    #[test]
    fn test_one_line_order_for_any_route_count() {
        for accept in [vec![], vec!["10.1.0.0/16"], vec!["10.1.0.0/16", "192.168.5.0/24", "172.16.0.0/12"]] {
            let script = plan(&accept).script();
            let one_line = script.to_one_line();
            let parts: Vec<&str> = one_line.split(ONE_LINE_SEPARATOR).collect();

            assert_eq!(parts.len(), 6 + accept.len());
            assert!(parts[0].starts_with("iptables -N wgroute"));
            assert!(parts[1].starts_with("iptables -C FORWARD"));
            assert!(parts[2].starts_with("iptables -t nat"));
            assert_eq!(parts[3], "iptables -F wgroute");
            for (i, route) in accept.iter().enumerate() {
                assert!(parts[4 + i].contains(&format!("-d {} ", route)));
            }
            assert!(parts[4 + accept.len()].contains("REJECT"));
            assert_eq!(parts[5 + accept.len()], "echo \"Done\"");
            assert!(!one_line.contains('\n'));
        }
    }

    #[test]
    fn test_custom_interfaces() {
        let plan = FirewallPlan::new("wg1", "ens3", vec!["0.0.0.0/0".to_string()]);
        let text = plan.script().to_multi_line();
        assert!(text.contains("-i wg1 -o ens3 -j ACCEPT"));
        assert!(text.contains("POSTROUTING -o ens3"));
        assert!(!text.contains("eth0"));
    }
}
