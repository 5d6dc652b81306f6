//! Cross-section consistency checks.
//!
//! The user/group check repeats the referential validator's, reporting a
//! Medium compliance finding instead of a validation error.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ConfigurationDocument;
use crate::net::is_ip;
use crate::report::{kind, Finding, Findings, Severity};

static GATEWAY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid gateway name regex"));

pub fn consistency_findings(doc: &ConfigurationDocument, findings: &mut Findings) {
    gateway_findings(doc, findings);
    dhcp_findings(doc, findings);
    group_findings(doc, findings);
}

fn gateway_findings(doc: &ConfigurationDocument, findings: &mut Findings) {
    for iface in doc.interfaces.iter() {
        let gateway = iface.gateway.trim();
        if gateway.is_empty() || iface.ipaddr.trim().is_empty() || iface.subnet.trim().is_empty() {
            continue;
        }
        if is_ip(gateway) || GATEWAY_NAME.is_match(gateway) {
            continue;
        }
        findings.add(
            Severity::Medium,
            Finding::new(kind::CONSISTENCY, "Invalid Gateway Format")
                .description(format!(
                    "Interface '{}' has gateway '{gateway}', which is neither an address nor a gateway name.",
                    iface.name
                ))
                .recommendation("Set the gateway to an IP address or the name of a configured gateway.")
                .component(format!("interfaces.{}.gateway", iface.name)),
        );
    }
}

fn dhcp_findings(doc: &ConfigurationDocument, findings: &mut Findings) {
    for scope in doc.dhcpd.iter() {
        if !scope.enable || !scope.range.is_set() {
            continue;
        }
        let Some(iface) = doc.interfaces.get(&scope.interface) else {
            continue;
        };
        if !iface.ipaddr.trim().is_empty() {
            continue;
        }
        findings.add(
            Severity::High,
            Finding::new(kind::CONSISTENCY, "DHCP Enabled Without Interface IP")
                .description(format!(
                    "DHCP serves {}-{} on interface '{}', which has no IP address.",
                    scope.range.from, scope.range.to, iface.name
                ))
                .recommendation("Assign an address to the interface or disable its DHCP server.")
                .component(format!("dhcpd.{}", scope.interface)),
        );
    }
}

fn group_findings(doc: &ConfigurationDocument, findings: &mut Findings) {
    let groups: BTreeSet<&str> = doc.system.groups.iter().map(|g| g.name.as_str()).collect();
    for (idx, user) in doc.system.users.iter().enumerate() {
        if user.groupname.is_empty() || groups.contains(user.groupname.as_str()) {
            continue;
        }
        findings.add(
            Severity::Medium,
            Finding::new(kind::CONSISTENCY, "User References Non-existent Group")
                .description(format!(
                    "User '{}' belongs to group '{}', which is not defined.",
                    user.name, user.groupname
                ))
                .recommendation("Create the group or move the user to an existing group.")
                .component(format!("system.user[{idx}].groupname")),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::consistency_findings;
    use crate::model::{
        ConfigurationDocument, DhcpRange, DhcpScope, Group, Interface, Interfaces, User,
    };
    use crate::report::Findings;

    fn lan(ipaddr: &str) -> Interface {
        Interface {
            name: "lan".to_string(),
            enable: true,
            ipaddr: ipaddr.to_string(),
            subnet: if ipaddr.is_empty() { "" } else { "24" }.to_string(),
            ..Interface::default()
        }
    }

    fn dhcp_lan() -> DhcpScope {
        DhcpScope {
            interface: "lan".to_string(),
            enable: true,
            range: DhcpRange {
                from: "192.168.1.100".to_string(),
                to: "192.168.1.199".to_string(),
            },
        }
    }

    fn run(doc: &ConfigurationDocument) -> Findings {
        let mut findings = Findings::default();
        consistency_findings(doc, &mut findings);
        findings
    }

    #[test]
    fn dhcp_without_interface_address_is_high() {
        let mut doc = ConfigurationDocument::default();
        doc.interfaces = Interfaces(vec![lan("")]);
        doc.dhcpd.0.push(dhcp_lan());

        let findings = run(&doc);
        assert_eq!(findings.high.len(), 1);
        assert_eq!(findings.high[0].title, "DHCP Enabled Without Interface IP");
        assert_eq!(findings.high[0].component, "dhcpd.lan");
    }

    #[test]
    fn dhcp_with_address_or_disabled_scope_is_clean() {
        let mut doc = ConfigurationDocument::default();
        doc.interfaces = Interfaces(vec![lan("192.168.1.1")]);
        doc.dhcpd.0.push(dhcp_lan());
        assert!(run(&doc).is_empty());

        doc.interfaces = Interfaces(vec![lan("")]);
        doc.dhcpd.0[0].enable = false;
        assert!(run(&doc).is_empty());
    }

    #[test]
    fn malformed_gateway_is_flagged() {
        let mut doc = ConfigurationDocument::default();
        let mut iface = lan("192.168.1.1");
        iface.gateway = "GW WAN!".to_string();
        doc.interfaces = Interfaces(vec![iface]);

        let findings = run(&doc);
        assert_eq!(findings.medium.len(), 1);
        assert_eq!(findings.medium[0].title, "Invalid Gateway Format");

        doc.interfaces.0[0].gateway = "WAN_DHCP".to_string();
        assert!(run(&doc).is_empty());
        doc.interfaces.0[0].gateway = "192.168.1.254".to_string();
        assert!(run(&doc).is_empty());
    }

    #[test]
    fn user_with_unknown_group_is_medium() {
        let mut doc = ConfigurationDocument::default();
        doc.system.groups.push(Group {
            name: "admins".to_string(),
            ..Group::default()
        });
        doc.system.users.push(User {
            name: "root".to_string(),
            groupname: "admins".to_string(),
            ..User::default()
        });
        doc.system.users.push(User {
            name: "bob".to_string(),
            groupname: "operators".to_string(),
            ..User::default()
        });

        let findings = run(&doc);
        assert_eq!(findings.medium.len(), 1);
        assert_eq!(findings.medium[0].component, "system.user[1].groupname");
    }
}
