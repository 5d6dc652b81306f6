//! Security posture checks.
//!
//! ## Checks
//!
//! - **Web GUI protocol** (Critical): anything other than `https`.
//! - **SNMP community** (High): the read-only community is still `public`.
//! - **WAN pass rules** (High): an enabled `pass` rule from `any` bound to a
//!   WAN-like interface.
//! - **Private networks** (Low): an enabled WAN-like interface without
//!   `blockpriv`.
//!
//! An interface is WAN-like when its name starts with `wan` or its
//! description contains `wan`, ignoring case.

use crate::model::{ConfigurationDocument, Interface};
use crate::report::{kind, Finding, Findings, Severity};

/// Community string shipped as the SNMP default.
pub const DEFAULT_SNMP_COMMUNITY: &str = "public";

pub fn security_findings(doc: &ConfigurationDocument, findings: &mut Findings) {
    let protocol = doc.system.webgui.protocol.trim();
    if !protocol.eq_ignore_ascii_case("https") {
        findings.add(
            Severity::Critical,
            Finding::new(kind::SECURITY, "Insecure Web GUI Protocol")
                .description(format!(
                    "The web GUI is served over '{protocol}', exposing credentials in clear text."
                ))
                .recommendation("Serve the web GUI over HTTPS.")
                .component("system.webgui.protocol"),
        );
    }

    if doc.snmpd.rocommunity == DEFAULT_SNMP_COMMUNITY {
        findings.add(
            Severity::High,
            Finding::new(kind::SECURITY, "Default SNMP Community String")
                .description("SNMP uses the well-known read-only community 'public'.")
                .recommendation("Change the SNMP community to a non-default value or disable SNMP.")
                .component("snmpd.rocommunity"),
        );
    }

    for (idx, rule) in doc.filter.rules.iter().enumerate() {
        if rule.disabled || rule.rule_type != "pass" || rule.source.network != "any" {
            continue;
        }
        let Some(wan) = rule
            .interfaces()
            .into_iter()
            .find(|name| is_wan_like(name, doc.interfaces.get(name)))
        else {
            continue;
        };
        findings.add(
            Severity::High,
            Finding::new(kind::SECURITY, "Overly Permissive WAN Rule")
                .description(format!(
                    "Rule {idx} passes traffic from any source on WAN interface '{wan}'."
                ))
                .recommendation("Restrict the source to known networks.")
                .component(format!("filter.rule[{idx}]")),
        );
    }

    for iface in doc.interfaces.iter() {
        if !iface.enable || iface.block_private || !is_wan_like(&iface.name, Some(iface)) {
            continue;
        }
        findings.add(
            Severity::Low,
            Finding::new(kind::SECURITY, "Private Networks Not Blocked on WAN")
                .description(format!(
                    "WAN interface '{}' accepts traffic from RFC 1918 source addresses.",
                    iface.name
                ))
                .recommendation("Enable 'Block private networks' on the interface.")
                .component(format!("interfaces.{}.blockpriv", iface.name)),
        );
    }
}

/// An interface named `wan*`, or one described as a WAN.
fn is_wan_like(name: &str, iface: Option<&Interface>) -> bool {
    name.to_ascii_lowercase().starts_with("wan")
        || iface.is_some_and(|i| i.description.to_ascii_lowercase().contains("wan"))
}

#[cfg(test)]
mod tests {
    use super::security_findings;
    use crate::model::{ConfigurationDocument, Interface, Interfaces, Rule};
    use crate::normalize::normalize;
    use crate::report::{Findings, Severity};

    fn run(doc: &ConfigurationDocument) -> Findings {
        let mut findings = Findings::default();
        security_findings(doc, &mut findings);
        findings
    }

    fn titles(findings: &Findings, severity: Severity) -> Vec<&str> {
        findings
            .get(severity)
            .iter()
            .map(|f| f.title.as_str())
            .collect()
    }

    #[test]
    fn normalized_default_protocol_is_https_and_public_community_is_high() {
        let mut doc = ConfigurationDocument::default();
        doc.snmpd.rocommunity = "public".to_string();

        let findings = run(&normalize(&doc));
        assert!(findings.critical.is_empty());
        assert_eq!(
            titles(&findings, Severity::High),
            vec!["Default SNMP Community String"]
        );
    }

    #[test]
    fn http_gui_is_critical() {
        let mut doc = ConfigurationDocument::default();
        doc.system.webgui.protocol = "http".to_string();
        assert_eq!(
            titles(&run(&doc), Severity::Critical),
            vec!["Insecure Web GUI Protocol"]
        );
    }

    #[test]
    fn pass_from_any_on_wan_is_high() {
        let mut doc = ConfigurationDocument::default();
        doc.system.webgui.protocol = "https".to_string();
        doc.interfaces = Interfaces(vec![
            Interface {
                name: "opt1".to_string(),
                description: "Backup WAN".to_string(),
                block_private: true,
                ..Interface::default()
            },
            Interface {
                name: "lan".to_string(),
                ..Interface::default()
            },
        ]);
        for iface in ["opt1", "lan"] {
            let mut rule = Rule {
                rule_type: "pass".to_string(),
                interface: iface.to_string(),
                ..Rule::default()
            };
            rule.source.network = "any".to_string();
            doc.filter.rules.push(rule);
        }

        let findings = run(&doc);
        assert_eq!(
            titles(&findings, Severity::High),
            vec!["Overly Permissive WAN Rule"]
        );
        assert_eq!(findings.high[0].component, "filter.rule[0]");
    }

    #[test]
    fn wan_without_private_blocking_is_low() {
        let mut doc = ConfigurationDocument::default();
        doc.system.webgui.protocol = "https".to_string();
        doc.interfaces = Interfaces(vec![Interface {
            name: "wan".to_string(),
            enable: true,
            ..Interface::default()
        }]);

        let findings = run(&doc);
        assert_eq!(
            titles(&findings, Severity::Low),
            vec!["Private Networks Not Blocked on WAN"]
        );

        doc.interfaces.0[0].block_private = true;
        assert!(run(&doc).is_empty());
    }
}
