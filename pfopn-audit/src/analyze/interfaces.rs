//! Unused interface detection.

use std::collections::BTreeSet;

use crate::model::ConfigurationDocument;
use crate::report::{kind, Finding, Findings, Severity};

/// Report enabled interfaces that nothing in the document refers to.
///
/// An interface counts as used when a rule is bound to it, a rule endpoint
/// names it (`lan` or `lanip`), a DHCP scope is configured for it, or another
/// interface tracks it for IPv6.
pub fn interface_findings(doc: &ConfigurationDocument, findings: &mut Findings) {
    let used = referenced_interfaces(doc);
    for iface in doc.interfaces.iter().filter(|i| i.enable) {
        if used.contains(&iface.name.to_ascii_lowercase()) {
            continue;
        }
        findings.add(
            Severity::Low,
            Finding::new(kind::UNUSED_INTERFACE, "Unused Interface")
                .description(format!(
                    "Interface '{}' is enabled but no rule, DHCP scope or interface refers to it.",
                    iface.name
                ))
                .recommendation("Disable the interface or add the rules it needs.")
                .component(format!("interfaces.{}", iface.name)),
        );
    }
}

fn referenced_interfaces(doc: &ConfigurationDocument) -> BTreeSet<String> {
    let mut used = BTreeSet::new();
    for rule in &doc.filter.rules {
        used.extend(rule.interfaces().into_iter().map(str::to_ascii_lowercase));
        for network in [&rule.source.network, &rule.destination.network] {
            let network = network.trim().to_ascii_lowercase();
            if let Some(stripped) = network.strip_suffix("ip") {
                used.insert(stripped.to_string());
            }
            used.insert(network);
        }
    }
    used.extend(doc.dhcpd.iter().map(|s| s.interface.to_ascii_lowercase()));
    used.extend(
        doc.interfaces
            .iter()
            .filter(|i| !i.track6_interface.is_empty())
            .map(|i| i.track6_interface.to_ascii_lowercase()),
    );
    used
}
