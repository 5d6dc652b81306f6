//! Performance settings checks.
//!
//! Each disabled hardware offload is reported at Low. A filter with more
//! rules than [`Limits::max_rules`] is reported at Medium.

use crate::model::ConfigurationDocument;
use crate::options::Limits;
use crate::report::{kind, Finding, Findings, Severity};

pub fn performance_findings(doc: &ConfigurationDocument, limits: &Limits, findings: &mut Findings) {
    let offloads = [
        (
            doc.system.disable_checksum_offloading,
            "Checksum Offloading Disabled",
            "system.disablechecksumoffloading",
        ),
        (
            doc.system.disable_segmentation_offloading,
            "Segmentation Offloading Disabled",
            "system.disablesegmentationoffloading",
        ),
        (
            doc.system.disable_large_receive_offloading,
            "Large Receive Offloading Disabled",
            "system.disablelargereceiveoffloading",
        ),
    ];
    for (disabled, title, component) in offloads {
        if !disabled {
            continue;
        }
        findings.add(
            Severity::Low,
            Finding::new(kind::PERFORMANCE, title)
                .description("Hardware offloading is turned off, moving that work onto the CPU.")
                .recommendation("Re-enable offloading unless the NIC driver is known to mishandle it.")
                .component(component),
        );
    }

    let total = doc.filter.rules.len();
    if total > limits.max_rules {
        findings.add(
            Severity::Medium,
            Finding::new(kind::PERFORMANCE, "High Number of Firewall Rules")
                .description(format!(
                    "The filter has {total} rules, more than the threshold of {}.",
                    limits.max_rules
                ))
                .recommendation("Consolidate rules with aliases and remove unused ones.")
                .component("filter.rule"),
        );
    }
}
