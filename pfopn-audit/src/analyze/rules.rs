//! Firewall rule analysis: shadowed rules, duplicates and overly broad passes.
//!
//! Rules are partitioned by their interface set, lowercased and in sorted
//! order, so `opt1,LAN` and `lan,opt1` share the partition `lan+opt1`. Each
//! partition is scanned in its original relative order.
//!
//! ## Checks
//!
//! - **Shadowing**: an enabled `block` rule with source `any` makes every
//!   later rule on the same interface unreachable. One finding is emitted per
//!   shadowing rule, covering the whole range behind it.
//! - **Duplicates**: every pair of equivalent rules (see [`rules_equivalent`])
//!   yields one finding, so `n` equivalent rules yield `n * (n - 1) / 2`.
//!   Partitions larger than [`Limits::duplicate_scan_limit`] are not scanned
//!   pairwise; an informational finding is emitted instead.
//! - **Overbroad passes**: an enabled, undocumented `pass` rule from `any`.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::model::{ConfigurationDocument, Rule, RuleEndpoint};
use crate::options::Limits;
use crate::report::{kind, Finding, Findings, Severity};

/// Rules bound to one interface set, with their document indexes.
struct Partition<'a> {
    interface: String,
    rules: Vec<(usize, &'a Rule)>,
}

/// Run all rule checks and append their findings.
pub fn rule_findings(doc: &ConfigurationDocument, limits: &Limits, findings: &mut Findings) {
    let partitions = partition_by_interface(&doc.filter.rules);
    debug!(
        rules = doc.filter.rules.len(),
        partitions = partitions.len(),
        "analyzing firewall rules"
    );
    for partition in &partitions {
        scan_partition(partition, limits, findings);
    }
}

/// Whether two rules match the same traffic.
///
/// Compares action, IP protocol, the set of interfaces, the source network
/// and the resolved destination (network, port and negation). Rules that
/// differ only in their description are equivalent.
pub fn rules_equivalent(a: &Rule, b: &Rule) -> bool {
    a.rule_type == b.rule_type
        && a.ipprotocol == b.ipprotocol
        && interface_set(a) == interface_set(b)
        && a.source.network == b.source.network
        && ResolvedEndpoint::of(&a.destination) == ResolvedEndpoint::of(&b.destination)
}

#[derive(Debug, PartialEq, Eq)]
struct ResolvedEndpoint<'a> {
    network: &'a str,
    port: &'a str,
    not: bool,
}

impl<'a> ResolvedEndpoint<'a> {
    /// An unspecified network matches anything.
    fn of(endpoint: &'a RuleEndpoint) -> Self {
        let network = endpoint.network.trim();
        Self {
            network: if network.is_empty() { "any" } else { network },
            port: endpoint.port.trim(),
            not: endpoint.not,
        }
    }
}

fn interface_set(rule: &Rule) -> BTreeSet<String> {
    rule.interfaces()
        .into_iter()
        .map(str::to_ascii_lowercase)
        .collect()
}

/// Partition key: the interface set joined with `+`.
fn interface_key(rule: &Rule) -> String {
    interface_set(rule).into_iter().collect::<Vec<_>>().join("+")
}

fn partition_by_interface(rules: &[Rule]) -> Vec<Partition<'_>> {
    let mut by_interface: BTreeMap<String, Vec<(usize, &Rule)>> = BTreeMap::new();
    for (idx, rule) in rules.iter().enumerate() {
        by_interface
            .entry(interface_key(rule))
            .or_default()
            .push((idx, rule));
    }
    by_interface
        .into_iter()
        .map(|(interface, rules)| Partition { interface, rules })
        .collect()
}

fn scan_partition(partition: &Partition<'_>, limits: &Limits, findings: &mut Findings) {
    let iface = display_interface(&partition.interface);
    let last = partition.rules.len().saturating_sub(1);

    for (pos, (idx, rule)) in partition.rules.iter().enumerate() {
        if is_block_all(rule) && pos < last {
            findings.add(Severity::Medium, shadow_finding(iface, pos, last, *idx));
        }
        if is_overbroad_pass(rule) {
            findings.add(Severity::High, overbroad_finding(iface, pos, *idx));
        }
    }

    let n = partition.rules.len();
    if n > limits.duplicate_scan_limit {
        warn!(
            interface = iface,
            rules = n,
            limit = limits.duplicate_scan_limit,
            "skipping pairwise duplicate scan"
        );
        findings.add(
            Severity::Info,
            Finding::new(kind::DUPLICATE_RULE, "Duplicate Rule Scan Skipped")
                .description(format!(
                    "Interface '{iface}' has {n} rules, above the duplicate scan limit of {}.",
                    limits.duplicate_scan_limit
                ))
                .recommendation("Consolidate rules with aliases, or raise the limit to scan them.")
                .component(format!("interfaces.{iface}")),
        );
        return;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let (_, a) = partition.rules[i];
            let (idx_b, b) = partition.rules[j];
            if rules_equivalent(a, b) {
                findings.add(Severity::Low, duplicate_finding(iface, i, j, idx_b));
            }
        }
    }
}

fn is_block_all(rule: &Rule) -> bool {
    !rule.disabled && rule.rule_type == "block" && rule.source.network == "any"
}

fn is_overbroad_pass(rule: &Rule) -> bool {
    !rule.disabled
        && rule.rule_type == "pass"
        && rule.source.network == "any"
        && rule.description.trim().is_empty()
}

fn shadow_finding(iface: &str, pos: usize, last: usize, idx: usize) -> Finding {
    let start = pos + 1;
    Finding::new(kind::DEAD_RULE, "Unreachable Rules After Block All")
        .description(format!(
            "Block-all rule at position {pos} on interface '{iface}' precedes {} rule(s) at positions {start}-{last} that can never match.",
            last - pos
        ))
        .recommendation("Remove the unreachable rules or move them above the block-all rule.")
        .component(format!("filter.rule[{idx}]"))
        .reference(format!("{iface}[{start}..={last}]"))
}

fn duplicate_finding(iface: &str, first: usize, second: usize, idx: usize) -> Finding {
    Finding::new(kind::DUPLICATE_RULE, "Duplicate Firewall Rule")
        .description(format!(
            "Rules at positions {first} and {second} on interface '{iface}' are equivalent."
        ))
        .recommendation("Remove one of the rules; they match the same traffic.")
        .component(format!("filter.rule[{idx}]"))
        .reference(format!("{iface}[{first}],{iface}[{second}]"))
}

fn overbroad_finding(iface: &str, pos: usize, idx: usize) -> Finding {
    Finding::new(kind::SECURITY, "Overly Broad Pass Rule")
        .description(format!(
            "Pass rule at position {pos} on interface '{iface}' allows any source and has no description."
        ))
        .recommendation("Restrict the source network and document the purpose of the rule.")
        .component(format!("filter.rule[{idx}]"))
}

fn display_interface(raw: &str) -> &str {
    if raw.is_empty() {
        "(none)"
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::{rule_findings, rules_equivalent};
    use crate::model::{ConfigurationDocument, Rule, RuleEndpoint};
    use crate::options::Limits;
    use crate::report::{kind, Findings, Severity};

    fn rule(iface: &str, kind: &str, source: &str, descr: &str) -> Rule {
        Rule {
            rule_type: kind.to_string(),
            ipprotocol: "inet".to_string(),
            interface: iface.to_string(),
            source: RuleEndpoint {
                network: source.to_string(),
                ..RuleEndpoint::default()
            },
            destination: RuleEndpoint {
                network: "any".to_string(),
                ..RuleEndpoint::default()
            },
            description: descr.to_string(),
            ..Rule::default()
        }
    }

    fn analyze(rules: Vec<Rule>) -> Findings {
        analyze_with(rules, Limits::default())
    }

    fn analyze_with(rules: Vec<Rule>, limits: Limits) -> Findings {
        let mut doc = ConfigurationDocument::default();
        doc.filter.rules = rules;
        let mut findings = Findings::default();
        rule_findings(&doc, &limits, &mut findings);
        findings
    }

    #[test]
    fn equivalence_is_reflexive_including_default_rule() {
        let zero = Rule::default();
        assert!(rules_equivalent(&zero, &zero));
        let r = rule("lan", "pass", "10.0.0.0/8", "x");
        assert!(rules_equivalent(&r, &r));
    }

    #[test]
    fn equivalence_ignores_description_only() {
        let a = rule("lan", "pass", "lan", "first");
        let mut b = a.clone();
        b.description = "something else entirely".to_string();
        assert!(rules_equivalent(&a, &b));

        let mut c = a.clone();
        c.ipprotocol = "inet6".to_string();
        assert!(!rules_equivalent(&a, &c));

        let mut d = a.clone();
        d.destination.port = "443".to_string();
        assert!(!rules_equivalent(&a, &d));
    }

    #[test]
    fn equivalence_resolves_empty_destination_and_interface_order() {
        let mut a = rule("lan,opt1", "block", "any", "");
        let mut b = rule("opt1, lan", "block", "any", "");
        a.destination.network = String::new();
        b.destination.network = "any".to_string();
        assert!(rules_equivalent(&a, &b));
    }

    #[test]
    fn block_all_shadows_following_rules() {
        let findings = analyze(vec![
            rule("lan", "block", "any", "deny"),
            rule("lan", "pass", "10.0.0.0/8", "x"),
        ]);
        let dead = findings.of_kind(kind::DEAD_RULE).collect::<Vec<_>>();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].0, Severity::Medium);
        assert_eq!(dead[0].1.title, "Unreachable Rules After Block All");
        assert_eq!(dead[0].1.reference, "lan[1..=1]");
    }

    #[test]
    fn block_all_as_last_rule_shadows_nothing() {
        let findings = analyze(vec![
            rule("lan", "pass", "10.0.0.0/8", "x"),
            rule("lan", "block", "any", "deny"),
        ]);
        assert_eq!(findings.of_kind(kind::DEAD_RULE).count(), 0);
    }

    #[test]
    fn one_shadow_finding_per_blocking_rule() {
        let findings = analyze(vec![
            rule("lan", "block", "any", "a"),
            rule("lan", "pass", "10.0.0.0/8", "b"),
            rule("lan", "pass", "10.1.0.0/16", "c"),
            rule("wan", "pass", "10.2.0.0/16", "d"),
        ]);
        let dead = findings.of_kind(kind::DEAD_RULE).collect::<Vec<_>>();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].1.reference, "lan[1..=2]");
    }

    #[test]
    fn disabled_block_all_does_not_shadow() {
        let mut block = rule("lan", "block", "any", "deny");
        block.disabled = true;
        let findings = analyze(vec![block, rule("lan", "pass", "10.0.0.0/8", "x")]);
        assert_eq!(findings.of_kind(kind::DEAD_RULE).count(), 0);
    }

    #[test]
    fn duplicates_differing_only_in_description() {
        let findings = analyze(vec![
            rule("lan", "pass", "lan", "one"),
            rule("lan", "pass", "lan", "two"),
        ]);
        let dupes = findings.of_kind(kind::DUPLICATE_RULE).collect::<Vec<_>>();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].0, Severity::Low);
        assert_eq!(dupes[0].1.reference, "lan[0],lan[1]");
    }

    #[test]
    fn n_equivalent_rules_yield_n_choose_two_findings() {
        let rules = (0..5)
            .map(|i| rule("lan", "pass", "lan", &format!("copy {i}")))
            .collect();
        let findings = analyze(rules);
        assert_eq!(findings.of_kind(kind::DUPLICATE_RULE).count(), 10);
    }

    #[test]
    fn duplicates_match_across_interface_order_and_case() {
        let findings = analyze(vec![
            rule("lan,opt1", "pass", "lan", "a"),
            rule("opt1, LAN", "pass", "lan", "b"),
        ]);
        let dupes = findings.of_kind(kind::DUPLICATE_RULE).collect::<Vec<_>>();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].1.reference, "lan+opt1[0],lan+opt1[1]");
        assert_eq!(dupes[0].1.component, "filter.rule[1]");

        let findings = analyze(vec![
            rule("LAN", "block", "any", "deny"),
            rule("lan", "pass", "10.0.0.0/8", "x"),
        ]);
        let dead = findings.of_kind(kind::DEAD_RULE).collect::<Vec<_>>();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].1.reference, "lan[1..=1]");
    }

    #[test]
    fn duplicates_are_not_matched_across_interfaces() {
        let findings = analyze(vec![
            rule("lan", "pass", "lan", "a"),
            rule("opt1", "pass", "lan", "a"),
        ]);
        assert_eq!(findings.of_kind(kind::DUPLICATE_RULE).count(), 0);
    }

    #[test]
    fn undocumented_pass_from_any_is_overbroad() {
        let findings = analyze(vec![rule("lan", "pass", "any", "")]);
        assert_eq!(findings.high.len(), 1);
        assert_eq!(findings.high[0].kind, kind::SECURITY);
        assert_eq!(findings.high[0].title, "Overly Broad Pass Rule");
        assert_eq!(findings.of_kind(kind::DEAD_RULE).count(), 0);
        assert_eq!(findings.of_kind(kind::DUPLICATE_RULE).count(), 0);

        let documented = analyze(vec![rule("lan", "pass", "any", "guest access")]);
        assert!(documented.high.is_empty());
    }

    #[test]
    fn oversized_partition_skips_pairwise_scan() {
        let rules = (0..4)
            .map(|i| rule("lan", "pass", "lan", &format!("copy {i}")))
            .collect();
        let findings = analyze_with(
            rules,
            Limits {
                duplicate_scan_limit: 3,
                ..Limits::default()
            },
        );
        assert!(findings.low.is_empty());
        assert_eq!(findings.info.len(), 1);
        assert_eq!(findings.info[0].title, "Duplicate Rule Scan Skipped");
    }
}
