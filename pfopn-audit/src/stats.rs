//! Configuration statistics and scores.
//!
//! Statistics are computed from scratch on every call from the normalized
//! document and the findings gathered so far.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::ConfigurationDocument;
use crate::report::Findings;

/// Denominator of the complexity score; a configuration reaching this
/// weighted size scores 100.
pub const MAX_REASONABLE_COMPLEXITY: usize = 1000;

const WEIGHT_INTERFACES: usize = 5;
const WEIGHT_RULES: usize = 2;
const WEIGHT_USERS: usize = 3;
const WEIGHT_GROUPS: usize = 3;
const WEIGHT_SYSCTL: usize = 4;
const WEIGHT_SERVICES: usize = 6;
const WEIGHT_DHCP_SCOPES: usize = 4;
const WEIGHT_LB_MONITORS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_interfaces: usize,
    pub enabled_interfaces: usize,
    pub interface_names: Vec<String>,
    pub total_firewall_rules: usize,
    pub rules_by_interface: BTreeMap<String, usize>,
    pub rules_by_type: BTreeMap<String, usize>,
    pub nat_entries: usize,
    pub nat_mode: String,
    pub dhcp_scopes: usize,
    pub total_users: usize,
    pub users_by_scope: BTreeMap<String, usize>,
    pub total_groups: usize,
    pub groups_by_scope: BTreeMap<String, usize>,
    pub enabled_services: Vec<String>,
    pub total_services: usize,
    pub sysctl_settings: usize,
    pub load_balancer_monitors: usize,
    pub security_features: Vec<String>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_config_items: usize,
    pub total_findings: usize,
    /// 0..=100, higher is better.
    pub security_score: u32,
    /// 0..=100, higher is more complex.
    pub config_complexity: u32,
    pub has_security_features: bool,
}

impl Statistics {
    pub fn from_document(doc: &ConfigurationDocument, findings: &Findings) -> Self {
        let mut stats = Statistics {
            total_interfaces: doc.interfaces.len(),
            enabled_interfaces: doc.interfaces.iter().filter(|i| i.enable).count(),
            interface_names: doc.interfaces.iter().map(|i| i.name.clone()).collect(),
            total_firewall_rules: doc.filter.rules.len(),
            nat_entries: doc.nat.rules.len() + doc.nat.outbound.rules.len(),
            nat_mode: doc.nat.outbound.mode.clone(),
            dhcp_scopes: doc.dhcpd.len(),
            total_users: doc.system.users.len(),
            total_groups: doc.system.groups.len(),
            sysctl_settings: doc.sysctl.len(),
            load_balancer_monitors: doc.load_balancer.monitor_types.len(),
            ..Statistics::default()
        };

        for rule in &doc.filter.rules {
            for iface in rule.interfaces() {
                *stats.rules_by_interface.entry(iface.to_string()).or_default() += 1;
            }
            *stats.rules_by_type.entry(rule.rule_type.clone()).or_default() += 1;
        }
        for user in &doc.system.users {
            *stats.users_by_scope.entry(user.scope.clone()).or_default() += 1;
        }
        for group in &doc.system.groups {
            *stats.groups_by_scope.entry(group.scope.clone()).or_default() += 1;
        }

        stats.enabled_services = enabled_services(doc);
        stats.total_services = stats.enabled_services.len();
        stats.security_features = security_features(doc);

        stats.summary = Summary {
            total_config_items: stats.total_interfaces
                + stats.total_firewall_rules
                + stats.nat_entries
                + stats.dhcp_scopes
                + stats.total_users
                + stats.total_groups
                + stats.sysctl_settings
                + stats.total_services
                + stats.load_balancer_monitors,
            total_findings: findings.len(),
            security_score: security_score(doc, &stats),
            config_complexity: complexity_score(&stats),
            has_security_features: !stats.security_features.is_empty(),
        };
        stats
    }
}

fn enabled_services(doc: &ConfigurationDocument) -> Vec<String> {
    [
        ("Unbound DNS", doc.unbound.enable),
        ("Dnsmasq DNS", doc.dnsmasq.enable),
        ("SNMP", !doc.snmpd.rocommunity.is_empty()),
        ("SSH", doc.system.ssh.enabled),
        ("NTP", !doc.system.timeservers.is_empty()),
    ]
    .into_iter()
    .filter_map(|(name, on)| on.then(|| name.to_string()))
    .collect()
}

fn security_features(doc: &ConfigurationDocument) -> Vec<String> {
    let mut features = Vec::new();
    if doc.interfaces.iter().any(|i| i.block_private) {
        features.push("Block Private Networks".to_string());
    }
    if doc.interfaces.iter().any(|i| i.block_bogons) {
        features.push("Block Bogon Networks".to_string());
    }
    if is_https(doc) {
        features.push("HTTPS Web GUI".to_string());
    }
    if doc.system.disable_nat_reflection {
        features.push("NAT Reflection Disabled".to_string());
    }
    features
}

fn is_https(doc: &ConfigurationDocument) -> bool {
    doc.system.webgui.protocol.eq_ignore_ascii_case("https")
}

fn security_score(doc: &ConfigurationDocument, stats: &Statistics) -> u32 {
    let mut score = 10 * stats.security_features.len();
    if stats.total_firewall_rules > 0 {
        score += 20;
    }
    if is_https(doc) {
        score += 15;
    }
    if !doc.system.ssh.group.is_empty() {
        score += 10;
    }
    clamp_score(score)
}

fn complexity_score(stats: &Statistics) -> u32 {
    let weighted = WEIGHT_INTERFACES * stats.total_interfaces
        + WEIGHT_RULES * stats.total_firewall_rules
        + WEIGHT_USERS * stats.total_users
        + WEIGHT_GROUPS * stats.total_groups
        + WEIGHT_SYSCTL * stats.sysctl_settings
        + WEIGHT_SERVICES * stats.total_services
        + WEIGHT_DHCP_SCOPES * stats.dhcp_scopes
        + WEIGHT_LB_MONITORS * stats.load_balancer_monitors;
    clamp_score(weighted.saturating_mul(100) / MAX_REASONABLE_COMPLEXITY)
}

fn clamp_score(value: usize) -> u32 {
    value.min(100) as u32
}
