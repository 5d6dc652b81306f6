//! Cross-reference validation.
//!
//! Checks that values naming another entity point at something the document
//! actually declares:
//!
//! 1. **Rule interfaces**: every interface a rule is bound to is declared
//! 2. **Rule networks**: source/destination are a CIDR, a keyword, or a
//!    declared interface (optionally with an `ip` suffix, e.g. `lanip`)
//! 3. **Track6**: `track6-interface` is declared, and track6 addressing has
//!    both an upstream interface and a prefix ID
//! 4. **DHCP**: scopes belong to declared interfaces and ranges are ordered
//! 5. **Accounts**: users reference existing groups; names and IDs are unique
//!
//! Empty references mean "not specified" and are skipped.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ConfigurationDocument, RuleEndpoint};
use crate::net::{ipv4_value, is_cidr};

use super::ValidationError;

/// Network keywords that never name a declared interface.
pub const RESERVED_NETWORKS: &[&str] = &["any", "lan", "wan", "localhost", "loopback", "(self)"];

/// Run every reference check against `doc`.
pub fn validate_references(doc: &ConfigurationDocument) -> Vec<ValidationError> {
    let declared = doc.interfaces.names();
    let mut out = Vec::new();
    out.extend(rule_reference_errors(doc, &declared));
    out.extend(track6_errors(doc, &declared));
    out.extend(dhcp_errors(doc, &declared));
    out.extend(group_reference_errors(doc));
    out.extend(uniqueness_errors(doc));
    out
}

fn rule_reference_errors(
    doc: &ConfigurationDocument,
    declared: &BTreeSet<String>,
) -> Vec<ValidationError> {
    let mut out = Vec::new();
    for (idx, rule) in doc.filter.rules.iter().enumerate() {
        let base = format!("filter.rule[{idx}]");
        for token in rule.interfaces() {
            if !declared.contains(&token.to_ascii_lowercase()) {
                out.push(ValidationError::new(
                    format!("{base}.interface"),
                    format!("references undeclared interface '{token}'"),
                ));
            }
        }
        for (side, endpoint) in [("source", &rule.source), ("destination", &rule.destination)] {
            if let Some(err) = network_error(&base, side, endpoint, declared) {
                out.push(err);
            }
        }
    }
    out
}

fn network_error(
    base: &str,
    side: &str,
    endpoint: &RuleEndpoint,
    declared: &BTreeSet<String>,
) -> Option<ValidationError> {
    let network = endpoint.network.trim();
    if network.is_empty() || is_known_network(network, declared) {
        return None;
    }
    let stripped = network.strip_suffix("ip").unwrap_or(network);
    if is_known_network(stripped, declared) {
        return None;
    }
    Some(ValidationError::new(
        format!("{base}.{side}.network"),
        format!("'{network}' is neither a valid CIDR nor a declared interface"),
    ))
}

fn is_known_network(value: &str, declared: &BTreeSet<String>) -> bool {
    let lower = value.to_ascii_lowercase();
    RESERVED_NETWORKS.contains(&lower.as_str()) || declared.contains(&lower) || is_cidr(value)
}

fn track6_errors(
    doc: &ConfigurationDocument,
    declared: &BTreeSet<String>,
) -> Vec<ValidationError> {
    let mut out = Vec::new();
    for iface in doc.interfaces.iter() {
        let base = format!("interfaces.{}", iface.name);
        let upstream = &iface.track6_interface;
        if !upstream.is_empty() && !declared.contains(&upstream.to_ascii_lowercase()) {
            out.push(ValidationError::new(
                format!("{base}.track6-interface"),
                format!("references undeclared interface '{upstream}'"),
            ));
        }
        if iface.ipaddrv6 != "track6" {
            continue;
        }
        if upstream.is_empty() {
            out.push(ValidationError::new(
                format!("{base}.track6-interface"),
                "track6 addressing requires an upstream interface",
            ));
        }
        if iface.track6_prefix_id.is_empty() {
            out.push(ValidationError::new(
                format!("{base}.track6-prefix-id"),
                "track6 addressing requires a prefix ID",
            ));
        }
    }
    out
}

fn dhcp_errors(doc: &ConfigurationDocument, declared: &BTreeSet<String>) -> Vec<ValidationError> {
    let mut out = Vec::new();
    for scope in doc.dhcpd.iter() {
        let base = format!("dhcpd.{}", scope.interface);
        if !declared.contains(&scope.interface.to_ascii_lowercase()) {
            out.push(ValidationError::new(
                base.clone(),
                format!(
                    "DHCP scope configured for undeclared interface '{}'",
                    scope.interface
                ),
            ));
        }
        if !scope.range.is_set() {
            continue;
        }
        let from = ipv4_value(&scope.range.from);
        let to = ipv4_value(&scope.range.to);
        if from.is_none() {
            out.push(ValidationError::new(
                format!("{base}.range.from"),
                format!("invalid IPv4 address '{}'", scope.range.from),
            ));
        }
        if to.is_none() {
            out.push(ValidationError::new(
                format!("{base}.range.to"),
                format!("invalid IPv4 address '{}'", scope.range.to),
            ));
        }
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                out.push(ValidationError::new(
                    format!("{base}.range"),
                    format!(
                        "range start {} is after range end {}",
                        scope.range.from, scope.range.to
                    ),
                ));
            }
        }
    }
    out
}

fn group_reference_errors(doc: &ConfigurationDocument) -> Vec<ValidationError> {
    let groups = doc
        .system
        .groups
        .iter()
        .map(|g| g.name.as_str())
        .collect::<BTreeSet<_>>();
    doc.system
        .users
        .iter()
        .enumerate()
        .filter(|(_, user)| {
            !user.groupname.is_empty() && !groups.contains(user.groupname.as_str())
        })
        .map(|(idx, user)| {
            ValidationError::new(
                format!("system.user[{idx}].groupname"),
                format!(
                    "user '{}' references undeclared group '{}'",
                    user.name, user.groupname
                ),
            )
        })
        .collect()
}

fn uniqueness_errors(doc: &ConfigurationDocument) -> Vec<ValidationError> {
    let mut out = Vec::new();
    let groups = &doc.system.groups;
    out.extend(duplicates(
        groups.iter().map(|g| g.name.as_str()),
        "system.group",
        "name",
        "group name",
    ));
    out.extend(duplicates(
        groups.iter().map(|g| g.gid.as_str()),
        "system.group",
        "gid",
        "group ID",
    ));
    let users = &doc.system.users;
    out.extend(duplicates(
        users.iter().map(|u| u.name.as_str()),
        "system.user",
        "name",
        "user name",
    ));
    out.extend(duplicates(
        users.iter().map(|u| u.uid.as_str()),
        "system.user",
        "uid",
        "user ID",
    ));
    out
}

/// Report every repeat of a non-empty value after its first occurrence.
fn duplicates<'a>(
    values: impl Iterator<Item = &'a str>,
    collection: &str,
    field: &str,
    label: &str,
) -> Vec<ValidationError> {
    let mut first_seen: BTreeMap<&str, usize> = BTreeMap::new();
    let mut out = Vec::new();
    for (idx, value) in values.enumerate() {
        if value.is_empty() {
            continue;
        }
        match first_seen.get(value) {
            Some(first) => out.push(ValidationError::new(
                format!("{collection}[{idx}].{field}"),
                format!("duplicate {label} '{value}' (first declared at index {first})"),
            )),
            None => {
                first_seen.insert(value, idx);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::validate_references;
    use crate::model::{
        ConfigurationDocument, DhcpRange, DhcpScope, Dhcpd, Group, Interface, Interfaces, Rule,
        RuleEndpoint, User,
    };

    fn iface(name: &str) -> Interface {
        Interface {
            name: name.to_string(),
            enable: true,
            ..Interface::default()
        }
    }

    fn with_interfaces(names: &[&str]) -> ConfigurationDocument {
        ConfigurationDocument {
            interfaces: Interfaces(names.iter().map(|n| iface(n)).collect()),
            ..ConfigurationDocument::default()
        }
    }

    fn endpoint(network: &str) -> RuleEndpoint {
        RuleEndpoint {
            network: network.to_string(),
            ..RuleEndpoint::default()
        }
    }

    fn messages(doc: &ConfigurationDocument) -> Vec<(String, String)> {
        validate_references(doc)
            .into_iter()
            .map(|e| (e.field, e.message))
            .collect()
    }

    #[test]
    fn rule_interfaces_must_be_declared() {
        let mut doc = with_interfaces(&["lan", "wan"]);
        doc.filter.rules.push(Rule {
            interface: "lan,opt3".to_string(),
            ..Rule::default()
        });
        doc.filter.rules.push(Rule::default());

        assert_eq!(
            messages(&doc),
            vec![(
                "filter.rule[0].interface".to_string(),
                "references undeclared interface 'opt3'".to_string()
            )]
        );
    }

    #[test]
    fn rule_networks_accept_keywords_cidrs_and_interfaces() {
        let mut doc = with_interfaces(&["lan", "opt1", "voip"]);
        for network in ["any", "(self)", "lan", "wanip", "opt1ip", "opt1", "voip", "10.0.0.0/8", ""] {
            doc.filter.rules.push(Rule {
                interface: "lan".to_string(),
                source: endpoint(network),
                destination: endpoint("loopback"),
                ..Rule::default()
            });
        }
        assert!(messages(&doc).is_empty());

        doc.filter.rules.push(Rule {
            interface: "lan".to_string(),
            source: endpoint("opt9ip"),
            destination: endpoint("10.0.0.0/40"),
            ..Rule::default()
        });
        let fields = messages(&doc)
            .into_iter()
            .map(|(field, _)| field)
            .collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec![
                "filter.rule[9].source.network",
                "filter.rule[9].destination.network"
            ]
        );
    }

    #[test]
    fn malformed_cidr_prefixes_are_rejected() {
        let mut doc = with_interfaces(&["lan"]);
        for network in ["10.0.0.0/+8", "10.0.0.0/008"] {
            doc.filter.rules.push(Rule {
                interface: "lan".to_string(),
                source: endpoint(network),
                ..Rule::default()
            });
        }
        let fields = messages(&doc)
            .into_iter()
            .map(|(field, _)| field)
            .collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec!["filter.rule[0].source.network", "filter.rule[1].source.network"]
        );
    }

    #[test]
    fn track6_requires_declared_upstream_and_prefix() {
        let mut doc = with_interfaces(&["wan"]);
        doc.interfaces.0.push(Interface {
            name: "lan".to_string(),
            ipaddrv6: "track6".to_string(),
            track6_interface: "wan".to_string(),
            ..Interface::default()
        });
        doc.interfaces.0.push(Interface {
            name: "opt1".to_string(),
            track6_interface: "opt5".to_string(),
            ..Interface::default()
        });

        let fields = messages(&doc)
            .into_iter()
            .map(|(field, _)| field)
            .collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec!["interfaces.lan.track6-prefix-id", "interfaces.opt1.track6-interface"]
        );
    }

    #[test]
    fn dhcp_scopes_need_declared_interfaces_and_ordered_ranges() {
        let mut doc = with_interfaces(&["lan"]);
        doc.dhcpd = Dhcpd(vec![
            DhcpScope {
                interface: "lan".to_string(),
                enable: true,
                range: DhcpRange {
                    from: "192.168.1.200".to_string(),
                    to: "192.168.1.20".to_string(),
                },
            },
            DhcpScope {
                interface: "opt2".to_string(),
                enable: true,
                range: DhcpRange {
                    from: "10.0.0.10".to_string(),
                    to: "bogus".to_string(),
                },
            },
        ]);

        let fields = messages(&doc)
            .into_iter()
            .map(|(field, _)| field)
            .collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec!["dhcpd.lan.range", "dhcpd.opt2", "dhcpd.opt2.range.to"]
        );
    }

    #[test]
    fn dhcp_range_compares_octets_numerically() {
        let mut doc = with_interfaces(&["lan"]);
        doc.dhcpd = Dhcpd(vec![DhcpScope {
            interface: "lan".to_string(),
            enable: true,
            range: DhcpRange {
                from: "192.168.1.9".to_string(),
                to: "192.168.1.10".to_string(),
            },
        }]);
        assert!(messages(&doc).is_empty());
    }

    #[test]
    fn accounts_reference_groups_and_stay_unique() {
        let mut doc = ConfigurationDocument::default();
        doc.system.groups = vec![
            Group {
                name: "admins".to_string(),
                gid: "1999".to_string(),
                ..Group::default()
            },
            Group {
                name: "admins".to_string(),
                gid: "1999".to_string(),
                ..Group::default()
            },
        ];
        doc.system.users = vec![
            User {
                name: "root".to_string(),
                uid: "0".to_string(),
                groupname: "admins".to_string(),
                ..User::default()
            },
            User {
                name: "root".to_string(),
                uid: "0".to_string(),
                groupname: "ghosts".to_string(),
                ..User::default()
            },
        ];

        let fields = messages(&doc)
            .into_iter()
            .map(|(field, _)| field)
            .collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec![
                "system.user[1].groupname",
                "system.group[1].name",
                "system.group[1].gid",
                "system.user[1].name",
                "system.user[1].uid",
            ]
        );
    }
}
