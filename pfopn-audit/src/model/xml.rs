//! Mapping from a parsed XML tree into [`ConfigurationDocument`].
//!
//! Only the sections the audit pipeline reads are mapped; everything else in
//! the export is ignored. Missing elements map to empty values and never fail.

use std::path::Path;

use thiserror::Error;
use xml_tree_core::{parse, parse_file, ParseError, XmlNode};

use super::{
    Bogons, ConfigurationDocument, DhcpRange, DhcpScope, Dhcpd, Filter, Group, Interface,
    Interfaces, LoadBalancer, MonitorType, Nat, NatRule, OutboundNat, Rule, RuleEndpoint,
    ServiceToggle, Snmpd, Ssh, SysctlItem, System, User, WebGui,
};

/// Errors returned while building a document from XML.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("unsupported configuration root '{0}' (expected opnsense or pfsense)")]
    UnsupportedRoot(String),
}

impl ConfigurationDocument {
    /// Build a document from an already parsed root element.
    pub fn from_xml(root: &XmlNode) -> Result<Self, ModelError> {
        let platform = root.tag.to_ascii_lowercase();
        if platform != "opnsense" && platform != "pfsense" {
            return Err(ModelError::UnsupportedRoot(root.tag.clone()));
        }
        Ok(Self {
            platform,
            version: text(root, &["version"]),
            theme: text(root, &["theme"]),
            system: map_system(root.get_child("system")),
            interfaces: map_interfaces(root.get_child("interfaces")),
            dhcpd: map_dhcpd(root.get_child("dhcpd")),
            filter: map_filter(root.get_child("filter")),
            nat: map_nat(root.get_child("nat")),
            sysctl: map_sysctl(root.get_child("sysctl")),
            snmpd: map_snmpd(root.get_child("snmpd")),
            unbound: toggle(root.get_child("unbound")),
            dnsmasq: toggle(root.get_child("dnsmasq")),
            load_balancer: map_load_balancer(root.get_child("load_balancer")),
        })
    }

    /// Parse XML bytes into a document.
    pub fn from_xml_bytes(xml: &[u8]) -> Result<Self, ModelError> {
        Self::from_xml(&parse(xml)?)
    }

    /// Parse an XML file into a document.
    pub fn from_xml_file(path: &Path) -> Result<Self, ModelError> {
        Self::from_xml(&parse_file(path)?)
    }
}

fn map_system(node: Option<&XmlNode>) -> System {
    let Some(sys) = node else {
        return System::default();
    };
    System {
        hostname: text(sys, &["hostname"]),
        domain: text(sys, &["domain"]),
        optimization: text(sys, &["optimization"]),
        timezone: text(sys, &["timezone"]),
        timeservers: text(sys, &["timeservers"])
            .split_whitespace()
            .map(ToOwned::to_owned)
            .collect(),
        dns_servers: all_texts(sys, "dnsserver"),
        webgui: WebGui {
            protocol: text(sys, &["webgui", "protocol"]),
            ssl_certref: text(sys, &["webgui", "ssl-certref"]),
        },
        ssh: Ssh {
            group: text(sys, &["ssh", "group"]),
            enabled: flag(sys, &["ssh", "enabled"]),
            permit_root_login: flag(sys, &["ssh", "permitrootlogin"]),
        },
        bogons: Bogons {
            interval: text(sys, &["bogons", "interval"]),
        },
        powerd_ac_mode: text(sys, &["powerd_ac_mode"]),
        powerd_battery_mode: text(sys, &["powerd_battery_mode"]),
        powerd_normal_mode: text(sys, &["powerd_normal_mode"]),
        disable_checksum_offloading: flag(sys, &["disablechecksumoffloading"]),
        disable_segmentation_offloading: flag(sys, &["disablesegmentationoffloading"]),
        disable_large_receive_offloading: flag(sys, &["disablelargereceiveoffloading"]),
        disable_nat_reflection: flag(sys, &["disablenatreflection"]),
        ipv6_allow: flag(sys, &["ipv6allow"]),
        users: sys.children_named("user").map(map_user).collect(),
        groups: sys.children_named("group").map(map_group).collect(),
    }
}

fn map_user(node: &XmlNode) -> User {
    User {
        name: text(node, &["name"]),
        uid: text(node, &["uid"]),
        groupname: text(node, &["groupname"]),
        scope: text(node, &["scope"]),
        description: text(node, &["descr"]),
        disabled: flag(node, &["disabled"]),
    }
}

fn map_group(node: &XmlNode) -> Group {
    Group {
        name: text(node, &["name"]),
        gid: text(node, &["gid"]),
        scope: text(node, &["scope"]),
        description: text(node, &["description"]),
        members: all_texts(node, "member"),
        privileges: all_texts(node, "priv"),
    }
}

fn map_interfaces(node: Option<&XmlNode>) -> Interfaces {
    let Some(interfaces) = node else {
        return Interfaces::default();
    };
    Interfaces(
        interfaces
            .children
            .iter()
            .map(|iface| Interface {
                name: iface.tag.clone(),
                enable: flag(iface, &["enable"]),
                device: text(iface, &["if"]),
                description: text(iface, &["descr"]),
                ipaddr: text(iface, &["ipaddr"]),
                subnet: text(iface, &["subnet"]),
                ipaddrv6: text(iface, &["ipaddrv6"]),
                subnetv6: text(iface, &["subnetv6"]),
                gateway: text(iface, &["gateway"]),
                gatewayv6: text(iface, &["gatewayv6"]),
                track6_interface: text(iface, &["track6-interface"]),
                track6_prefix_id: text(iface, &["track6-prefix-id"]),
                mtu: text(iface, &["mtu"]),
                block_private: flag(iface, &["blockpriv"]),
                block_bogons: flag(iface, &["blockbogons"]),
            })
            .collect(),
    )
}

fn map_dhcpd(node: Option<&XmlNode>) -> Dhcpd {
    let Some(dhcpd) = node else {
        return Dhcpd::default();
    };
    Dhcpd(
        dhcpd
            .children
            .iter()
            .map(|scope| DhcpScope {
                interface: scope.tag.clone(),
                enable: flag(scope, &["enable"]),
                range: DhcpRange {
                    from: text(scope, &["range", "from"]),
                    to: text(scope, &["range", "to"]),
                },
            })
            .collect(),
    )
}

fn map_filter(node: Option<&XmlNode>) -> Filter {
    let Some(filter) = node else {
        return Filter::default();
    };
    Filter {
        rules: filter.children_named("rule").map(map_rule).collect(),
    }
}

fn map_rule(rule: &XmlNode) -> Rule {
    Rule {
        rule_type: text(rule, &["type"]),
        ipprotocol: text(rule, &["ipprotocol"]),
        interface: text(rule, &["interface"]),
        protocol: text(rule, &["protocol"]),
        source: map_endpoint(rule.get_child("source")),
        destination: map_endpoint(rule.get_child("destination")),
        description: text(rule, &["descr"]),
        disabled: flag(rule, &["disabled"]),
        tracker: text(rule, &["tracker"]),
    }
}

fn map_endpoint(node: Option<&XmlNode>) -> RuleEndpoint {
    let Some(side) = node else {
        return RuleEndpoint::default();
    };
    let network = if side.has(&["any"]) {
        "any".to_string()
    } else {
        side.text_at(&["network"])
            .or_else(|| side.text_at(&["address"]))
            .unwrap_or("")
            .to_string()
    };
    RuleEndpoint {
        network,
        port: text(side, &["port"]),
        not: side.has(&["not"]),
    }
}

fn map_nat(node: Option<&XmlNode>) -> Nat {
    let Some(nat) = node else {
        return Nat::default();
    };
    let outbound = nat.get_child("outbound");
    Nat {
        outbound: OutboundNat {
            mode: outbound.map(|o| text(o, &["mode"])).unwrap_or_default(),
            rules: outbound
                .map(|o| o.children_named("rule").map(map_nat_rule).collect())
                .unwrap_or_default(),
        },
        rules: nat.children_named("rule").map(map_nat_rule).collect(),
    }
}

fn map_nat_rule(rule: &XmlNode) -> NatRule {
    NatRule {
        interface: text(rule, &["interface"]),
        protocol: text(rule, &["protocol"]),
        target: text(rule, &["target"]),
        description: text(rule, &["descr"]),
    }
}

fn map_sysctl(node: Option<&XmlNode>) -> Vec<SysctlItem> {
    let Some(sysctl) = node else {
        return Vec::new();
    };
    sysctl
        .children_named("item")
        .map(|item| SysctlItem {
            tunable: text(item, &["tunable"]),
            value: text(item, &["value"]),
            description: text(item, &["descr"]),
        })
        .collect()
}

fn map_snmpd(node: Option<&XmlNode>) -> Snmpd {
    let Some(snmpd) = node else {
        return Snmpd::default();
    };
    Snmpd {
        syslocation: text(snmpd, &["syslocation"]),
        syscontact: text(snmpd, &["syscontact"]),
        rocommunity: text(snmpd, &["rocommunity"]),
    }
}

fn map_load_balancer(node: Option<&XmlNode>) -> LoadBalancer {
    let Some(lb) = node else {
        return LoadBalancer::default();
    };
    LoadBalancer {
        monitor_types: lb
            .children_named("monitor_type")
            .map(|m| MonitorType {
                name: text(m, &["name"]),
                kind: text(m, &["type"]),
                description: text(m, &["descr"]),
            })
            .collect(),
    }
}

fn toggle(node: Option<&XmlNode>) -> ServiceToggle {
    ServiceToggle {
        enable: node.is_some_and(|n| flag(n, &["enable"])),
    }
}

fn text(node: &XmlNode, path: &[&str]) -> String {
    node.text_at(path).unwrap_or("").to_string()
}

fn all_texts(node: &XmlNode, tag: &str) -> Vec<String> {
    node.children_named(tag)
        .filter_map(|c| c.text_at(&[]))
        .map(ToOwned::to_owned)
        .collect()
}

/// Presence flag: `<enable/>` or `<enable>1</enable>` is set, explicit
/// negative values are not.
fn flag(node: &XmlNode, path: &[&str]) -> bool {
    let Some(found) = node.find(path) else {
        return false;
    };
    let value = found.text_at(&[]).unwrap_or("").to_ascii_lowercase();
    !matches!(value.as_str(), "0" | "no" | "false" | "off" | "disabled")
}

#[cfg(test)]
mod tests {
    use super::{ConfigurationDocument, ModelError};

    #[test]
    fn maps_interfaces_rules_and_endpoints() {
        let doc = ConfigurationDocument::from_xml_bytes(
            br#"<opnsense>
                <system><hostname>fw</hostname><user><name>root</name><uid>0</uid></user></system>
                <interfaces>
                  <wan><enable>1</enable><if>igb0</if><ipaddr>dhcp</ipaddr><blockpriv>1</blockpriv></wan>
                  <lan><enable/><if>igb1</if><ipaddr>192.168.1.1</ipaddr><subnet>24</subnet></lan>
                  <opt1><enable>0</enable></opt1>
                </interfaces>
                <filter>
                  <rule><type>pass</type><interface>lan</interface><source><network>lan</network></source><destination><any/><port>443</port></destination><descr>web</descr></rule>
                  <rule><type>block</type><interface>wan</interface><source><address>10.0.0.1</address><not/></source><destination><any/></destination><disabled>1</disabled></rule>
                </filter>
            </opnsense>"#,
        )
        .expect("map");

        assert_eq!(doc.platform, "opnsense");
        assert_eq!(doc.system.users[0].name, "root");
        assert_eq!(doc.interfaces.len(), 3);
        let wan = doc.interfaces.get("wan").expect("wan");
        assert!(wan.enable && wan.block_private);
        assert!(doc.interfaces.get("lan").expect("lan").enable);
        assert!(!doc.interfaces.get("opt1").expect("opt1").enable);

        let rules = &doc.filter.rules;
        assert_eq!(rules[0].source.network, "lan");
        assert_eq!(rules[0].destination.network, "any");
        assert_eq!(rules[0].destination.port, "443");
        assert_eq!(rules[1].source.network, "10.0.0.1");
        assert!(rules[1].source.not);
        assert!(rules[1].disabled);
    }

    #[test]
    fn maps_dhcp_nat_sysctl_and_services() {
        let doc = ConfigurationDocument::from_xml_bytes(
            br#"<pfsense>
                <dhcpd><lan><enable/><range><from>192.168.1.100</from><to>192.168.1.199</to></range></lan></dhcpd>
                <nat><outbound><mode>hybrid</mode><rule><interface>wan</interface></rule></outbound><rule><interface>wan</interface></rule></nat>
                <sysctl><item><tunable>net.inet.ip.forwarding</tunable><value>1</value></item></sysctl>
                <snmpd><rocommunity>public</rocommunity></snmpd>
                <unbound><enable>1</enable></unbound>
                <load_balancer><monitor_type><name>ICMP</name><type>icmp</type></monitor_type></load_balancer>
            </pfsense>"#,
        )
        .expect("map");

        let scope = doc.dhcpd.get("lan").expect("lan scope");
        assert!(scope.enable);
        assert_eq!(scope.range.to, "192.168.1.199");
        assert_eq!(doc.nat.outbound.mode, "hybrid");
        assert_eq!(doc.nat.outbound.rules.len(), 1);
        assert_eq!(doc.nat.rules.len(), 1);
        assert_eq!(doc.sysctl[0].tunable, "net.inet.ip.forwarding");
        assert_eq!(doc.snmpd.rocommunity, "public");
        assert!(doc.unbound.enable);
        assert!(!doc.dnsmasq.enable);
        assert_eq!(doc.load_balancer.monitor_types[0].kind, "icmp");
    }

    #[test]
    fn rejects_unknown_root() {
        let err = ConfigurationDocument::from_xml_bytes(b"<config/>").expect_err("root");
        assert!(matches!(err, ModelError::UnsupportedRoot(tag) if tag == "config"));
    }
}
