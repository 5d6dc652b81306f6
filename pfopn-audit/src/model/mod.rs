//! Typed configuration document.
//!
//! The model mirrors the sections of a pfSense/OPNsense `config.xml` that the
//! audit pipeline reasons about. Values are kept as the raw trimmed text found
//! in the export (an empty string means "not set") so malformed input survives
//! mapping and is reported by the validator instead of being rejected early.
//!
//! Interfaces and DHCP scopes are keyed by name but stored as vectors, which
//! keeps document order stable for any number of named interfaces.

use std::collections::BTreeSet;

use serde::Serialize;

pub mod xml;

pub use xml::ModelError;

/// A parsed firewall configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigurationDocument {
    /// Root tag of the export (`opnsense` or `pfsense`).
    pub platform: String,
    pub version: String,
    pub theme: String,
    pub system: System,
    pub interfaces: Interfaces,
    pub dhcpd: Dhcpd,
    pub filter: Filter,
    pub nat: Nat,
    pub sysctl: Vec<SysctlItem>,
    pub snmpd: Snmpd,
    pub unbound: ServiceToggle,
    pub dnsmasq: ServiceToggle,
    pub load_balancer: LoadBalancer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct System {
    pub hostname: String,
    pub domain: String,
    pub optimization: String,
    pub timezone: String,
    pub timeservers: Vec<String>,
    pub dns_servers: Vec<String>,
    pub webgui: WebGui,
    pub ssh: Ssh,
    pub bogons: Bogons,
    pub powerd_ac_mode: String,
    pub powerd_battery_mode: String,
    pub powerd_normal_mode: String,
    pub disable_checksum_offloading: bool,
    pub disable_segmentation_offloading: bool,
    pub disable_large_receive_offloading: bool,
    pub disable_nat_reflection: bool,
    pub ipv6_allow: bool,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebGui {
    pub protocol: String,
    pub ssl_certref: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ssh {
    /// Group allowed to log in over SSH; non-empty means SSH is configured.
    pub group: String,
    pub enabled: bool,
    pub permit_root_login: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bogons {
    pub interval: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct User {
    pub name: String,
    pub uid: String,
    pub groupname: String,
    pub scope: String,
    pub description: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: String,
    pub gid: String,
    pub scope: String,
    pub description: String,
    pub members: Vec<String>,
    pub privileges: Vec<String>,
}

/// One logical interface (`wan`, `lan`, `opt1`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub name: String,
    pub enable: bool,
    /// Physical device, e.g. `igb0`.
    pub device: String,
    pub description: String,
    pub ipaddr: String,
    pub subnet: String,
    pub ipaddrv6: String,
    pub subnetv6: String,
    pub gateway: String,
    pub gatewayv6: String,
    pub track6_interface: String,
    pub track6_prefix_id: String,
    pub mtu: String,
    pub block_private: bool,
    pub block_bogons: bool,
}

/// Interfaces in document order, addressed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Interfaces(pub Vec<Interface>);

impl Interfaces {
    pub fn get(&self, name: &str) -> Option<&Interface> {
        self.0.iter().find(|iface| iface.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interface> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Declared interface names, lowercased for case-insensitive lookups.
    pub fn names(&self) -> BTreeSet<String> {
        self.0
            .iter()
            .map(|iface| iface.name.to_ascii_lowercase())
            .collect()
    }
}

/// DHCPv4 server scopes keyed by interface name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dhcpd(pub Vec<DhcpScope>);

impl Dhcpd {
    pub fn get(&self, interface: &str) -> Option<&DhcpScope> {
        self.0
            .iter()
            .find(|scope| scope.interface.eq_ignore_ascii_case(interface))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DhcpScope> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DhcpScope {
    pub interface: String,
    pub enable: bool,
    pub range: DhcpRange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DhcpRange {
    pub from: String,
    pub to: String,
}

impl DhcpRange {
    pub fn is_set(&self) -> bool {
        !self.from.is_empty() || !self.to.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub rules: Vec<Rule>,
}

/// A firewall filter rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// `pass`, `block` or `reject`.
    #[serde(rename = "type")]
    pub rule_type: String,
    /// `inet`, `inet6` or `inet46`.
    pub ipprotocol: String,
    /// One or more interface names, comma separated.
    pub interface: String,
    pub protocol: String,
    pub source: RuleEndpoint,
    pub destination: RuleEndpoint,
    pub description: String,
    pub disabled: bool,
    pub tracker: String,
}

impl Rule {
    /// Interface names this rule is bound to.
    pub fn interfaces(&self) -> Vec<&str> {
        split_interfaces(&self.interface)
    }
}

/// Split a comma/space separated interface list.
pub fn split_interfaces(raw: &str) -> Vec<&str> {
    raw.split([',', ' ', '\t', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Source or destination of a rule.
///
/// `network` holds `any` for `<any/>`, a CIDR, an interface name, an
/// `<iface>ip` self reference, or `(self)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleEndpoint {
    pub network: String,
    pub port: String,
    pub not: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Nat {
    pub outbound: OutboundNat,
    pub rules: Vec<NatRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutboundNat {
    pub mode: String,
    pub rules: Vec<NatRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NatRule {
    pub interface: String,
    pub protocol: String,
    pub target: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SysctlItem {
    pub tunable: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snmpd {
    pub syslocation: String,
    pub syscontact: String,
    pub rocommunity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceToggle {
    pub enable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadBalancer {
    pub monitor_types: Vec<MonitorType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitorType {
    pub name: String,
    pub kind: String,
    pub description: String,
}
