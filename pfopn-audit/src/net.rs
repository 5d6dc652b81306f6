//! Address and CIDR parsing helpers shared by the normalizer and validators.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnet::IpNet;

/// Parse `address/prefix` where the prefix fits the address family.
///
/// Host bits may be set (`192.168.1.1/24`), as interface addresses are
/// written that way.
pub fn parse_cidr(value: &str) -> Option<IpNet> {
    value.trim().parse::<IpNet>().ok()
}

pub fn is_cidr(value: &str) -> bool {
    parse_cidr(value).is_some()
}

pub fn is_ipv4(value: &str) -> bool {
    value.trim().parse::<Ipv4Addr>().is_ok()
}

pub fn is_ipv6(value: &str) -> bool {
    value.trim().parse::<Ipv6Addr>().is_ok()
}

pub fn is_ip(value: &str) -> bool {
    value.trim().parse::<IpAddr>().is_ok()
}

/// Rewrite a bare host address as a single-host CIDR.
///
/// Values that already are CIDRs, or are not addresses at all, yield `None`.
pub fn host_cidr(value: &str) -> Option<String> {
    if is_cidr(value) {
        return None;
    }
    let ip = value.trim().parse::<IpAddr>().ok()?;
    Some(IpNet::from(ip).to_string())
}

/// Numeric value of a dotted IPv4 address, most significant octet first.
pub fn ipv4_value(value: &str) -> Option<u32> {
    value.trim().parse::<Ipv4Addr>().ok().map(u32::from)
}
