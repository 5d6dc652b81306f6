//! Per-field format validation.
//!
//! ## Checks Performed
//!
//! - **System**: hostname (RFC 1123 labels), domain, timezone pattern,
//!   optimization, web GUI protocol, power modes and bogons interval
//! - **Interfaces**: IPv4/IPv6 address or addressing keyword, subnet prefix
//!   lengths, MTU range
//! - **Sysctl**: tunable naming and presence of a value
//! - **NAT**: outbound mode
//! - **Rules**: action and IP protocol
//! - **Accounts**: numeric UIDs and GIDs
//!
//! Empty optional fields are skipped; required fields report their absence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ConfigurationDocument, Interface};
use crate::net::{is_ipv4, is_ipv6};

use super::ValidationError;

pub const OPTIMIZATION_MODES: &[&str] = &["normal", "high-latency", "aggressive", "conservative"];
pub const WEBGUI_PROTOCOLS: &[&str] = &["http", "https"];
pub const POWER_MODES: &[&str] = &["hadp", "hiadp", "adaptive", "minimum", "maximum"];
pub const BOGONS_INTERVALS: &[&str] = &["monthly", "weekly", "daily", "never"];
pub const NAT_OUTBOUND_MODES: &[&str] = &["automatic", "hybrid", "advanced", "disabled"];
pub const RULE_TYPES: &[&str] = &["pass", "block", "reject"];
pub const IP_PROTOCOLS: &[&str] = &["inet", "inet6", "inet46"];
/// Non-address values accepted in `ipaddr`/`ipaddrv6`.
pub const ADDRESS_KEYWORDS: &[&str] = &["dhcp", "dhcp6", "track6", "none", "slaac"];

pub const MIN_MTU: u32 = 68;
pub const MAX_MTU: u32 = 9000;

static HOST_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("valid host label regex")
});

static TIMEZONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(UTC|GMT|Etc/[A-Za-z0-9+\-]+|(Africa|America|Antarctica|Arctic|Asia|Atlantic|Australia|Europe|Indian|Pacific)/[A-Za-z0-9_+\-]+(/[A-Za-z0-9_+\-]+)?)$",
    )
    .expect("valid timezone regex")
});

static TUNABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.]*$").expect("valid tunable regex"));

/// Run every field check against `doc`.
pub fn validate_fields(doc: &ConfigurationDocument) -> Vec<ValidationError> {
    let mut out = Vec::new();
    out.extend(system_errors(doc));
    for iface in doc.interfaces.iter() {
        out.extend(interface_errors(iface));
    }
    out.extend(sysctl_errors(doc));
    out.extend(enum_error(
        "nat.outbound.mode",
        &doc.nat.outbound.mode,
        NAT_OUTBOUND_MODES,
    ));
    out.extend(rule_errors(doc));
    out.extend(account_errors(doc));
    out
}

fn system_errors(doc: &ConfigurationDocument) -> Vec<ValidationError> {
    let sys = &doc.system;
    let mut out = Vec::new();

    if sys.hostname.is_empty() {
        out.push(ValidationError::new(
            "system.hostname",
            "hostname is required",
        ));
    } else if !is_valid_hostname(&sys.hostname) {
        out.push(ValidationError::new(
            "system.hostname",
            format!("invalid hostname '{}'", sys.hostname),
        ));
    }
    if sys.domain.is_empty() {
        out.push(ValidationError::new("system.domain", "domain is required"));
    }
    if !sys.timezone.is_empty() && !TIMEZONE.is_match(&sys.timezone) {
        out.push(ValidationError::new(
            "system.timezone",
            format!("invalid timezone '{}'", sys.timezone),
        ));
    }

    out.extend(enum_error(
        "system.optimization",
        &sys.optimization,
        OPTIMIZATION_MODES,
    ));
    out.extend(enum_error(
        "system.webgui.protocol",
        &sys.webgui.protocol,
        WEBGUI_PROTOCOLS,
    ));
    out.extend(enum_error(
        "system.powerd_ac_mode",
        &sys.powerd_ac_mode,
        POWER_MODES,
    ));
    out.extend(enum_error(
        "system.powerd_battery_mode",
        &sys.powerd_battery_mode,
        POWER_MODES,
    ));
    out.extend(enum_error(
        "system.powerd_normal_mode",
        &sys.powerd_normal_mode,
        POWER_MODES,
    ));
    out.extend(enum_error(
        "system.bogons.interval",
        &sys.bogons.interval,
        BOGONS_INTERVALS,
    ));
    out
}

fn interface_errors(iface: &Interface) -> Vec<ValidationError> {
    let base = format!("interfaces.{}", iface.name);
    let mut out = Vec::new();

    if !iface.ipaddr.is_empty() && !is_keyword(&iface.ipaddr) && !is_ipv4(&iface.ipaddr) {
        out.push(ValidationError::new(
            format!("{base}.ipaddr"),
            format!("invalid IPv4 address '{}'", iface.ipaddr),
        ));
    }
    if !iface.ipaddrv6.is_empty() && !is_keyword(&iface.ipaddrv6) && !is_ipv6(&iface.ipaddrv6) {
        out.push(ValidationError::new(
            format!("{base}.ipaddrv6"),
            format!("invalid IPv6 address '{}'", iface.ipaddrv6),
        ));
    }
    out.extend(range_error(&format!("{base}.subnet"), &iface.subnet, 0, 32));
    out.extend(range_error(
        &format!("{base}.subnetv6"),
        &iface.subnetv6,
        0,
        128,
    ));
    out.extend(range_error(&format!("{base}.mtu"), &iface.mtu, MIN_MTU, MAX_MTU));
    out
}

fn sysctl_errors(doc: &ConfigurationDocument) -> Vec<ValidationError> {
    let mut out = Vec::new();
    for (idx, item) in doc.sysctl.iter().enumerate() {
        let base = format!("sysctl[{idx}]");
        if item.tunable.is_empty() {
            out.push(ValidationError::new(
                format!("{base}.tunable"),
                "tunable name is required",
            ));
        } else if !TUNABLE.is_match(&item.tunable) || !item.tunable.contains('.') {
            out.push(ValidationError::new(
                format!("{base}.tunable"),
                format!("invalid tunable name '{}'", item.tunable),
            ));
        }
        if item.value.is_empty() {
            out.push(ValidationError::new(
                format!("{base}.value"),
                "tunable value is required",
            ));
        }
    }
    out
}

fn rule_errors(doc: &ConfigurationDocument) -> Vec<ValidationError> {
    let mut out = Vec::new();
    for (idx, rule) in doc.filter.rules.iter().enumerate() {
        let base = format!("filter.rule[{idx}]");
        out.extend(enum_error(&format!("{base}.type"), &rule.rule_type, RULE_TYPES));
        out.extend(enum_error(
            &format!("{base}.ipprotocol"),
            &rule.ipprotocol,
            IP_PROTOCOLS,
        ));
    }
    out
}

fn account_errors(doc: &ConfigurationDocument) -> Vec<ValidationError> {
    let mut out = Vec::new();
    for (idx, user) in doc.system.users.iter().enumerate() {
        if !user.uid.is_empty() && user.uid.parse::<u32>().is_err() {
            out.push(ValidationError::new(
                format!("system.user[{idx}].uid"),
                format!("uid '{}' is not a non-negative integer", user.uid),
            ));
        }
    }
    for (idx, group) in doc.system.groups.iter().enumerate() {
        if !group.gid.is_empty() && group.gid.parse::<u32>().is_err() {
            out.push(ValidationError::new(
                format!("system.group[{idx}].gid"),
                format!("gid '{}' is not a non-negative integer", group.gid),
            ));
        }
    }
    out
}

/// RFC 1123 host name: dot separated labels, at most 253 characters.
pub fn is_valid_hostname(value: &str) -> bool {
    value.len() <= 253 && value.split('.').all(|label| HOST_LABEL.is_match(label))
}

fn is_keyword(value: &str) -> bool {
    ADDRESS_KEYWORDS.contains(&value)
}

fn enum_error(field: &str, value: &str, allowed: &[&str]) -> Option<ValidationError> {
    if value.is_empty() || allowed.contains(&value) {
        return None;
    }
    Some(ValidationError::new(
        field,
        format!("'{value}' is not one of: {}", allowed.join(", ")),
    ))
}

fn range_error(field: &str, value: &str, min: u32, max: u32) -> Option<ValidationError> {
    if value.is_empty() {
        return None;
    }
    match value.parse::<u32>() {
        Ok(n) if (min..=max).contains(&n) => None,
        _ => Some(ValidationError::new(
            field,
            format!("'{value}' must be an integer between {min} and {max}"),
        )),
    }
}
