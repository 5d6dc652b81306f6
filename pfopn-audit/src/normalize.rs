//! Document normalization.
//!
//! [`normalize`] produces the canonical form every later phase works on:
//!
//! 1. **Defaults**: empty settings are filled with the platform defaults.
//! 2. **Addresses**: bare host addresses in rule endpoints become `/32` or
//!    `/128` CIDRs. Keywords, interface references and invalid values are
//!    left for the validator.
//! 3. **Ordering**: order-insignificant collections are sorted so equal
//!    content always yields identical output.
//!
//! Normalization is idempotent: a normalized document is a fixed point.

use crate::model::{ConfigurationDocument, RuleEndpoint};
use crate::net::host_cidr;

pub const DEFAULT_OPTIMIZATION: &str = "normal";
pub const DEFAULT_WEBGUI_PROTOCOL: &str = "https";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_BOGONS_INTERVAL: &str = "monthly";
pub const DEFAULT_NAT_OUTBOUND_MODE: &str = "automatic";
pub const DEFAULT_THEME: &str = "opnsense";

/// Endpoint values that are never rewritten as addresses.
const RESERVED_NETWORKS: &[&str] = &["any", "(self)"];

/// Return a normalized copy of `doc`. The input is never modified.
pub fn normalize(doc: &ConfigurationDocument) -> ConfigurationDocument {
    let mut out = doc.clone();
    fill_defaults(&mut out);
    canonicalize_addresses(&mut out);
    sort_collections(&mut out);
    out
}

/// Fill empty settings with their defaults.
pub fn fill_defaults(doc: &mut ConfigurationDocument) {
    default_if_empty(&mut doc.system.optimization, DEFAULT_OPTIMIZATION);
    default_if_empty(&mut doc.system.webgui.protocol, DEFAULT_WEBGUI_PROTOCOL);
    default_if_empty(&mut doc.system.timezone, DEFAULT_TIMEZONE);
    default_if_empty(&mut doc.system.bogons.interval, DEFAULT_BOGONS_INTERVAL);
    default_if_empty(&mut doc.nat.outbound.mode, DEFAULT_NAT_OUTBOUND_MODE);
    default_if_empty(&mut doc.theme, DEFAULT_THEME);
}

/// Rewrite bare host addresses in rule endpoints as single-host CIDRs.
pub fn canonicalize_addresses(doc: &mut ConfigurationDocument) {
    for rule in &mut doc.filter.rules {
        canonicalize_endpoint(&mut rule.source);
        canonicalize_endpoint(&mut rule.destination);
    }
}

fn canonicalize_endpoint(endpoint: &mut RuleEndpoint) {
    let network = endpoint.network.trim();
    if network.is_empty() || RESERVED_NETWORKS.contains(&network) {
        return;
    }
    if let Some(cidr) = host_cidr(network) {
        endpoint.network = cidr;
    }
}

/// Sort order-insignificant collections.
///
/// All sorts are stable, so entries with equal keys keep their relative
/// order and a second pass changes nothing.
pub fn sort_collections(doc: &mut ConfigurationDocument) {
    doc.system.users.sort_by(|a, b| a.name.cmp(&b.name));
    doc.system.groups.sort_by(|a, b| a.name.cmp(&b.name));
    doc.sysctl.sort_by(|a, b| a.tunable.cmp(&b.tunable));
    doc.filter.rules.sort_by(|a, b| {
        a.interface
            .cmp(&b.interface)
            .then_with(|| a.rule_type.cmp(&b.rule_type))
            .then_with(|| a.description.cmp(&b.description))
    });
    doc.load_balancer
        .monitor_types
        .sort_by(|a, b| a.name.cmp(&b.name));
}

fn default_if_empty(field: &mut String, default: &str) {
    if field.trim().is_empty() {
        *field = default.to_string();
    }
}
