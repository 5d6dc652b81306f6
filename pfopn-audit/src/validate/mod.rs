//! Configuration validation.
//!
//! Validation runs two independent passes over a (normalized) document:
//!
//! - [`fields`]: per-field format checks (hostnames, addresses, enumerations,
//!   numeric ranges, tunable names)
//! - [`references`]: cross-entity checks (interfaces named by rules, DHCP and
//!   track6 settings, group references, uniqueness, DHCP range ordering)
//!
//! Both are pure and total: malformed input becomes a [`ValidationError`],
//! never a panic or an early return.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::model::ConfigurationDocument;

pub mod fields;
pub mod references;

pub use fields::validate_fields;
pub use references::validate_references;

/// A single validation failure, addressed by dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A validation pass the processor runs ahead of analysis.
pub trait ConfigValidator: Send + Sync {
    fn validate(&self, doc: &ConfigurationDocument) -> Vec<ValidationError>;
}

/// Field checks followed by reference checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentValidator;

impl ConfigValidator for DocumentValidator {
    fn validate(&self, doc: &ConfigurationDocument) -> Vec<ValidationError> {
        validate_document(doc)
    }
}

/// Run every validation check and return all errors found.
pub fn validate_document(doc: &ConfigurationDocument) -> Vec<ValidationError> {
    let mut out = validate_fields(doc);
    out.extend(validate_references(doc));
    out
}
