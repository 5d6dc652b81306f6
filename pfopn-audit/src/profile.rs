//! Audit profiles.
//!
//! A profile is a small TOML file selecting which checks run and the numeric
//! thresholds they use:
//!
//! ```toml
//! [checks]
//! stats = true
//! dead_rules = true
//! security = true
//!
//! [limits]
//! max_rules = 250
//! ```
//!
//! Missing keys fall back to the processor defaults. When no profile path is
//! given the embedded `profiles/default.toml` is used.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::options::{Limits, ProcessorConfig, DEFAULT_DUPLICATE_SCAN_LIMIT, DEFAULT_MAX_RULES};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuditProfile {
    #[serde(default)]
    pub checks: CheckToggles,
    #[serde(default)]
    pub limits: LimitSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckToggles {
    #[serde(default = "default_true")]
    pub stats: bool,
    #[serde(default)]
    pub dead_rules: bool,
    #[serde(default)]
    pub security: bool,
    #[serde(default)]
    pub performance: bool,
    #[serde(default)]
    pub compliance: bool,
}

impl Default for CheckToggles {
    fn default() -> Self {
        Self {
            stats: true,
            dead_rules: false,
            security: false,
            performance: false,
            compliance: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LimitSettings {
    #[serde(default = "default_max_rules")]
    pub max_rules: usize,
    #[serde(default = "default_duplicate_scan_limit")]
    pub duplicate_scan_limit: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_rules: DEFAULT_MAX_RULES,
            duplicate_scan_limit: DEFAULT_DUPLICATE_SCAN_LIMIT,
        }
    }
}

/// Errors returned when loading profile files.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse profile {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl AuditProfile {
    pub fn to_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            stats: self.checks.stats,
            dead_rule_check: self.checks.dead_rules,
            security_analysis: self.checks.security,
            performance_analysis: self.checks.performance,
            compliance_check: self.checks.compliance,
            limits: Limits {
                max_rules: self.limits.max_rules,
                duplicate_scan_limit: self.limits.duplicate_scan_limit,
            },
        }
    }
}

/// Load a profile from a TOML file.
pub fn load_profile(path: &Path) -> Result<AuditProfile, ProfileLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ProfileLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_profile(&raw, path.display().to_string())
}

/// Built-in profile.
pub fn default_profile() -> Result<AuditProfile, ProfileLoadError> {
    let embedded = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/profiles/default.toml"
    ));
    parse_profile(embedded, "embedded profile".to_string())
}

/// Load `path` when given, otherwise the embedded default, with a label of
/// where it came from.
pub fn load_profile_with_source(
    path: Option<&Path>,
) -> Result<(AuditProfile, String), ProfileLoadError> {
    match path {
        Some(path) => Ok((load_profile(path)?, format!("file:{}", path.display()))),
        None => Ok((default_profile()?, "embedded".to_string())),
    }
}

fn parse_profile(raw: &str, path: String) -> Result<AuditProfile, ProfileLoadError> {
    toml::from_str(raw).map_err(|source| ProfileLoadError::Parse { path, source })
}

fn default_true() -> bool {
    true
}

fn default_max_rules() -> usize {
    DEFAULT_MAX_RULES
}

fn default_duplicate_scan_limit() -> usize {
    DEFAULT_DUPLICATE_SCAN_LIMIT
}
