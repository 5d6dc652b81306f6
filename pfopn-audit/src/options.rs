//! Processor configuration.
//!
//! [`ProcessorConfig`] is a set of independent feature flags plus numeric
//! [`Limits`]. It can be built two ways:
//!
//! - chained setters on the struct (`ProcessorConfig::default().security_analysis(true)`)
//! - a list of [`ProcessorOption`] values folded in order onto the default
//!
//! Flags are orthogonal: enabling one never clears another. The default
//! enables statistics only.

use std::fmt;

use serde::Serialize;

/// Default threshold above which the total rule count is reported.
pub const DEFAULT_MAX_RULES: usize = 100;
/// Default largest per-interface partition scanned pairwise for duplicates.
pub const DEFAULT_DUPLICATE_SCAN_LIMIT: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limits {
    pub max_rules: usize,
    pub duplicate_scan_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_rules: DEFAULT_MAX_RULES,
            duplicate_scan_limit: DEFAULT_DUPLICATE_SCAN_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessorConfig {
    pub stats: bool,
    pub dead_rule_check: bool,
    pub security_analysis: bool,
    pub performance_analysis: bool,
    pub compliance_check: bool,
    pub limits: Limits,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            stats: true,
            dead_rule_check: false,
            security_analysis: false,
            performance_analysis: false,
            compliance_check: false,
            limits: Limits::default(),
        }
    }
}

impl ProcessorConfig {
    /// Fold `options` in order onto the default configuration.
    pub fn from_options(options: &[ProcessorOption]) -> Self {
        Self::default().apply(options)
    }

    /// Fold `options` in order onto this configuration.
    pub fn apply(mut self, options: &[ProcessorOption]) -> Self {
        for option in options {
            option.apply(&mut self);
        }
        self
    }

    pub fn stats(mut self, on: bool) -> Self {
        self.stats = on;
        self
    }

    pub fn dead_rule_check(mut self, on: bool) -> Self {
        self.dead_rule_check = on;
        self
    }

    pub fn security_analysis(mut self, on: bool) -> Self {
        self.security_analysis = on;
        self
    }

    pub fn performance_analysis(mut self, on: bool) -> Self {
        self.performance_analysis = on;
        self
    }

    pub fn compliance_check(mut self, on: bool) -> Self {
        self.compliance_check = on;
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Names of the enabled analyzer passes, in execution order.
    pub fn enabled_checks(&self) -> Vec<&'static str> {
        [
            ("dead_rule_check", self.dead_rule_check),
            ("security_analysis", self.security_analysis),
            ("performance_analysis", self.performance_analysis),
            ("compliance_check", self.compliance_check),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

/// A deferred change to a [`ProcessorConfig`].
pub struct ProcessorOption(Box<dyn Fn(&mut ProcessorConfig) + Send + Sync>);

impl ProcessorOption {
    pub fn new(f: impl Fn(&mut ProcessorConfig) + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn apply(&self, config: &mut ProcessorConfig) {
        (self.0)(config);
    }
}

impl fmt::Debug for ProcessorOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProcessorOption(..)")
    }
}

pub fn with_stats() -> ProcessorOption {
    ProcessorOption::new(|c| c.stats = true)
}

pub fn without_stats() -> ProcessorOption {
    ProcessorOption::new(|c| c.stats = false)
}

pub fn with_dead_rule_check() -> ProcessorOption {
    ProcessorOption::new(|c| c.dead_rule_check = true)
}

pub fn with_security_analysis() -> ProcessorOption {
    ProcessorOption::new(|c| c.security_analysis = true)
}

pub fn with_performance_analysis() -> ProcessorOption {
    ProcessorOption::new(|c| c.performance_analysis = true)
}

pub fn with_compliance_check() -> ProcessorOption {
    ProcessorOption::new(|c| c.compliance_check = true)
}

/// Enable every analyzer pass and statistics.
pub fn with_all_checks() -> ProcessorOption {
    ProcessorOption::new(|c| {
        c.stats = true;
        c.dead_rule_check = true;
        c.security_analysis = true;
        c.performance_analysis = true;
        c.compliance_check = true;
    })
}

pub fn with_limits(limits: Limits) -> ProcessorOption {
    ProcessorOption::new(move |c| c.limits = limits)
}

#[cfg(test)]
mod tests {
    use super::{
        with_all_checks, with_dead_rule_check, with_limits, with_security_analysis,
        without_stats, Limits, ProcessorConfig,
    };

    #[test]
    fn default_enables_stats_only() {
        let config = ProcessorConfig::default();
        assert!(config.stats);
        assert!(config.enabled_checks().is_empty());
        assert_eq!(ProcessorConfig::from_options(&[]), config);
    }

    #[test]
    fn options_fold_in_order_without_clearing_others() {
        let config =
            ProcessorConfig::from_options(&[with_dead_rule_check(), with_security_analysis()]);
        assert!(config.stats);
        assert!(config.dead_rule_check);
        assert!(config.security_analysis);
        assert!(!config.performance_analysis);

        let config = ProcessorConfig::from_options(&[with_all_checks(), without_stats()]);
        assert!(!config.stats);
        assert_eq!(
            config.enabled_checks(),
            vec![
                "dead_rule_check",
                "security_analysis",
                "performance_analysis",
                "compliance_check"
            ]
        );
    }

    #[test]
    fn builder_matches_functional_options() {
        let limits = Limits {
            max_rules: 10,
            duplicate_scan_limit: 5,
        };
        let built = ProcessorConfig::default()
            .dead_rule_check(true)
            .limits(limits);
        let folded = ProcessorConfig::from_options(&[with_dead_rule_check(), with_limits(limits)]);
        assert_eq!(built, folded);
    }
}
