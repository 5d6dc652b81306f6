//! Audit report and findings.
//!
//! A [`Report`] is built once per processing call. Analyzer passes append
//! [`Finding`]s into per-severity buckets; nothing is ever removed or
//! reordered, so each bucket keeps insertion order.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::ConfigurationDocument;
use crate::options::ProcessorConfig;
use crate::stats::Statistics;

/// Finding severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// All severities in reporting order.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finding category tags.
pub mod kind {
    pub const VALIDATION: &str = "validation";
    pub const DEAD_RULE: &str = "dead-rule";
    pub const DUPLICATE_RULE: &str = "duplicate-rule";
    pub const UNUSED_INTERFACE: &str = "unused-interface";
    pub const SECURITY: &str = "security";
    pub const PERFORMANCE: &str = "performance";
    pub const CONSISTENCY: &str = "consistency";
}

/// One observation surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    /// Dotted path of the configuration element concerned.
    pub component: String,
    pub reference: String,
}

impl Finding {
    pub fn new(kind: &str, title: &str) -> Self {
        Self {
            kind: kind.to_string(),
            title: title.to_string(),
            description: String::new(),
            recommendation: String::new(),
            component: String::new(),
            reference: String::new(),
        }
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = value.into();
        self
    }

    pub fn recommendation(mut self, value: impl Into<String>) -> Self {
        self.recommendation = value.into();
        self
    }

    pub fn component(mut self, value: impl Into<String>) -> Self {
        self.component = value.into();
        self
    }

    pub fn reference(mut self, value: impl Into<String>) -> Self {
        self.reference = value.into();
        self
    }
}

/// Findings partitioned by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    pub critical: Vec<Finding>,
    pub high: Vec<Finding>,
    pub medium: Vec<Finding>,
    pub low: Vec<Finding>,
    pub info: Vec<Finding>,
}

impl Findings {
    /// Append a finding to the bucket for `severity`.
    pub fn add(&mut self, severity: Severity, finding: Finding) {
        self.bucket_mut(severity).push(finding);
    }

    pub fn get(&self, severity: Severity) -> &[Finding] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
            Severity::Info => &self.info,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<Finding> {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
            Severity::Info => &mut self.info,
        }
    }

    pub fn len(&self) -> usize {
        Severity::ALL.iter().map(|s| self.get(*s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate all findings, most severe bucket first.
    pub fn iter(&self) -> impl Iterator<Item = (Severity, &Finding)> + '_ {
        Severity::ALL
            .into_iter()
            .flat_map(move |sev| self.get(sev).iter().map(move |f| (sev, f)))
    }

    /// Findings of one category tag across all severities.
    pub fn of_kind<'a>(
        &'a self,
        kind: &'a str,
    ) -> impl Iterator<Item = (Severity, &'a Finding)> + 'a {
        self.iter().filter(move |(_, f)| f.kind == kind)
    }
}

/// Identity of the audited configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigInfo {
    pub platform: String,
    pub version: String,
    pub hostname: String,
    pub domain: String,
    pub theme: String,
}

impl ConfigInfo {
    pub fn from_document(doc: &ConfigurationDocument) -> Self {
        Self {
            platform: doc.platform.clone(),
            version: doc.version.clone(),
            hostname: doc.system.hostname.clone(),
            domain: doc.system.domain.clone(),
            theme: doc.theme.clone(),
        }
    }
}

/// Result of one processing call.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub config_info: ConfigInfo,
    pub normalized: ConfigurationDocument,
    pub findings: Findings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    pub processor_config: ProcessorConfig,
}

impl Report {
    pub fn new(normalized: ConfigurationDocument, processor_config: ProcessorConfig) -> Self {
        Self {
            generated_at: Utc::now(),
            config_info: ConfigInfo::from_document(&normalized),
            normalized,
            findings: Findings::default(),
            statistics: None,
            processor_config,
        }
    }

    pub fn add_finding(&mut self, severity: Severity, finding: Finding) {
        self.findings.add(severity, finding);
    }

    pub fn total_findings(&self) -> usize {
        self.findings.len()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.get(severity).len()
    }

    pub fn has_critical(&self) -> bool {
        !self.findings.critical.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{kind, Finding, Findings, Severity};

    fn finding(kind: &str, title: &str) -> Finding {
        Finding::new(kind, title).component("filter.rule[0]")
    }

    #[test]
    fn severities_order_most_severe_first() {
        let mut sorted = vec![Severity::Low, Severity::Critical, Severity::Info, Severity::High];
        sorted.sort();
        assert_eq!(
            sorted,
            vec![Severity::Critical, Severity::High, Severity::Low, Severity::Info]
        );
    }

    #[test]
    fn add_keeps_insertion_order_without_dedup() {
        let mut findings = Findings::default();
        findings.add(Severity::Low, finding(kind::DUPLICATE_RULE, "a"));
        findings.add(Severity::Critical, finding(kind::SECURITY, "b"));
        findings.add(Severity::Low, finding(kind::DUPLICATE_RULE, "a"));

        assert_eq!(findings.len(), 3);
        assert_eq!(findings.get(Severity::Low).len(), 2);
        let order = findings
            .iter()
            .map(|(sev, f)| (sev, f.title.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                (Severity::Critical, "b"),
                (Severity::Low, "a"),
                (Severity::Low, "a")
            ]
        );
        assert_eq!(findings.of_kind(kind::SECURITY).count(), 1);
    }
}
