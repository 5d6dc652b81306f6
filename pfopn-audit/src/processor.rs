//! The processing pipeline.
//!
//! `process` turns one [`ConfigurationDocument`] into a [`Report`]:
//!
//! 1. **Normalize** a private copy of the input (the input is never mutated).
//! 2. **Validate** it; every validation error becomes a High
//!    "Configuration Validation Error" finding.
//! 3. **Analyze** with the passes enabled in [`ProcessorConfig`].
//! 4. **Statistics**, when enabled.
//!
//! Cancellation is checked before normalization, before each enabled analyzer
//! pass and before statistics. A cancelled call returns
//! [`ProcessError::Cancelled`] and no report.
//!
//! A processor holds no mutable state, so one instance can serve concurrent
//! calls from many threads.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::analyze::{
    consistency_findings, interface_findings, performance_findings, rule_findings,
    security_findings,
};
use crate::model::ConfigurationDocument;
use crate::normalize::normalize;
use crate::options::{ProcessorConfig, ProcessorOption};
use crate::render::{Format, RenderError, Renderer};
use crate::report::{kind, Finding, Report, Severity};
use crate::stats::Statistics;
use crate::validate::{ConfigValidator, DocumentValidator};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessError {
    #[error("no configuration document supplied")]
    ConfigurationNil,
    #[error("processing cancelled before {phase}")]
    Cancelled { phase: &'static str },
}

/// Something that audits a configuration document.
pub trait Processor {
    fn process(
        &self,
        cancel: &CancellationToken,
        doc: Option<&ConfigurationDocument>,
        options: &[ProcessorOption],
    ) -> Result<Report, ProcessError>;
}

/// The standard pipeline: normalize, validate, analyze, summarize.
pub struct CoreProcessor {
    validator: Box<dyn ConfigValidator>,
    renderer: Renderer,
}

impl Default for CoreProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreProcessor {
    pub fn new() -> Self {
        Self {
            validator: Box::new(DocumentValidator),
            renderer: Renderer,
        }
    }

    /// Replace the validation pass.
    pub fn with_validator(mut self, validator: impl ConfigValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Run the pipeline with an already-built configuration.
    pub fn process_with_config(
        &self,
        cancel: &CancellationToken,
        doc: Option<&ConfigurationDocument>,
        config: ProcessorConfig,
    ) -> Result<Report, ProcessError> {
        let doc = doc.ok_or(ProcessError::ConfigurationNil)?;

        checkpoint(cancel, "normalize")?;
        let normalized = normalize(doc);
        debug!(
            interfaces = normalized.interfaces.len(),
            rules = normalized.filter.rules.len(),
            "normalized configuration"
        );
        let mut report = Report::new(normalized, config);

        checkpoint(cancel, "validate")?;
        let errors = self.validator.validate(&report.normalized);
        debug!(errors = errors.len(), "validated configuration");
        for err in errors {
            report.add_finding(
                Severity::High,
                Finding::new(kind::VALIDATION, "Configuration Validation Error")
                    .description(err.message)
                    .recommendation("Correct the value so the configuration loads cleanly.")
                    .component(err.field),
            );
        }

        let doc = &report.normalized;
        let findings = &mut report.findings;
        let limits = config.limits;
        if config.dead_rule_check {
            checkpoint(cancel, "dead_rule_check")?;
            rule_findings(doc, &limits, findings);
            interface_findings(doc, findings);
            debug!(pass = "dead_rule_check", findings = findings.len(), "analyzer pass done");
        }
        if config.security_analysis {
            checkpoint(cancel, "security_analysis")?;
            security_findings(doc, findings);
            debug!(pass = "security_analysis", findings = findings.len(), "analyzer pass done");
        }
        if config.performance_analysis {
            checkpoint(cancel, "performance_analysis")?;
            performance_findings(doc, &limits, findings);
            debug!(pass = "performance_analysis", findings = findings.len(), "analyzer pass done");
        }
        if config.compliance_check {
            checkpoint(cancel, "compliance_check")?;
            consistency_findings(doc, findings);
            debug!(pass = "compliance_check", findings = findings.len(), "analyzer pass done");
        }

        if config.stats {
            checkpoint(cancel, "statistics")?;
            report.statistics = Some(Statistics::from_document(
                &report.normalized,
                &report.findings,
            ));
        }

        info!(
            findings = report.total_findings(),
            critical = report.count(Severity::Critical),
            high = report.count(Severity::High),
            checks = ?config.enabled_checks(),
            "processing complete"
        );
        Ok(report)
    }

    pub fn render(&self, report: &Report, format: Format) -> Result<String, RenderError> {
        self.renderer.render(report, format)
    }
}

impl Processor for CoreProcessor {
    fn process(
        &self,
        cancel: &CancellationToken,
        doc: Option<&ConfigurationDocument>,
        options: &[ProcessorOption],
    ) -> Result<Report, ProcessError> {
        self.process_with_config(cancel, doc, ProcessorConfig::from_options(options))
    }
}

fn checkpoint(cancel: &CancellationToken, phase: &'static str) -> Result<(), ProcessError> {
    if cancel.is_cancelled() {
        debug!(phase, "cancellation observed");
        return Err(ProcessError::Cancelled { phase });
    }
    Ok(())
}
