use anyhow::{bail, Context, Result};
use pfopn_audit::options::{
    with_all_checks, with_compliance_check, with_dead_rule_check, with_performance_analysis,
    with_security_analysis, without_stats, ProcessorOption,
};
use pfopn_audit::processor::CoreProcessor;
use pfopn_audit::profile::load_profile_with_source;
use pfopn_audit::render::{render_summary, Format};
use pfopn_audit::report::Severity;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{AuditArgs, ReportFormat};
use crate::load_document;

pub fn run_audit(args: AuditArgs) -> Result<()> {
    let doc = load_document(&args.file)?;
    let (profile, source) = load_profile_with_source(args.profile.as_deref())
        .context("failed to load audit profile")?;
    debug!(profile = %source, "loaded audit profile");

    let config = profile.to_config().apply(&flag_options(&args));
    let processor = CoreProcessor::new();
    let report = processor.process_with_config(&CancellationToken::new(), Some(&doc), config)?;

    if args.summary {
        println!("{}", render_summary(&report));
    } else {
        println!("{}", processor.render(&report, report_format(args.format))?);
    }

    let blocking = report.count(Severity::Critical) + report.count(Severity::High);
    if args.strict && blocking > 0 {
        bail!("audit failed in strict mode: {blocking} critical/high findings");
    }
    Ok(())
}

/// Command-line flags, folded on top of the profile.
fn flag_options(args: &AuditArgs) -> Vec<ProcessorOption> {
    let mut options = Vec::new();
    if args.all {
        options.push(with_all_checks());
    }
    if args.dead_rules {
        options.push(with_dead_rule_check());
    }
    if args.security {
        options.push(with_security_analysis());
    }
    if args.performance {
        options.push(with_performance_analysis());
    }
    if args.compliance {
        options.push(with_compliance_check());
    }
    if args.no_stats {
        options.push(without_stats());
    }
    options
}

fn report_format(format: ReportFormat) -> Format {
    match format {
        ReportFormat::Markdown => Format::Markdown,
        ReportFormat::Json => Format::Json,
        ReportFormat::Yaml => Format::Yaml,
    }
}
