use colored::Colorize;

use crate::report::{Report, Severity};

/// Render severity counts and scores for terminal output.
pub fn render_summary(report: &Report) -> String {
    let mut out = Vec::new();
    for severity in Severity::ALL {
        let count = report.count(severity);
        let line = format!("{:<8} {count}", severity.as_str());
        let line = if count == 0 {
            line.dimmed().to_string()
        } else {
            match severity {
                Severity::Critical => line.red().bold().to_string(),
                Severity::High => line.red().to_string(),
                Severity::Medium => line.yellow().to_string(),
                Severity::Low => line.cyan().to_string(),
                Severity::Info => line.to_string(),
            }
        };
        out.push(line);
    }
    out.push(format!("total    {}", report.total_findings()));
    if let Some(stats) = &report.statistics {
        out.push(
            format!(
                "security_score={} complexity={}",
                stats.summary.security_score, stats.summary.config_complexity
            )
            .cyan()
            .to_string(),
        );
    }
    out.join("\n")
}
