use crate::report::{Report, Severity};
use crate::stats::Statistics;

/// Render a report as a Markdown document.
pub fn render_markdown(report: &Report) -> String {
    let mut out = Vec::new();
    let info = &report.config_info;
    let host = match (info.hostname.as_str(), info.domain.as_str()) {
        ("", _) => "(unnamed)".to_string(),
        (host, "") => host.to_string(),
        (host, domain) => format!("{host}.{domain}"),
    };

    out.push(format!("# Configuration Audit: {host}"));
    out.push(String::new());
    out.push(format!(
        "- Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if !info.platform.is_empty() {
        out.push(format!("- Platform: {} {}", info.platform, info.version));
    }
    out.push(format!("- Total findings: {}", report.total_findings()));
    let checks = report.processor_config.enabled_checks();
    if !checks.is_empty() {
        out.push(format!("- Checks: {}", checks.join(", ")));
    }

    for severity in Severity::ALL {
        let bucket = report.findings.get(severity);
        if bucket.is_empty() {
            continue;
        }
        out.push(String::new());
        out.push(format!("## {} ({})", heading(severity), bucket.len()));
        out.push(String::new());
        out.push("| Type | Title | Component | Description | Recommendation |".to_string());
        out.push("|------|-------|-----------|-------------|----------------|".to_string());
        for finding in bucket {
            out.push(format!(
                "| {} | {} | {} | {} | {} |",
                cell(&finding.kind),
                cell(&finding.title),
                cell(&finding.component),
                cell(&finding.description),
                cell(&finding.recommendation)
            ));
        }
    }

    if let Some(stats) = &report.statistics {
        render_statistics(&mut out, stats);
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn render_statistics(out: &mut Vec<String>, stats: &Statistics) {
    out.push(String::new());
    out.push("## Statistics".to_string());
    out.push(String::new());
    out.push("| Metric | Value |".to_string());
    out.push("|--------|-------|".to_string());
    let rows = [
        ("Security score", format!("{}/100", stats.summary.security_score)),
        ("Complexity", format!("{}/100", stats.summary.config_complexity)),
        (
            "Interfaces",
            format!("{} ({} enabled)", stats.total_interfaces, stats.enabled_interfaces),
        ),
        ("Firewall rules", stats.total_firewall_rules.to_string()),
        ("NAT entries", stats.nat_entries.to_string()),
        ("DHCP scopes", stats.dhcp_scopes.to_string()),
        ("Users", stats.total_users.to_string()),
        ("Groups", stats.total_groups.to_string()),
        ("Sysctl tunables", stats.sysctl_settings.to_string()),
        ("Services", join_or_none(&stats.enabled_services)),
        ("Security features", join_or_none(&stats.security_features)),
    ];
    for (metric, value) in rows {
        out.push(format!("| {metric} | {} |", cell(&value)));
    }
}

fn heading(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Critical",
        Severity::High => "High",
        Severity::Medium => "Medium",
        Severity::Low => "Low",
        Severity::Info => "Info",
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

/// Table cells may not contain pipes or line breaks.
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}
