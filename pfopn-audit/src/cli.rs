use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "pfopn-audit")]
#[command(about = "Normalize, validate and audit firewall XML configurations")]
pub struct Cli {
    /// Log pipeline progress to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Audit one config and print a report.
    Audit(AuditArgs),
    /// Validate one config and list every error.
    Validate(ValidateArgs),
    /// Print the normalized form of one config as JSON.
    Normalize(NormalizeArgs),
}

#[derive(Parser, Debug)]
pub struct AuditArgs {
    /// Config file to audit.
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
    pub format: ReportFormat,
    /// Audit profile TOML. Defaults to the embedded profile.
    #[arg(long)]
    pub profile: Option<PathBuf>,
    /// Skip statistics and scores.
    #[arg(long)]
    pub no_stats: bool,
    /// Report shadowed, duplicate and overbroad rules and unused interfaces.
    #[arg(long)]
    pub dead_rules: bool,
    #[arg(long)]
    pub security: bool,
    #[arg(long)]
    pub performance: bool,
    /// Report cross-section inconsistencies.
    #[arg(long)]
    pub compliance: bool,
    /// Enable every check.
    #[arg(long)]
    pub all: bool,
    /// Print only severity counts and scores.
    #[arg(long)]
    pub summary: bool,
    /// Fail when any critical or high finding exists.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Config file to validate.
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Config file to normalize.
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
    Yaml,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
