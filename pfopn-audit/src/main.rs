use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use pfopn_audit::model::ConfigurationDocument;
use pfopn_audit::normalize::normalize;
use tracing_subscriber::EnvFilter;

mod audit_cmd;
mod cli;
mod validate_cmd;

use cli::{Cli, Command, NormalizeArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Audit(args) => audit_cmd::run_audit(args),
        Command::Validate(args) => validate_cmd::run_validate(args),
        Command::Normalize(args) => run_normalize(args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "pfopn_audit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

pub(crate) fn load_document(path: &Path) -> Result<ConfigurationDocument> {
    ConfigurationDocument::from_xml_file(path)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn run_normalize(args: NormalizeArgs) -> Result<()> {
    let doc = load_document(&args.file)?;
    println!("{}", serde_json::to_string_pretty(&normalize(&doc))?);
    Ok(())
}
