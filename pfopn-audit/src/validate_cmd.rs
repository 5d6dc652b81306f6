use anyhow::{bail, Result};
use pfopn_audit::normalize::normalize;
use pfopn_audit::validate::validate_document;

use crate::cli::{OutputFormat, ValidateArgs};
use crate::load_document;

pub fn run_validate(args: ValidateArgs) -> Result<()> {
    let doc = normalize(&load_document(&args.file)?);
    let errors = validate_document(&doc);

    match args.format {
        OutputFormat::Text => {
            for err in &errors {
                println!("error {err}");
            }
            println!("result errors={}", errors.len());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&errors)?),
    }

    if !errors.is_empty() {
        bail!("validate failed: {} errors", errors.len());
    }
    Ok(())
}
