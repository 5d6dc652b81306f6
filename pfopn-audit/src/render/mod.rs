//! Report rendering.
//!
//! A [`Report`] renders to one of the [`Format`]s. JSON and YAML serialize the
//! whole report; Markdown is a human-readable digest. [`render_summary`] gives
//! a short colored overview for terminals.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use crate::report::Report;

mod markdown;
mod summary;

pub use markdown::render_markdown;
pub use summary::render_summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Markdown,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Yaml, Format::Markdown];

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Markdown => "markdown",
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = RenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "markdown" | "md" => Ok(Format::Markdown),
            _ => Err(RenderError::UnsupportedFormat(value.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output format '{0}' (expected json, yaml or markdown)")]
    UnsupportedFormat(String),
    #[error("failed to serialize report as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to serialize report as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Stateless report renderer, shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn render(&self, report: &Report, format: Format) -> Result<String, RenderError> {
        match format {
            Format::Json => Ok(serde_json::to_string_pretty(report)?),
            Format::Yaml => Ok(serde_yaml::to_string(report)?),
            Format::Markdown => Ok(render_markdown(report)),
        }
    }

    /// Render with a format name such as `"json"` or `"md"`.
    pub fn render_named(&self, report: &Report, format: &str) -> Result<String, RenderError> {
        self.render(report, format.parse()?)
    }
}
