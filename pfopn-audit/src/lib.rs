//! pfSense and OPNsense firewall configuration auditing.
//!
//! This library takes a parsed firewall configuration, puts it into a
//! canonical form, validates it, and runs a set of analyzers that report
//! dead and duplicate rules, security weaknesses, performance settings and
//! cross-section inconsistencies. The result is a [`report::Report`] that can
//! be rendered as JSON, YAML or Markdown.
//!
//! # Architecture
//!
//! ## Model
//!
//! - [`model`]: typed configuration document, built from an `xml-tree-core` tree
//! - [`net`]: address and CIDR helpers shared by the passes below
//!
//! ## Pipeline
//!
//! - [`normalize`]: defaults, canonical addresses and deterministic ordering
//! - [`validate`]: field format checks and cross-reference checks
//! - [`analyze`]: rule, interface, security, performance and consistency passes
//! - [`stats`]: counts plus the security and complexity scores
//! - [`processor`]: the [`processor::Processor`] trait and the standard pipeline
//!
//! ## Configuration
//!
//! - [`options`]: processor flags, limits and functional options
//! - [`profile`]: TOML audit profiles
//!
//! ## Reporting
//!
//! - [`report`]: severities, findings and the report itself
//! - [`render`]: JSON, YAML, Markdown and terminal summaries
//!
//! # Examples
//!
//! ```ignore
//! use pfopn_audit::model::ConfigurationDocument;
//! use pfopn_audit::options::with_all_checks;
//! use pfopn_audit::processor::{CoreProcessor, Processor};
//! use pfopn_audit::render::Format;
//! use tokio_util::sync::CancellationToken;
//!
//! let doc = ConfigurationDocument::from_xml_file("config.xml".as_ref())?;
//! let processor = CoreProcessor::new();
//! let report = processor.process(&CancellationToken::new(), Some(&doc), &[with_all_checks()])?;
//! println!("{}", processor.render(&report, Format::Markdown)?);
//! ```

pub mod analyze;
pub mod model;
pub mod net;
pub mod normalize;
pub mod options;
pub mod processor;
pub mod profile;
pub mod render;
pub mod report;
pub mod stats;
pub mod validate;
