//! Owned XML element trees for configuration tooling.
//!
//! Firewall configuration exports are plain element trees with no mixed
//! content, so the whole document is read into [`XmlNode`] values and queried
//! by child path afterwards.

pub mod parser;
pub mod tree;

pub use parser::{parse, parse_file, ParseError};
pub use tree::XmlNode;
