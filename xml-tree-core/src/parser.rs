use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::tree::XmlNode;

/// Errors that can occur while parsing XML into an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input XML could not be decoded or tokenized.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Tag, attribute, or CDATA bytes were not valid UTF-8.
    #[error("invalid UTF-8 while parsing XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to decode an entity in text or an attribute value.
    #[error("failed to decode XML text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// Failed to read input file.
    #[error("failed to read XML file: {0}")]
    Io(#[from] std::io::Error),
    /// A second top-level element followed the root.
    #[error("multiple top-level elements found (second root '{0}')")]
    MultipleRoots(String),
    /// The document ended while elements were still open.
    #[error("unclosed element(s) at end of document: {0}")]
    Unclosed(String),
    /// The input contained no element at all.
    #[error("no root element found")]
    Empty,
}

/// Parse XML bytes into an [`XmlNode`] tree.
pub fn parse(xml: &[u8]) -> Result<XmlNode, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => builder.open(start_node(&e, &reader)?),
            Event::Empty(e) => builder.attach(start_node(&e, &reader)?)?,
            Event::Text(e) => builder.text(&e.unescape()?),
            Event::CData(e) => builder.text(std::str::from_utf8(e.as_ref())?),
            Event::End(_) => builder.close()?,
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
        buf.clear();
    }
    builder.finish()
}

/// Parse an XML file into an [`XmlNode`] tree.
pub fn parse_file(path: &Path) -> Result<XmlNode, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

/// Incremental tree assembly driven by reader events.
#[derive(Default)]
struct TreeBuilder {
    open: Vec<XmlNode>,
    root: Option<XmlNode>,
}

impl TreeBuilder {
    fn open(&mut self, node: XmlNode) {
        self.open.push(node);
    }

    fn close(&mut self) -> Result<(), ParseError> {
        // quick-xml rejects unmatched end tags before we see them.
        match self.open.pop() {
            Some(node) => self.attach(node),
            None => Ok(()),
        }
    }

    fn attach(&mut self, node: XmlNode) -> Result<(), ParseError> {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        if self.root.is_some() {
            return Err(ParseError::MultipleRoots(node.tag));
        }
        self.root = Some(node);
        Ok(())
    }

    fn text(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        let Some(current) = self.open.last_mut() else {
            return;
        };
        current.text.get_or_insert_with(String::new).push_str(raw);
    }

    fn finish(self) -> Result<XmlNode, ParseError> {
        if !self.open.is_empty() {
            let path = self
                .open
                .iter()
                .map(|n| n.tag.as_str())
                .collect::<Vec<_>>()
                .join(".");
            return Err(ParseError::Unclosed(path));
        }
        self.root.ok_or(ParseError::Empty)
    }
}

fn start_node(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<XmlNode, ParseError> {
    let mut node = XmlNode::new(qname_to_string(e.name())?);
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = qname_to_string(attr.key)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        node.attributes.insert(key, value);
    }
    Ok(node)
}

fn qname_to_string(name: QName<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(name.as_ref())?.to_string())
}
