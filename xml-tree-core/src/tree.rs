use std::collections::BTreeMap;

/// An owned XML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNode {
    /// Element tag name.
    pub tag: String,
    /// XML attributes keyed by name.
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Concatenated text content, if any non-whitespace text was present.
    pub text: Option<String>,
}

impl XmlNode {
    /// Create a new element with no attributes, children, or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Create a leaf element holding `text`.
    pub fn leaf(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Append a child and return `self`, for building trees in code.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Return all children with the provided tag.
    pub fn get_children(&self, tag: &str) -> Vec<&XmlNode> {
        self.children.iter().filter(|child| child.tag == tag).collect()
    }

    /// Iterate children with the provided tag without allocating.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Walk a nested child path and return the first node found at its end.
    pub fn find(&self, path: &[&str]) -> Option<&XmlNode> {
        let mut current = self;
        for segment in path {
            current = current.get_child(segment)?;
        }
        Some(current)
    }

    /// Walk a nested child path and return terminal node text if found.
    pub fn get_text<'a>(&'a self, path: &[&str]) -> Option<&'a str> {
        self.find(path)?.text.as_deref()
    }

    /// Like [`XmlNode::get_text`] but trimmed, with blank text treated as absent.
    pub fn text_at<'a>(&'a self, path: &[&str]) -> Option<&'a str> {
        self.get_text(path)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Whether the child path exists, regardless of its content.
    ///
    /// Configuration files use empty elements such as `<enable/>` as flags.
    pub fn has(&self, path: &[&str]) -> bool {
        self.find(path).is_some()
    }
}
