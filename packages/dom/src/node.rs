//! Items related to Nodes in the Document

use std::fmt::{Debug, Display};

/// The key of a node inside a [`crate::Document`].
///
/// Ids are never reused while the document is alive: the document is write-once and nodes are never removed.
#[derive(Hash, PartialEq, Eq, Clone, Copy, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the Document along with its place in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) value: NodeType,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(value: NodeType) -> Self {
        Self {
            value,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The data specific to the kind of node.
    pub fn node_type(&self) -> &NodeType {
        &self.value
    }

    /// The parent of this node, if it has been attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The children of this node in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The element data of this node, if it is an element.
    pub fn as_element(&self) -> Option<&ElementNode> {
        match &self.value {
            NodeType::Element(element) => Some(element),
            NodeType::Text(_) => None,
        }
    }
}

/// A type of node with data specific to the node type.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    /// An element node
    Element(ElementNode),
    /// A text node
    Text(TextNode),
}

impl From<TextNode> for NodeType {
    fn from(text: TextNode) -> Self {
        Self::Text(text)
    }
}

impl From<ElementNode> for NodeType {
    fn from(element: ElementNode) -> Self {
        Self::Element(element)
    }
}

/// A element node in the Document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementNode {
    /// The [tag](https://developer.mozilla.org/en-US/docs/Web/API/Element/tagName) of the element
    pub tag: String,
    /// The attributes of the element in the order they were first set
    pub attributes: Vec<(String, String)>,
}

impl ElementNode {
    /// Create a new element node
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    /// Get the value of an attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, keeping its original position if it was already present
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(idx).1)
    }

    /// Check if the `class` attribute contains the given token
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Add the class token if it is missing or remove it if it is present. Returns true if the class is now set.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        let mut tokens: Vec<&str> = self
            .attribute("class")
            .map(|classes| classes.split_whitespace().collect())
            .unwrap_or_default();

        let present = tokens.contains(&class);
        if present {
            tokens.retain(|c| *c != class);
        } else {
            tokens.push(class);
        }

        let joined = tokens.join(" ");
        if joined.is_empty() {
            self.remove_attribute("class");
        } else {
            self.set_attribute("class", joined);
        }
        !present
    }
}

/// A text node in the Document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextNode {
    /// The text of the node, already decoded
    pub text: String,
}

impl TextNode {
    /// Create a new text node
    pub fn new(text: String) -> Self {
        Self { text }
    }
}
