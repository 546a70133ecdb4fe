use crate::NodeId;

pub type DomResult<T> = Result<T, DomError>;

/// Errors produced while reading or mutating a [`crate::Document`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The markup could not be parsed into nodes. Nothing was inserted.
    #[error("Failed to parse markup: {0}")]
    Parse(String),

    /// The node does not exist in this document.
    #[error("Node {0} does not exist in this document")]
    NodeNotFound(NodeId),

    /// The operation needs an element, but the node is a text node.
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),
}

impl From<html_parser::Error> for DomError {
    fn from(e: html_parser::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
