use tagstream_dom::DomError;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

/// Errors produced by a build.
///
/// A build is all or nothing: when any of these is returned, nothing was inserted into the document.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// A tag was used in a way its current state does not allow.
    #[error("cannot {action} on <{tag}>: {violation}")]
    InvalidState {
        tag: &'static str,
        action: &'static str,
        violation: Violation,
    },

    /// An attribute name that cannot be written into a start tag.
    #[error("{0:?} is not a valid attribute name")]
    AttributeName(String),

    /// Markup passed to [`crate::Tag::raw`] could not be parsed.
    #[error("raw markup could not be parsed: {0}")]
    RawMarkup(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Why a tag refused an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("the tag is already closed")]
    Closed,

    #[error("the tag already has text or raw content")]
    Sealed,

    #[error("the start tag was already written")]
    StartTagWritten,

    #[error("void elements cannot have content")]
    VoidElement,
}
