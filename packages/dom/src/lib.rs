//! A small, write-once document tree.
//!
//! Nodes live in a slab and are addressed by [`NodeId`]. Markup can be parsed and appended with
//! [`Document::insert_html`], serialized back with [`Document::inner_html`], and listeners can be attached to elements
//! and driven with [`Document::dispatch`].

mod document;
mod error;
mod escape;
mod events;
mod node;
mod parse;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use escape::{escape, is_void_element, unescape, EscapeMode};
pub use events::{Event, EventKind, Listener, UnknownEvent};
pub use node::{ElementNode, Node, NodeId, NodeType, TextNode};
pub use parse::ParsedFragment;
