//! Build HTML fragments with a fluent tag stream.
//!
//! A builder callback receives an [`Html`] root factory and chains calls on the [`Tag`] handles it hands out. Tags
//! never need to be closed by hand: starting a sibling, or adding text to a parent, closes everything below it.
//! Markup is streamed as the calls are made, then the fragment is inserted into a [`tagstream_dom::Document`], and
//! event listeners, registries and other deferred handlers are wired to the nodes that were just created.
//!
//! ```rust
//! use tagstream::{build, TagName};
//! use tagstream_dom::{Document, EventKind};
//! use std::{cell::Cell, rc::Rc};
//!
//! let mut doc = Document::new();
//! let body = doc.root();
//! let clicks = Rc::new(Cell::new(0));
//! let counter = clicks.clone();
//!
//! let built = build(&mut doc, body, move |html| {
//!     let p = html.child(TagName::Div).child_with(TagName::P, "cls");
//!     p.child(TagName::Span).text("Hi");
//!     p.child(TagName::A)
//!         .href("http://x")
//!         .on(EventKind::Click, move |_, _| counter.set(counter.get() + 1));
//! })
//! .unwrap();
//!
//! assert_eq!(
//!     built.markup,
//!     r#"<div id="id0"><p class="cls" id="id1"><span id="id2">Hi</span><a href="http://x" id="id3"></a></p></div>"#
//! );
//!
//! let link = doc.element_by_id("id3").unwrap();
//! doc.dispatch(link, EventKind::Click);
//! assert_eq!(clicks.get(), 1);
//! ```

mod build;
mod config;
mod error;
mod handlers;
mod ids;
mod install;
mod registry;
mod session;
mod style;
mod tag;
mod tags;

pub use build::{
    build, build_with, build_with_ids, render_to_string, render_to_string_with, BuildExt, Built,
};
pub use config::{BuildConfig, IdStrategy};
pub use error::{BuildError, BuildResult, Violation};
pub use handlers::Trigger;
pub use ids::{GlobalIds, IdSource, SequentialIds};
pub use registry::{Registry, Slot};
pub use session::TagKey;
pub use style::inline_style;
pub use tag::{Html, Tag, TagInit};
pub use tags::{AttrName, TagName};

pub use tagstream_dom as dom;

pub mod prelude {
    pub use crate::{
        build, render_to_string, AttrName, BuildConfig, BuildExt, Html, Registry, Tag, TagName,
    };
    pub use tagstream_dom::{Document, Event, EventKind, NodeId};
}
