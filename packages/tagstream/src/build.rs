use tagstream_dom::{Document, NodeId};

use crate::error::BuildResult;
use crate::ids::IdSource;
use crate::install::install;
use crate::session::BuildSession;
use crate::{BuildConfig, Html};

/// The result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Built {
    /// The markup the build produced, exactly as it was streamed
    pub markup: String,
    /// The top level nodes the build appended to its target, in order
    pub roots: Vec<NodeId>,
}

/// Build a fragment with the default [`BuildConfig`] and append it to `parent`.
///
/// The callback runs to completion before the document is touched. If any call in it was invalid, the first error is
/// returned and the document is left unchanged. Otherwise the fragment is inserted, and then every registry, listener
/// and deferred handler of the build is resolved against the new nodes.
///
/// ```rust
/// use tagstream::{build, TagName};
/// use tagstream_dom::{Document, EventKind};
///
/// let mut doc = Document::new();
/// let body = doc.root();
///
/// let built = build(&mut doc, body, |html| {
///     html.child(TagName::Button)
///         .on(EventKind::Click, |doc, event| {
///             let _ = doc.set_attribute(event.current_target(), "data-clicked", "yes");
///         })
///         .text("Press");
/// })
/// .unwrap();
///
/// assert_eq!(built.markup, r#"<button id="id0">Press</button>"#);
///
/// doc.dispatch(built.roots[0], EventKind::Click);
/// assert_eq!(doc.attribute(built.roots[0], "data-clicked"), Some("yes"));
/// ```
pub fn build(doc: &mut Document, parent: NodeId, f: impl FnOnce(Html<'_>)) -> BuildResult<Built> {
    build_with(&BuildConfig::default(), doc, parent, f)
}

/// Build a fragment with the given configuration and append it to `parent`.
pub fn build_with(
    config: &BuildConfig,
    doc: &mut Document,
    parent: NodeId,
    f: impl FnOnce(Html<'_>),
) -> BuildResult<Built> {
    build_with_ids(config, config.id_source(), doc, parent, f)
}

/// Build a fragment taking ids from `ids` instead of the source `config` describes.
pub fn build_with_ids(
    config: &BuildConfig,
    ids: Box<dyn IdSource>,
    doc: &mut Document,
    parent: NodeId,
    f: impl FnOnce(Html<'_>),
) -> BuildResult<Built> {
    // Fail before running the callback, so its handlers are never created for nothing
    doc.element(parent)?;

    let session = BuildSession::new(ids, config.escape);
    f(Html::new(&session));
    let flushed = session.flush()?;

    install(flushed, doc, parent)
}

/// Run a builder callback and return its markup without inserting it anywhere.
///
/// Handlers are dropped and registries stay pending.
///
/// ```rust
/// use tagstream::{render_to_string, TagName};
///
/// let markup = render_to_string(|html| {
///     html.child_with(TagName::P, "note").text("1 < 2");
/// })
/// .unwrap();
///
/// assert_eq!(markup, r#"<p class="note" id="id0">1 &lt; 2</p>"#);
/// ```
pub fn render_to_string(f: impl FnOnce(Html<'_>)) -> BuildResult<String> {
    render_to_string_with(&BuildConfig::default(), f)
}

pub fn render_to_string_with(config: &BuildConfig, f: impl FnOnce(Html<'_>)) -> BuildResult<String> {
    let session = BuildSession::new(config.id_source(), config.escape);
    f(Html::new(&session));
    Ok(session.flush()?.markup)
}

/// Method call form of [`build`] and [`build_with`].
pub trait BuildExt {
    fn build(&mut self, parent: NodeId, f: impl FnOnce(Html<'_>)) -> BuildResult<Built>;

    fn build_with(
        &mut self,
        config: &BuildConfig,
        parent: NodeId,
        f: impl FnOnce(Html<'_>),
    ) -> BuildResult<Built>;
}

impl BuildExt for Document {
    fn build(&mut self, parent: NodeId, f: impl FnOnce(Html<'_>)) -> BuildResult<Built> {
        build(self, parent, f)
    }

    fn build_with(
        &mut self,
        config: &BuildConfig,
        parent: NodeId,
        f: impl FnOnce(Html<'_>),
    ) -> BuildResult<Built> {
        build_with(config, self, parent, f)
    }
}
