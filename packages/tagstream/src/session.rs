//! The stream builder state machine.
//!
//! A [`BuildSession`] turns the flat, chained calls a builder callback makes into nested markup. Tags are pushed on a
//! stack when they are created and their start tag is only written once something needs it: a child, text, raw
//! markup, or the tag being closed. Creating content at some tag first closes every tag above it on the stack
//! (pop-to-watermark), which is what lets callers write siblings without ever closing anything themselves.
//!
//! Alongside the markup the session records the tree it describes, so installation can create the real nodes
//! directly instead of finding them again by id.

use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use tagstream_dom::{escape, unescape, EscapeMode, ParsedFragment};

use crate::error::{BuildError, BuildResult, Violation};
use crate::handlers::{HandlerSet, PendingHandler, Trigger};
use crate::ids::IdSource;
use crate::registry::ResolveSlots;
use crate::tag::TagInit;
use crate::{AttrName, TagName};

/// Identifies a tag within one build.
///
/// Keys are handed out in creation order, which is also the order the tags appear in the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagKey(pub(crate) usize);

impl TagKey {
    /// The position of the tag in creation order
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for TagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tag{}", self.0)
    }
}

static NEXT_SESSION: AtomicU64 = AtomicU64::new(0);

/// Tells builds apart, so handles from one build are never resolved against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Unopened,
    Opened,
    Closed,
}

/// One piece of content written into a tag, in stream order.
#[derive(Debug)]
pub(crate) enum Content {
    Element(TagKey),
    Text(String),
    Raw(ParsedFragment),
}

#[derive(Debug)]
pub(crate) struct TagNode {
    pub(crate) name: TagName,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) phase: Phase,
    pub(crate) sealed: bool,
    pub(crate) id: Option<String>,
    pub(crate) content: Vec<Content>,
}

impl TagNode {
    fn new(name: TagName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            phase: Phase::Unopened,
            sealed: false,
            id: None,
            content: Vec::new(),
        }
    }

    fn set_attribute(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }
}

/// Everything a finished session hands to installation.
pub(crate) struct Flushed {
    pub(crate) markup: String,
    pub(crate) nodes: Vec<TagNode>,
    pub(crate) roots: Vec<TagKey>,
    pub(crate) registries: Vec<Rc<dyn ResolveSlots>>,
    pub(crate) handlers: BTreeMap<TagKey, HandlerSet>,
    pub(crate) escape: EscapeMode,
}

impl Flushed {
    /// The value a document should hold for text or an attribute value the session wrote.
    ///
    /// Standard escaping passes character references through to the markup, where a parser decodes them, so the
    /// document gets the decoded value as well.
    pub(crate) fn decoded<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self.escape {
            EscapeMode::Standard => unescape(text),
            EscapeMode::Strict => Cow::Borrowed(text),
        }
    }
}

struct SessionState {
    buffer: String,
    stack: Vec<TagKey>,
    nodes: Vec<TagNode>,
    roots: Vec<TagKey>,
    ids: Box<dyn IdSource>,
    escape: EscapeMode,
    registries: Vec<Rc<dyn ResolveSlots>>,
    handlers: BTreeMap<TagKey, HandlerSet>,
    poisoned: Option<BuildError>,
}

/// The state of one build, shared by every [`crate::Tag`] handle the callback receives.
pub(crate) struct BuildSession {
    id: SessionId,
    state: RefCell<SessionState>,
}

impl BuildSession {
    pub(crate) fn new(ids: Box<dyn IdSource>, escape: EscapeMode) -> Self {
        Self {
            id: SessionId::next(),
            state: RefCell::new(SessionState {
                buffer: String::new(),
                stack: Vec::new(),
                nodes: Vec::new(),
                roots: Vec::new(),
                ids,
                escape,
                registries: Vec::new(),
                handlers: BTreeMap::new(),
                poisoned: None,
            }),
        }
    }

    pub(crate) fn id(&self) -> SessionId {
        self.id
    }

    /// Run `f` against the state unless an earlier call already failed. The first failure is kept and reported by
    /// [`BuildSession::flush`].
    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> BuildResult<R>) -> Option<R> {
        let mut state = self.state.borrow_mut();
        if state.poisoned.is_some() {
            return None;
        }

        match f(&mut *state) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Build aborted: {err}");
                state.poisoned = Some(err);
                None
            }
        }
    }

    pub(crate) fn open_tag(&self, parent: Option<TagKey>, name: TagName, init: TagInit) -> TagKey {
        match self.update(|state| state.open_tag(parent, name, init)) {
            Some(key) => key,
            // Hand out a tag that is already closed, the build is aborted anyway
            None => self.state.borrow_mut().detached(name),
        }
    }

    pub(crate) fn open(&self, key: TagKey, action: &'static str) {
        self.update(|state| {
            state.check_content(key, action)?;
            state.check_sealed(key, action)?;
            state.pop_to_watermark(Some(key));
            state.open(key);
            Ok(())
        });
    }

    pub(crate) fn set_text(&self, key: TagKey, text: &str) {
        self.update(|state| state.set_text(key, text));
    }

    pub(crate) fn set_raw(&self, key: TagKey, markup: &str) {
        self.update(|state| state.set_raw(key, markup));
    }

    pub(crate) fn set_attribute(&self, key: TagKey, name: &str, value: String) {
        self.update(|state| state.set_attribute(key, name, value));
    }

    pub(crate) fn remove_attribute(&self, key: TagKey, name: &str) {
        self.update(|state| {
            state.check_attributes(key, "remove an attribute")?;
            state.nodes[key.0].attributes.retain(|(n, _)| n != name);
            Ok(())
        });
    }

    pub(crate) fn add_class(&self, key: TagKey, class: &str) {
        self.update(|state| state.add_class(key, class));
    }

    pub(crate) fn ensure_id(&self, key: TagKey) -> String {
        let mut state = self.state.borrow_mut();
        state.assign_id(key)
    }

    pub(crate) fn tag_name(&self, key: TagKey) -> TagName {
        self.state.borrow().nodes[key.0].name
    }

    pub(crate) fn register_handler(&self, key: TagKey, trigger: Trigger, handler: PendingHandler) {
        let mut state = self.state.borrow_mut();
        state.assign_id(key);
        state.handlers.entry(key).or_default().insert(trigger, handler);
    }

    pub(crate) fn track_registry(&self, registry: Rc<dyn ResolveSlots>) {
        self.state.borrow_mut().registries.push(registry);
    }

    /// Close every open tag and hand over the finished markup and the recorded tree.
    pub(crate) fn flush(self) -> BuildResult<Flushed> {
        let mut state = self.state.into_inner();
        if let Some(err) = state.poisoned.take() {
            return Err(err);
        }

        state.pop_to_watermark(None);
        tracing::trace!(
            "Flushed {} tags into {} bytes of markup",
            state.nodes.len(),
            state.buffer.len()
        );

        Ok(Flushed {
            markup: state.buffer,
            nodes: state.nodes,
            roots: state.roots,
            registries: state.registries,
            handlers: state.handlers,
            escape: state.escape,
        })
    }
}

impl SessionState {
    fn invalid(&self, key: TagKey, action: &'static str, violation: Violation) -> BuildError {
        BuildError::InvalidState {
            tag: self.nodes[key.0].name.as_str(),
            action,
            violation,
        }
    }

    /// Content can go into tags that are still open and not void.
    fn check_content(&self, key: TagKey, action: &'static str) -> BuildResult<()> {
        let node = &self.nodes[key.0];
        if node.phase == Phase::Closed {
            return Err(self.invalid(key, action, Violation::Closed));
        }
        if node.name.is_void() {
            return Err(self.invalid(key, action, Violation::VoidElement));
        }
        Ok(())
    }

    fn check_sealed(&self, key: TagKey, action: &'static str) -> BuildResult<()> {
        match self.nodes[key.0].sealed {
            true => Err(self.invalid(key, action, Violation::Sealed)),
            false => Ok(()),
        }
    }

    /// Attributes can only change before the start tag is written.
    fn check_attributes(&self, key: TagKey, action: &'static str) -> BuildResult<()> {
        match self.nodes[key.0].phase {
            Phase::Unopened => Ok(()),
            Phase::Opened => Err(self.invalid(key, action, Violation::StartTagWritten)),
            Phase::Closed => Err(self.invalid(key, action, Violation::Closed)),
        }
    }

    fn open_tag(&mut self, parent: Option<TagKey>, name: TagName, init: TagInit) -> BuildResult<TagKey> {
        if let Some(parent) = parent {
            self.check_content(parent, "open a child")?;
            self.check_sealed(parent, "open a child")?;
        }

        self.pop_to_watermark(parent);

        let key = TagKey(self.nodes.len());
        self.nodes.push(TagNode::new(name));
        match parent {
            Some(parent) => {
                self.open(parent);
                self.nodes[parent.0].content.push(Content::Element(key));
            }
            None => self.roots.push(key),
        }
        self.stack.push(key);

        match init {
            TagInit::None => {}
            TagInit::Class(class) => self.add_class(key, &class)?,
            TagInit::Attrs(attrs) => {
                for (name, value) in attrs {
                    self.set_attribute(key, name.as_str(), value)?;
                }
            }
        }

        Ok(key)
    }

    fn detached(&mut self, name: TagName) -> TagKey {
        let key = TagKey(self.nodes.len());
        let mut node = TagNode::new(name);
        node.phase = Phase::Closed;
        self.nodes.push(node);
        key
    }

    /// Close every tag above `target` on the stack. `None` closes everything.
    fn pop_to_watermark(&mut self, target: Option<TagKey>) {
        while let Some(&top) = self.stack.last() {
            if Some(top) == target {
                break;
            }
            self.stack.pop();
            self.close(top);
        }
    }

    /// Write the start tag if it has not been written yet.
    fn open(&mut self, key: TagKey) {
        if self.nodes[key.0].phase != Phase::Unopened {
            return;
        }

        self.assign_id(key);

        let node = &mut self.nodes[key.0];
        let buffer = &mut self.buffer;
        buffer.push('<');
        buffer.push_str(node.name.as_str());
        for (name, value) in &node.attributes {
            buffer.push(' ');
            buffer.push_str(name);
            buffer.push_str("=\"");
            buffer.push_str(&escape(value, self.escape));
            buffer.push('"');
        }
        match node.name.is_void() {
            true => buffer.push_str("/>"),
            false => buffer.push('>'),
        }

        node.phase = Phase::Opened;
        tracing::trace!("Opened <{}> as {key}", node.name);
    }

    fn close(&mut self, key: TagKey) {
        self.open(key);

        let node = &mut self.nodes[key.0];
        if !node.name.is_void() {
            self.buffer.push_str("</");
            self.buffer.push_str(node.name.as_str());
            self.buffer.push('>');
        }

        node.phase = Phase::Closed;
        tracing::trace!("Closed <{}> {key}", node.name);
    }

    fn assign_id(&mut self, key: TagKey) -> String {
        if let Some(id) = &self.nodes[key.0].id {
            return id.clone();
        }

        let id = self.ids.next_id();
        let node = &mut self.nodes[key.0];
        node.set_attribute(AttrName::Id.as_str(), id.clone());
        node.id = Some(id.clone());
        id
    }

    fn set_text(&mut self, key: TagKey, text: &str) -> BuildResult<()> {
        self.check_content(key, "set text")?;
        self.pop_to_watermark(Some(key));
        self.open(key);

        self.buffer.push_str(&escape(text, self.escape));

        let node = &mut self.nodes[key.0];
        node.sealed = true;
        if !text.is_empty() {
            node.content.push(Content::Text(text.to_string()));
        }
        Ok(())
    }

    fn set_raw(&mut self, key: TagKey, markup: &str) -> BuildResult<()> {
        self.check_content(key, "set raw markup")?;
        let fragment =
            ParsedFragment::parse(markup).map_err(|err| BuildError::RawMarkup(err.to_string()))?;

        self.pop_to_watermark(Some(key));
        self.open(key);

        self.buffer.push_str(markup);

        let node = &mut self.nodes[key.0];
        node.sealed = true;
        if !fragment.is_empty() {
            node.content.push(Content::Raw(fragment));
        }
        Ok(())
    }

    fn set_attribute(&mut self, key: TagKey, name: &str, value: String) -> BuildResult<()> {
        self.check_attributes(key, "set an attribute")?;
        if !is_attribute_name(name) {
            return Err(BuildError::AttributeName(name.to_string()));
        }

        let node = &mut self.nodes[key.0];
        if name == AttrName::Id.as_str() {
            node.id = Some(value.clone());
        }
        node.set_attribute(name, value);
        Ok(())
    }

    fn add_class(&mut self, key: TagKey, class: &str) -> BuildResult<()> {
        self.check_attributes(key, "add a class")?;

        let class = class.trim();
        if class.is_empty() {
            return Ok(());
        }

        let node = &mut self.nodes[key.0];
        let name = AttrName::Class.as_str();
        let classes = match node.attributes.iter().find(|(n, _)| n == name) {
            Some((_, existing)) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        node.set_attribute(name, classes);
        Ok(())
    }
}

/// Attribute names are written without escaping, so only a conservative set of characters is let through.
fn is_attribute_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

/// Where each tag of a flushed session ended up in the document.
pub(crate) type Mounted = FxHashMap<TagKey, tagstream_dom::NodeId>;
