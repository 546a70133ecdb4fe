//! The handles a builder callback works with.

use std::fmt::Display;
use std::hash::Hash;
use std::rc::Rc;
use tagstream_dom::{Document, Event, EventKind, NodeId};

use crate::handlers::{PendingHandler, Trigger};
use crate::session::{BuildSession, SessionId};
use crate::{inline_style, AttrName, Registry, TagKey, TagName};

/// The initial class or attributes of a new tag.
///
/// A plain string is a class name. Arrays and vectors of `(AttrName, value)` pairs are attributes.
///
/// ```rust
/// use tagstream::{AttrName, TagInit};
///
/// assert_eq!(TagInit::from("card"), TagInit::Class("card".to_string()));
/// assert_eq!(
///     TagInit::from([(AttrName::Href, "/home")]),
///     TagInit::Attrs(vec![(AttrName::Href, "/home".to_string())])
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagInit {
    #[default]
    None,
    Class(String),
    Attrs(Vec<(AttrName, String)>),
}

impl From<()> for TagInit {
    fn from(_: ()) -> Self {
        TagInit::None
    }
}

impl From<&str> for TagInit {
    fn from(class: &str) -> Self {
        TagInit::Class(class.to_string())
    }
}

impl From<String> for TagInit {
    fn from(class: String) -> Self {
        TagInit::Class(class)
    }
}

impl<V: Into<String>, const N: usize> From<[(AttrName, V); N]> for TagInit {
    fn from(attrs: [(AttrName, V); N]) -> Self {
        TagInit::Attrs(attrs.into_iter().map(|(n, v)| (n, v.into())).collect())
    }
}

impl<V: Into<String>> From<Vec<(AttrName, V)>> for TagInit {
    fn from(attrs: Vec<(AttrName, V)>) -> Self {
        TagInit::Attrs(attrs.into_iter().map(|(n, v)| (n, v.into())).collect())
    }
}

/// The root tag factory passed to a builder callback.
///
/// Every tag created here is a root of the built fragment. Creating a root closes every tag that is still open.
#[derive(Clone, Copy)]
pub struct Html<'a> {
    session: &'a BuildSession,
}

impl std::fmt::Debug for Html<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Html").finish_non_exhaustive()
    }
}

impl<'a> Html<'a> {
    pub(crate) fn new(session: &'a BuildSession) -> Self {
        Self { session }
    }

    /// Start a new root tag.
    pub fn child(self, name: TagName) -> Tag<'a> {
        self.child_with(name, TagInit::None)
    }

    /// Start a new root tag with a class or attributes.
    pub fn child_with(self, name: TagName, init: impl Into<TagInit>) -> Tag<'a> {
        let key = self.session.open_tag(None, name, init.into());
        Tag::new(self.session, key)
    }

    /// Create a registry that is resolved when this build is installed.
    pub fn make_registry<K: Eq + Hash + Clone + 'static>(self) -> Registry<K> {
        make_registry(self.session)
    }
}

fn make_registry<K: Eq + Hash + Clone + 'static>(session: &BuildSession) -> Registry<K> {
    let registry = Registry::new(session.id());
    session.track_registry(Rc::new(registry.clone()));
    registry
}

macro_rules! attr_setters {
    ($( $(#[$doc:meta])* $method:ident => $attr:ident; )*) => {
        $(
            $(#[$doc])*
            pub fn $method(self, value: impl Display) -> Self {
                self.set_attr(AttrName::$attr, value.to_string())
            }
        )*
    };
}

macro_rules! bool_setters {
    ($( $method:ident => $attr:ident; )*) => {
        $(
            #[doc = concat!("Set or remove the boolean `", stringify!($method), "` attribute")]
            pub fn $method(self, on: bool) -> Self {
                self.toggle_attr(AttrName::$attr, on)
            }
        )*
    };
}

/// A handle to one tag of a build.
///
/// Handles are cheap to copy and every method returns a handle, so calls chain: methods that add content to this tag
/// return `self`, methods that create a child return the child.
///
/// ```rust
/// use tagstream::{render_to_string, TagName};
///
/// let markup = render_to_string(|html| {
///     let list = html.child_with(TagName::Ul, "menu");
///     list.child(TagName::Li).text("Home");
///     list.child(TagName::Li).child(TagName::A).href("/about").text("About");
/// })
/// .unwrap();
///
/// assert_eq!(
///     markup,
///     r#"<ul class="menu" id="id0"><li id="id1">Home</li><li id="id2"><a href="/about" id="id3">About</a></li></ul>"#
/// );
/// ```
#[derive(Clone, Copy)]
pub struct Tag<'a> {
    session: &'a BuildSession,
    key: TagKey,
}

impl std::fmt::Debug for Tag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tag")
            .field("name", &self.tag_name())
            .field("key", &self.key)
            .finish()
    }
}

impl<'a> Tag<'a> {
    pub(crate) fn new(session: &'a BuildSession, key: TagKey) -> Self {
        Self { session, key }
    }

    /// The key installation resolves this tag by
    pub fn key(&self) -> TagKey {
        self.key
    }

    pub(crate) fn session_id(&self) -> SessionId {
        self.session.id()
    }

    pub fn tag_name(&self) -> TagName {
        self.session.tag_name(self.key)
    }

    /// Start a child tag, closing any children of this tag that are still open.
    pub fn child(self, name: TagName) -> Tag<'a> {
        self.child_with(name, TagInit::None)
    }

    /// Start a child tag with a class or attributes.
    pub fn child_with(self, name: TagName, init: impl Into<TagInit>) -> Tag<'a> {
        let key = self.session.open_tag(Some(self.key), name, init.into());
        Tag::new(self.session, key)
    }

    /// Append escaped text. No children can be added after text.
    pub fn text(self, text: impl AsRef<str>) -> Self {
        self.session.set_text(self.key, text.as_ref());
        self
    }

    /// Append markup verbatim. Only use this with trusted markup. No children can be added afterwards.
    ///
    /// The markup must parse, since the nodes it describes are created during installation.
    pub fn raw(self, markup: impl AsRef<str>) -> Self {
        self.session.set_raw(self.key, markup.as_ref());
        self
    }

    /// Run `f` with this tag, for building nested content in a block.
    pub fn with(self, f: impl FnOnce(Tag<'a>)) -> Self {
        f(self);
        self
    }

    /// Append a `<span>` holding a single space.
    pub fn space(self) -> Self {
        self.child(TagName::Span).text(" ");
        self
    }

    /// Open one child per item, using this tag's [default child](TagName::default_child), and call `f` with the item,
    /// the child and its index.
    ///
    /// ```rust
    /// use tagstream::{render_to_string, TagName};
    ///
    /// let markup = render_to_string(|html| {
    ///     html.child(TagName::Ol)
    ///         .map_children(["one", "two"], |item, li, _| {
    ///             li.text(item);
    ///         });
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(markup, r#"<ol id="id0"><li id="id1">one</li><li id="id2">two</li></ol>"#);
    /// ```
    pub fn map_children<I, F>(self, items: I, mut f: F) -> Self
    where
        I: IntoIterator,
        F: FnMut(I::Item, Tag<'a>, usize),
    {
        self.session.open(self.key, "map children");
        let name = self.tag_name().default_child();
        for (idx, item) in items.into_iter().enumerate() {
            f(item, self.child(name), idx);
        }
        self
    }

    /// Set an attribute. The last value set for a name wins.
    pub fn set_attr(self, name: AttrName, value: impl Into<String>) -> Self {
        self.session
            .set_attribute(self.key, name.as_str(), value.into());
        self
    }

    /// Set a `data-*` attribute. A name that is not a valid attribute name aborts the build with
    /// [`crate::BuildError::AttributeName`].
    pub fn data(self, name: &str, value: impl Into<String>) -> Self {
        self.session
            .set_attribute(self.key, &format!("data-{name}"), value.into());
        self
    }

    /// Set the inline style from CSS properties, see [`inline_style`].
    pub fn set_style<K, V>(self, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.set_attr(AttrName::Style, inline_style(properties))
    }

    /// Add a class token after any existing ones.
    pub fn add_class(self, class: &str) -> Self {
        self.session.add_class(self.key, class);
        self
    }

    pub fn add_class_if(self, class: &str, condition: bool) -> Self {
        match condition {
            true => self.add_class(class),
            false => self,
        }
    }

    attr_setters! {
        /// Set the `id` attribute. Generated ids are only used when none was set.
        id => Id;
        href => Href;
        src => Src;
        title => Title;
        value => Value;
        name => Name;
        /// Set the `type` attribute
        kind => Type;
        placeholder => Placeholder;
        width => Width;
        height => Height;
        colspan => ColSpan;
    }

    bool_setters! {
        checked => Checked;
        selected => Selected;
        multiple => Multiple;
        disabled => Disabled;
    }

    fn toggle_attr(self, name: AttrName, on: bool) -> Self {
        match on {
            true => self.set_attr(name, name.as_str()),
            false => {
                self.session.remove_attribute(self.key, name.as_str());
                self
            }
        }
    }

    /// The id of this tag, generating one if needed.
    pub fn ensure_id(&self) -> String {
        self.session.ensure_id(self.key)
    }

    /// Listen for `kind` on the element once it is installed. Replaces any listener this tag already has for `kind`.
    pub fn on(self, kind: EventKind, listener: impl FnMut(&mut Document, &Event) + 'static) -> Self {
        self.session.register_handler(
            self.key,
            Trigger::Event(kind),
            PendingHandler::Listener(Box::new(listener)),
        );
        self
    }

    /// Run `f` once during installation, after every listener of the build is attached.
    pub fn later(self, f: impl FnOnce(&mut Document, NodeId) + 'static) -> Self {
        self.session
            .register_handler(self.key, Trigger::Later, PendingHandler::Later(Box::new(f)));
        self
    }

    /// Append the markup `f` returns to the element during installation.
    pub fn append(self, f: impl FnOnce(&Document, NodeId) -> String + 'static) -> Self {
        self.session.register_handler(
            self.key,
            Trigger::Append,
            PendingHandler::Append(Box::new(f)),
        );
        self
    }

    /// Create a registry that is resolved when this build is installed.
    pub fn make_registry<K: Eq + Hash + Clone + 'static>(&self) -> Registry<K> {
        make_registry(self.session)
    }
}
