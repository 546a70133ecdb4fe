use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;
use tagstream_dom::NodeId;

use crate::session::SessionId;
use crate::{Tag, TagKey};

/// The state of one registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The tag was registered but the build has not been installed yet
    Pending(TagKey),

    /// The tag was materialized as this node
    Mounted(NodeId),

    /// Installation finished without ever materializing the tag
    Unresolved(TagKey),
}

/// A map from caller chosen keys to the elements a build creates.
///
/// Entries are registered with tags while building and point at real nodes once the build is installed. Cloning a
/// registry is cheap and every clone sees the same entries.
///
/// A registry belongs to the build that made it. Tags from any other build, such as one nested with
/// [`crate::render_to_string`], are not registered.
///
/// ```rust
/// use tagstream::{BuildExt, TagName};
/// use tagstream_dom::Document;
///
/// let mut doc = Document::new();
/// let body = doc.root();
/// let mut fields = None;
///
/// doc.build(body, |html| {
///     let registry = html.make_registry();
///     let form = html.child(TagName::Form);
///     registry.insert("email", form.child(TagName::Input).name("email"));
///     registry.insert("password", form.child(TagName::Input).name("password"));
///     fields = Some(registry);
/// })
/// .unwrap();
///
/// let fields = fields.unwrap();
/// let email = fields.node(&"email").unwrap();
/// assert_eq!(doc.attribute(email, "name"), Some("email"));
/// ```
pub struct Registry<K> {
    session: SessionId,
    slots: Rc<RefCell<FxHashMap<K, Slot>>>,
}

impl<K> Clone for Registry<K> {
    fn clone(&self) -> Self {
        Self {
            session: self.session,
            slots: self.slots.clone(),
        }
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for Registry<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.slots.borrow().iter()).finish()
    }
}

impl<K: Eq + Hash + Clone + 'static> Registry<K> {
    pub(crate) fn new(session: SessionId) -> Self {
        Self {
            session,
            slots: Rc::new(RefCell::new(FxHashMap::default())),
        }
    }

    /// Register `tag` under `key`, replacing any previous entry, and hand the tag back for further chaining.
    pub fn insert<'a>(&self, key: K, tag: Tag<'a>) -> Tag<'a> {
        if tag.session_id() != self.session {
            tracing::warn!("Not registering {tag:?}, it belongs to a different build");
            return tag;
        }

        tag.ensure_id();
        self.slots.borrow_mut().insert(key, Slot::Pending(tag.key()));
        tag
    }

    /// The current state of the entry for `key`
    pub fn get(&self, key: &K) -> Option<Slot> {
        self.slots.borrow().get(key).copied()
    }

    /// The node registered under `key`, once the build is installed
    pub fn node(&self, key: &K) -> Option<NodeId> {
        match self.get(key)? {
            Slot::Mounted(node) => Some(node),
            Slot::Pending(_) | Slot::Unresolved(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Every registered key, in no particular order
    pub fn keys(&self) -> Vec<K> {
        self.slots.borrow().keys().cloned().collect()
    }
}

/// Type-erased access to a registry, so the session can resolve registries with different key types.
pub(crate) trait ResolveSlots {
    /// Point every pending entry at its mounted node. Returns the number of entries left unresolved.
    fn resolve(&self, mounted: &FxHashMap<TagKey, NodeId>) -> usize;
}

impl<K: Eq + Hash + 'static> ResolveSlots for Registry<K> {
    fn resolve(&self, mounted: &FxHashMap<TagKey, NodeId>) -> usize {
        let mut unresolved = 0;
        for slot in self.slots.borrow_mut().values_mut() {
            if let Slot::Pending(key) = *slot {
                *slot = match mounted.get(&key) {
                    Some(node) => Slot::Mounted(*node),
                    None => {
                        unresolved += 1;
                        Slot::Unresolved(key)
                    }
                };
            }
        }
        unresolved
    }
}
