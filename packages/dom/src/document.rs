use rustc_hash::FxHashMap;
use slab::Slab;
use std::fmt::Write;

use crate::escape::{escape, is_void_element, EscapeMode};
use crate::events::{Event, EventKind, Listener};
use crate::parse::{ParsedFragment, ParsedNode};
use crate::{DomError, DomResult, ElementNode, Node, NodeId, NodeType, TextNode};

/// An in-memory document that builds are inserted into.
///
/// The document owns every node in a slab and never removes them, so a [`NodeId`] handed out once stays valid for
/// the lifetime of the document. Listeners are stored per node and per [`EventKind`] and are delivered through
/// [`Document::dispatch`].
///
/// ```rust
/// use tagstream_dom::{Document, EventKind};
///
/// let mut doc = Document::new();
/// let body = doc.root();
/// let roots = doc.insert_html(body, r#"<p id="greeting">Hello</p>"#).unwrap();
///
/// assert_eq!(doc.element_by_id("greeting"), Some(roots[0]));
/// assert_eq!(doc.text_content(roots[0]), "Hello");
/// ```
pub struct Document {
    nodes: Slab<Node>,
    root: NodeId,
    listeners: FxHashMap<(NodeId, EventKind), Vec<Listener>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Document {
    /// Create an empty document with a `<body>` root element.
    pub fn new() -> Self {
        let mut nodes = Slab::with_capacity(64);
        let root = NodeId(nodes.insert(Node::new(ElementNode::new("body").into())));
        Self {
            nodes,
            root,
            listeners: FxHashMap::default(),
        }
    }

    /// Returns the id of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Return the number of nodes in the document, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A document always has its root node
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id.0)
    }

    /// Create a detached element. Attach it with [`Document::append_child`].
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        NodeId(self.nodes.insert(Node::new(ElementNode::new(tag).into())))
    }

    /// Create a detached text node. The text is stored as is and escaped on serialization.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        NodeId(self.nodes.insert(Node::new(TextNode::new(text.into()).into())))
    }

    /// Append `child` as the last child of `parent`, detaching it from its previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.element(parent)?;
        if !self.contains(child) {
            return Err(DomError::NodeNotFound(child));
        }

        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|c| *c != child);
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// The children of a node in document order. Missing nodes have no children.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children()).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Get the element data of a node
    pub fn element(&self, id: NodeId) -> DomResult<&ElementNode> {
        match self.get(id) {
            Some(node) => node.as_element().ok_or(DomError::NotAnElement(id)),
            None => Err(DomError::NodeNotFound(id)),
        }
    }

    /// Get the element data of a node mutably
    pub fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementNode> {
        match self.nodes.get_mut(id.0) {
            Some(Node {
                value: NodeType::Element(element),
                ..
            }) => Ok(element),
            Some(_) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::NodeNotFound(id)),
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|el| el.tag.as_str())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok().and_then(|el| el.attribute(name))
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> DomResult<()> {
        self.element_mut(id)?.set_attribute(name, value);
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_ok_and(|el| el.has_class(class))
    }

    /// The concatenated text of every text node below `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.traverse_depth_first(id, |node| {
            if let NodeType::Text(text) = &node.value {
                out.push_str(&text.text);
            }
        });
        out
    }

    /// Walk the subtree rooted at `id` in document order, including `id` itself.
    pub fn traverse_depth_first(&self, id: NodeId, mut f: impl FnMut(&Node)) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                f(node);
                stack.extend(node.children.iter().copied().rev());
            }
        }
    }

    /// Find the first element in the document whose `id` attribute matches.
    pub fn element_by_id(&self, id_attr: &str) -> Option<NodeId> {
        self.element_by_id_in(self.root, id_attr)
    }

    /// Find the first element below `scope` (inclusive) whose `id` attribute matches.
    pub fn element_by_id_in(&self, scope: NodeId, id_attr: &str) -> Option<NodeId> {
        let mut stack = vec![scope];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if node
                .as_element()
                .is_some_and(|el| el.attribute("id") == Some(id_attr))
            {
                return Some(id);
            }
            stack.extend(node.children.iter().copied().rev());
        }
        None
    }

    /// Parse `markup` and append the resulting nodes to `parent`, returning the new top level nodes.
    ///
    /// If the markup fails to parse the document is left untouched.
    pub fn insert_html(&mut self, parent: NodeId, markup: &str) -> DomResult<Vec<NodeId>> {
        self.element(parent)?;
        let fragment = ParsedFragment::parse(markup)?;
        self.insert_fragment(parent, &fragment)
    }

    /// Append an already parsed fragment to `parent`, returning the new top level nodes.
    pub fn insert_fragment(
        &mut self,
        parent: NodeId,
        fragment: &ParsedFragment,
    ) -> DomResult<Vec<NodeId>> {
        self.element(parent)?;
        let mut roots = Vec::with_capacity(fragment.roots.len());
        for node in &fragment.roots {
            roots.push(self.insert_parsed(parent, node)?);
        }
        Ok(roots)
    }

    fn insert_parsed(&mut self, parent: NodeId, parsed: &ParsedNode) -> DomResult<NodeId> {
        let id = NodeId(self.nodes.insert(Node::new(parsed.value.clone())));
        self.append_child(parent, id)?;
        for child in &parsed.children {
            self.insert_parsed(id, child)?;
        }
        Ok(id)
    }

    /// Serialize the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            // Writing into a String cannot fail
            let _ = self.write_node(&mut out, *child);
        }
        out
    }

    /// Serialize `id` and its children.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let _ = self.write_node(&mut out, id);
        out
    }

    fn write_node(&self, buf: &mut impl Write, id: NodeId) -> std::fmt::Result {
        let Some(node) = self.get(id) else {
            return Ok(());
        };

        match &node.value {
            NodeType::Text(text) => write!(buf, "{}", escape(&text.text, EscapeMode::Strict)),
            NodeType::Element(el) => {
                write!(buf, "<{}", el.tag)?;
                for (name, value) in &el.attributes {
                    write!(buf, " {name}=\"{}\"", escape(value, EscapeMode::Strict))?;
                }

                if node.children.is_empty() && is_void_element(&el.tag) {
                    return write!(buf, "/>");
                }

                write!(buf, ">")?;
                for child in &node.children {
                    self.write_node(buf, *child)?;
                }
                write!(buf, "</{}>", el.tag)
            }
        }
    }

    /// Register a listener for `kind` on `node`. Listeners for the same node and kind run in registration order.
    pub fn add_listener(&mut self, node: NodeId, kind: EventKind, listener: Listener) -> DomResult<()> {
        self.element(node)?;
        self.listeners.entry((node, kind)).or_default().push(listener);
        Ok(())
    }

    /// The number of listeners registered for `kind` on `node`
    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.listeners.get(&(node, kind)).map_or(0, Vec::len)
    }

    /// Deliver an event of `kind` to `target` and, for bubbling kinds, to each of its ancestors.
    ///
    /// Returns how many listeners were invoked. Listeners registered while the event is being delivered are not
    /// invoked for this event.
    pub fn dispatch(&mut self, target: NodeId, kind: EventKind) -> usize {
        if !self.contains(target) {
            tracing::warn!("Dispatching {kind} to node {target} which does not exist");
            return 0;
        }

        let mut path = vec![target];
        if kind.bubbles() {
            let mut cur = target;
            while let Some(parent) = self.parent(cur) {
                path.push(parent);
                cur = parent;
            }
        }

        // Only the listeners present before delivery starts take part
        let path: Vec<(NodeId, usize)> = path
            .into_iter()
            .map(|node| (node, self.listener_count(node, kind)))
            .collect();

        let mut event = Event::new(kind, target);
        let mut invoked = 0;

        for (node, limit) in path {
            if limit == 0 {
                continue;
            }
            let Some(mut listeners) = self.listeners.remove(&(node, kind)) else {
                continue;
            };

            let current = event.with_current_target(node);
            for listener in listeners.iter_mut().take(limit) {
                listener(self, current);
                invoked += 1;
            }

            // Put the listeners back in front of any that were added while they ran
            let added = self.listeners.remove(&(node, kind)).unwrap_or_default();
            listeners.extend(added);
            self.listeners.insert((node, kind), listeners);

            if current.propagation_stopped() {
                break;
            }
        }

        tracing::trace!("Dispatched {kind} to {target}, {invoked} listeners ran");
        invoked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn append_child_moves_nodes() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let text = doc.create_text("hi");

        doc.append_child(doc.root(), a).unwrap();
        doc.append_child(doc.root(), b).unwrap();
        doc.append_child(a, text).unwrap();
        doc.append_child(b, text).unwrap();

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[text]);
        assert_eq!(doc.parent(text), Some(b));
    }

    #[test]
    fn text_nodes_cannot_have_children() {
        let mut doc = Document::new();
        let text = doc.create_text("hi");
        let el = doc.create_element("b");
        assert_eq!(doc.append_child(text, el), Err(DomError::NotAnElement(text)));
    }

    #[test]
    fn listeners_added_during_dispatch_wait_for_the_next_event() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.append_child(doc.root(), button).unwrap();

        let late_calls = Rc::new(Cell::new(0));
        let late = late_calls.clone();
        doc.add_listener(
            button,
            EventKind::Click,
            Box::new(move |doc, event| {
                let late = late.clone();
                doc.add_listener(
                    event.current_target(),
                    EventKind::Click,
                    Box::new(move |_, _| late.set(late.get() + 1)),
                )
                .unwrap();
            }),
        )
        .unwrap();

        assert_eq!(doc.dispatch(button, EventKind::Click), 1);
        assert_eq!(late_calls.get(), 0);
        assert_eq!(doc.listener_count(button, EventKind::Click), 2);

        assert_eq!(doc.dispatch(button, EventKind::Click), 3);
        assert_eq!(late_calls.get(), 1);
    }
}
