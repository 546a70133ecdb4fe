use std::fmt::Debug;
use tagstream_dom::{Document, EventKind, Listener, NodeId};

/// What a pending handler waits for.
///
/// Each tag holds at most one handler per trigger; registering a second one replaces the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A real DOM event delivered to the element
    Event(EventKind),

    /// Runs once during installation, as soon as the element exists
    Later,

    /// Produces markup that is appended to the element during installation
    Append,
}

pub(crate) type LaterFn = Box<dyn FnOnce(&mut Document, NodeId)>;
pub(crate) type AppendFn = Box<dyn FnOnce(&Document, NodeId) -> String>;

/// A callback registered while building, waiting for its element to exist.
pub(crate) enum PendingHandler {
    Listener(Listener),
    Later(LaterFn),
    Append(AppendFn),
}

impl Debug for PendingHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PendingHandler::Listener(_) => f.write_str("Listener"),
            PendingHandler::Later(_) => f.write_str("Later"),
            PendingHandler::Append(_) => f.write_str("Append"),
        }
    }
}

/// The handlers of one tag, at most one per trigger.
#[derive(Debug, Default)]
pub(crate) struct HandlerSet {
    entries: Vec<(Trigger, PendingHandler)>,
}

impl HandlerSet {
    pub(crate) fn insert(&mut self, trigger: Trigger, handler: PendingHandler) {
        match self.entries.iter_mut().find(|(t, _)| *t == trigger) {
            Some((_, slot)) => {
                tracing::trace!("Replacing the {trigger:?} handler");
                *slot = handler;
            }
            None => self.entries.push((trigger, handler)),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn into_entries(self) -> Vec<(Trigger, PendingHandler)> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_registration_per_trigger_wins() {
        let mut set = HandlerSet::default();
        set.insert(
            Trigger::Append,
            PendingHandler::Append(Box::new(|_, _| "first".to_string())),
        );
        set.insert(
            Trigger::Event(EventKind::Click),
            PendingHandler::Listener(Box::new(|_, _| {})),
        );
        set.insert(
            Trigger::Append,
            PendingHandler::Append(Box::new(|_, _| "second".to_string())),
        );
        assert_eq!(set.len(), 2);

        let doc = Document::new();
        let root = doc.root();
        let entries = set.into_entries();
        assert_eq!(entries[0].0, Trigger::Append);
        let (_, PendingHandler::Append(append)) = entries.into_iter().next().unwrap() else {
            panic!("expected an append handler");
        };
        assert_eq!(append(&doc, root), "second");
    }
}
