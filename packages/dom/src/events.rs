//! The events a [`crate::Document`] can deliver to listeners.
//!
//! Events are synthetic: the host (a test, a headless driver, an embedding) decides when an event "happens" and calls
//! [`crate::Document::dispatch`]. Delivery then follows the usual rules: the target's listeners run first, then the
//! event bubbles to each ancestor unless the kind does not bubble or a listener stops propagation.

use std::cell::Cell;
use std::fmt::Display;
use std::str::FromStr;

use crate::{Document, NodeId};

/// A listener attached to a node in the [`Document`].
///
/// Listeners receive the document mutably so they can react to the event by changing the tree, for example toggling a
/// class on the element that was hovered.
pub type Listener = Box<dyn FnMut(&mut Document, &Event)>;

macro_rules! event_kinds {
    (
        $(
            $( #[$attr:meta] )*
            $variant:ident => $name:literal, bubbles: $bubbles:literal;
        )*
    ) => {
        /// The finite set of DOM event kinds listeners can be registered for.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
        pub enum EventKind {
            $(
                $( #[$attr] )*
                $variant,
            )*
        }

        impl EventKind {
            /// Every event kind, in declaration order.
            pub const ALL: &'static [EventKind] = &[$(EventKind::$variant,)*];

            /// The DOM name of the event, eg `click`
            pub const fn name(self) -> &'static str {
                match self {
                    $( EventKind::$variant => $name, )*
                }
            }

            /// Whether the event propagates from its target to the target's ancestors
            pub const fn bubbles(self) -> bool {
                match self {
                    $( EventKind::$variant => $bubbles, )*
                }
            }
        }

        impl FromStr for EventKind {
            type Err = UnknownEvent;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(EventKind::$variant), )*
                    other => Err(UnknownEvent(other.to_string())),
                }
            }
        }
    };
}

event_kinds! {
    /// The element lost focus
    Blur => "blur", bubbles: false;
    /// The element received focus
    Focus => "focus", bubbles: false;
    /// Focus moved into the element or one of its descendants
    FocusIn => "focusin", bubbles: true;
    /// Focus moved out of the element or one of its descendants
    FocusOut => "focusout", bubbles: true;
    Load => "load", bubbles: false;
    Resize => "resize", bubbles: false;
    Scroll => "scroll", bubbles: false;
    Unload => "unload", bubbles: false;
    Click => "click", bubbles: true;
    DoubleClick => "dblclick", bubbles: true;
    MouseDown => "mousedown", bubbles: true;
    MouseUp => "mouseup", bubbles: true;
    MouseMove => "mousemove", bubbles: true;
    MouseOver => "mouseover", bubbles: true;
    MouseOut => "mouseout", bubbles: true;
    /// The pointer entered the element. Unlike `mouseover` this does not bubble.
    MouseEnter => "mouseenter", bubbles: false;
    /// The pointer left the element. Unlike `mouseout` this does not bubble.
    MouseLeave => "mouseleave", bubbles: false;
    Change => "change", bubbles: true;
    Select => "select", bubbles: true;
    Submit => "submit", bubbles: true;
    KeyDown => "keydown", bubbles: true;
    KeyPress => "keypress", bubbles: true;
    KeyUp => "keyup", bubbles: true;
    Error => "error", bubbles: false;
    ContextMenu => "contextmenu", bubbles: true;
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an event name that is not one of the [`EventKind`]s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event name '{0}'")]
pub struct UnknownEvent(pub String);

/// An event being delivered to listeners.
#[derive(Debug)]
pub struct Event {
    kind: EventKind,
    target: NodeId,
    current_target: NodeId,
    propagation_stopped: Cell<bool>,
}

impl Event {
    pub(crate) fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            propagation_stopped: Cell::new(false),
        }
    }

    pub(crate) fn with_current_target(&mut self, node: NodeId) -> &Self {
        self.current_target = node;
        self
    }

    /// The kind of event
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The node the event was dispatched to
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listener is currently running. Differs from [`Event::target`] while bubbling.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    /// Prevent the event from reaching any further ancestors.
    ///
    /// Listeners on the current node still run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Whether a listener called [`Event::stop_propagation`]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}
