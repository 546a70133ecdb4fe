//! Where the ids written onto built elements come from.
//!
//! Every element gets an id when its start tag is written, unless the caller set one. Installation never needs them,
//! but they let outside code find the elements later.

use std::sync::atomic::{AtomicU64, Ordering};

/// A generator of element ids.
pub trait IdSource {
    /// Produce the next id. Ids must not repeat for the lifetime of the source.
    fn next_id(&mut self) -> String;
}

impl<F: FnMut() -> String> IdSource for F {
    fn next_id(&mut self) -> String {
        self()
    }
}

/// Ids counted from zero per build, so the same build always produces the same markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 0)
    }

    pub fn starting_at(prefix: impl Into<String>, next: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

static NEXT_GLOBAL_ID: AtomicU64 = AtomicU64::new(0);

/// Ids drawn from one counter shared by the whole process.
///
/// Use this when many fragments are built into the same document and their ids must not collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalIds {
    prefix: String,
}

impl GlobalIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl IdSource for GlobalIds {
    fn next_id(&mut self) -> String {
        let next = NEXT_GLOBAL_ID.fetch_add(1, Ordering::Relaxed);
        format!("{}{next}", self.prefix)
    }
}
