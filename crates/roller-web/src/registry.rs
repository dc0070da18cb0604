#![forbid(unsafe_code)]

//! Id-keyed storage for host objects.
//!
//! The browser hands out element and closure handles that cannot cross the
//! [`Page`](roller_backend::Page) boundary; the page keeps them here and
//! passes the `u64` key around instead. Keys start at 1 and are never
//! reused, so a stale id can only miss.
//!
//! Elements carry their key in [`NODE_ID_ATTRIBUTE`], so finding the key of
//! an element the page has seen before is a map lookup rather than a scan.

use std::collections::BTreeMap;

/// Attribute holding an element's registry key.
pub const NODE_ID_ATTRIBUTE: &str = "data-roller-id";

/// Key written in a [`NODE_ID_ATTRIBUTE`] value. `None` for anything that is
/// not a key this page could have issued.
pub fn parse_node_tag(value: &str) -> Option<u64> {
    value.parse().ok().filter(|id| *id != 0)
}

/// Outcome of [`Registry::resolve_tagged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// The tag named this value's entry.
    Known(u64),
    /// The value was stored under a fresh key; the caller must write the
    /// tag.
    Added(u64),
}

impl Resolved {
    pub fn key(self) -> u64 {
        match self {
            Self::Known(id) | Self::Added(id) => id,
        }
    }
}

#[derive(Debug)]
pub struct Registry<T> {
    entries: BTreeMap<u64, T>,
    next: u64,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next: 1,
        }
    }

    /// Store `value` under a fresh key.
    pub fn insert(&mut self, value: T) -> u64 {
        let id = self.next;
        self.next += 1;
        self.entries.insert(id, value);
        id
    }

    /// Key the next [`Registry::insert`] will return.
    pub fn next_key(&self) -> u64 {
        self.next
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn remove(&mut self, id: u64) -> Option<T> {
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every entry in key order.
    pub fn take_all(&mut self) -> Vec<(u64, T)> {
        std::mem::take(&mut self.entries).into_iter().collect()
    }
}

impl<T: PartialEq> Registry<T> {
    /// Key of `value` given the tag it carries. A missing tag, or one that
    /// names another value (a copied element, a previous page), stores
    /// `value` under a fresh key.
    pub fn resolve_tagged(&mut self, tag: Option<&str>, value: T) -> Resolved {
        if let Some(id) = tag.and_then(parse_node_tag)
            && self.entries.get(&id) == Some(&value)
        {
            return Resolved::Known(id);
        }
        Resolved::Added(self.insert(value))
    }
}
