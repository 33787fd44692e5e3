//! Ordered child roster, unique by id.

use crate::types::{Child, ChildId};

/// Ordered sequence of children. In demo mode it holds the fixed sample;
/// in authenticated mode it is replaced wholesale by each fetch. Empty is a
/// valid state ("no children yet"), distinct from a failed fetch only in how
/// it was reached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChildRoster {
    entries: Vec<Child>,
}

impl ChildRoster {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster wholesale, preserving response order and dropping
    /// any later duplicate ids.
    pub fn replace(&mut self, children: Vec<Child>) {
        self.entries.clear();
        for child in children {
            if !self.contains(&child.id) {
                self.entries.push(child);
            }
        }
    }

    /// Append a child, or replace the existing entry with the same id.
    pub fn upsert(&mut self, child: Child) {
        match self.entries.iter_mut().find(|c| c.id == child.id) {
            Some(existing) => *existing = child,
            None => self.entries.push(child),
        }
    }

    /// Replace an existing entry by id. Unknown ids are a no-op.
    pub fn replace_by_id(&mut self, child: Child) -> bool {
        match self.entries.iter_mut().find(|c| c.id == child.id) {
            Some(existing) => {
                *existing = child;
                true
            }
            None => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: &ChildId) -> Option<&Child> {
        self.entries.iter().find(|c| &c.id == id)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: &ChildId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&Child> {
        self.entries.first()
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Child] {
        &self.entries
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
