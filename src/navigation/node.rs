//! The atomic element of a navigation forest.

use serde::{Deserialize, Serialize};

use crate::properties::{NavKey, SortOrder};

/// A single entry of a navigation forest.
///
/// `children` records membership only. Sibling order is always derived at read time from each
/// child's `sort_order`, so the vector may hold keys in any order, and may briefly hold keys that
/// are no longer members of the holding forest. Readers must filter those out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    pub key: NavKey,
    pub parent: Option<NavKey>,
    pub children: Vec<NavKey>,
    pub sort_order: SortOrder,
}

impl NavNode {
    pub fn new(key: NavKey, sort_order: SortOrder) -> Self {
        NavNode {
            key,
            parent: None,
            children: Vec::new(),
            sort_order,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Register `child` in the child set. Returns false if it was already a member.
    pub fn insert_child(&mut self, child: NavKey) -> bool {
        if self.children.contains(&child) {
            return false;
        }
        self.children.push(child);
        true
    }

    /// Drop `child` from the child set. Returns false if it was not a member.
    pub fn remove_child(&mut self, child: &NavKey) -> bool {
        let before = self.children.len();
        self.children.retain(|c| c != child);
        before != self.children.len()
    }
}
