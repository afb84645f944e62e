use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::properties::{NavKey, SortOrder};

/// Inbound structural change, applied with
/// [crate::navigation::NavigationIndex::process_event].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationEvent {
    /// Key, parent (None for a root), sort order (None for zero)
    NodeAdded(NavKey, Option<NavKey>, Option<SortOrder>),
    /// Key, new parent (None to become a root)
    NodeMoved(NavKey, Option<NavKey>),
    /// Key, new sort order
    SortOrderChanged(NavKey, SortOrder),
    MovedToBin(NavKey),
    /// Key, live parent to restore under (None to restore as a root)
    RestoredFromBin(NavKey, Option<NavKey>),
    RemovedFromBin(NavKey),
}

impl NavigationEvent {
    /// The key of the node the event acts on.
    pub fn key(&self) -> NavKey {
        match self {
            NavigationEvent::NodeAdded(key, _, _)
            | NavigationEvent::NodeMoved(key, _)
            | NavigationEvent::SortOrderChanged(key, _)
            | NavigationEvent::MovedToBin(key)
            | NavigationEvent::RestoredFromBin(key, _)
            | NavigationEvent::RemovedFromBin(key) => *key,
        }
    }
}

impl Display for NavigationEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            NavigationEvent::NodeAdded(..) => write!(f, "NodeAdded"),
            NavigationEvent::NodeMoved(..) => write!(f, "NodeMoved"),
            NavigationEvent::SortOrderChanged(..) => write!(f, "SortOrderChanged"),
            NavigationEvent::MovedToBin(_) => write!(f, "MovedToBin"),
            NavigationEvent::RestoredFromBin(..) => write!(f, "RestoredFromBin"),
            NavigationEvent::RemovedFromBin(_) => write!(f, "RemovedFromBin"),
        }
    }
}
