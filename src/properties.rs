use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub use uuid::Uuid;

use crate::error::NavError;

/// Integer used only to order siblings at read time. Not unique, not contiguous.
pub type SortOrder = i32;

/// Integer identifier used by the external record source to express parent linkage.
pub type LegacyId = i32;

/// Identifier of a named read lock held by the external scope provider.
pub type LockId = i32;

/// Parent legacy id meaning "this record has no parent".
pub const NO_PARENT_ID: LegacyId = -1;

/// Lock guarding the content tree in durable storage.
pub const CONTENT_TREE_LOCK: LockId = -333;

/// Lock guarding the media tree in durable storage.
pub const MEDIA_TREE_LOCK: LockId = -334;

/// Legacy id of the content recycle bin. Top-level trashed content records point here.
pub const CONTENT_RECYCLE_BIN_ID: LegacyId = -20;

/// Legacy id of the media recycle bin. Top-level trashed media records point here.
pub const MEDIA_RECYCLE_BIN_ID: LegacyId = -21;

/// Source object type of content (document) records.
pub const DOCUMENT_OBJECT_TYPE: Uuid = Uuid::from_u128(0xc66ba18e_eaf3_4cff_8a22_41b16d66a972);

/// Source object type of media records.
pub const MEDIA_OBJECT_TYPE: Uuid = Uuid::from_u128(0xb796f64c_1f99_4ffb_b886_4bf4bc011a9c);

/// Navigation key: the stable external identifier of a hierarchy entry.
///
/// Unique across the live and bin forests at any instant.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NavKey(Uuid);

impl NavKey {
    /// Generate a fresh random key.
    pub fn new() -> Self {
        NavKey(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        NavKey(Uuid::nil())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NavKey {
    fn default() -> Self {
        NavKey::new()
    }
}

impl AsRef<Uuid> for NavKey {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for NavKey {
    fn from(id: Uuid) -> Self {
        NavKey(id)
    }
}

impl From<NavKey> for Uuid {
    fn from(key: NavKey) -> Self {
        key.0
    }
}

impl TryFrom<&str> for NavKey {
    type Error = NavError;

    fn try_from(string: &str) -> Result<Self, Self::Error> {
        Ok(NavKey(Uuid::parse_str(string)?))
    }
}

impl Display for NavKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.hyphenated().encode_lower(&mut Uuid::encode_buffer())
        )
    }
}

impl From<NavKey> for String {
    fn from(val: NavKey) -> Self {
        format!("{val}")
    }
}

/// The two hierarchies a navigation index can mirror. Each one is guarded by its own fixed
/// lock in durable storage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub enum TreeKind {
    Content,
    Media,
}

impl TreeKind {
    /// Resolve a lock identifier to the tree it guards. Any other identifier is unknown.
    pub fn from_lock(lock: LockId) -> Option<TreeKind> {
        match lock {
            CONTENT_TREE_LOCK => Some(TreeKind::Content),
            MEDIA_TREE_LOCK => Some(TreeKind::Media),
            _ => None,
        }
    }

    pub fn lock_id(&self) -> LockId {
        match self {
            TreeKind::Content => CONTENT_TREE_LOCK,
            TreeKind::Media => MEDIA_TREE_LOCK,
        }
    }

    pub fn object_type(&self) -> Uuid {
        match self {
            TreeKind::Content => DOCUMENT_OBJECT_TYPE,
            TreeKind::Media => MEDIA_OBJECT_TYPE,
        }
    }

    pub fn recycle_bin_id(&self) -> LegacyId {
        match self {
            TreeKind::Content => CONTENT_RECYCLE_BIN_ID,
            TreeKind::Media => MEDIA_RECYCLE_BIN_ID,
        }
    }
}

impl Display for TreeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeKind::Content => write!(f, "content"),
            TreeKind::Media => write!(f, "media"),
        }
    }
}

/// Selects one of the two forests held by a navigation index.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub enum ForestKind {
    Live,
    Bin,
}

impl Display for ForestKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ForestKind::Live => write!(f, "live"),
            ForestKind::Bin => write!(f, "bin"),
        }
    }
}
