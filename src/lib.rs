//! # navtree-core
//!
//! An in-memory, queryable mirror of a hierarchical content structure (a navigation tree) kept in
//! two parallel forests: the **live** tree and the **recycle bin**.
//!
//! ## Overview
//!
//! navtree-core answers structural queries (parent, children, descendants, ancestors, siblings,
//! depth) without touching persistent storage, and applies structural mutations (insert, move,
//! soft-delete to the bin, restore, permanent delete, re-sort) while keeping both forests
//! consistent.
//!
//! ### Key Features
//!
//! - **Two forests, one abstraction**: the live tree and the bin are two [`navigation::Forest`]s
//!   behind the [`navigation::NodeStore`] trait, so every query works on either
//! - **Concurrent reads**: single-key operations are atomic; queries may run alongside mutations
//! - **Subtree transfer**: moving to and restoring from the bin relocates whole subtrees,
//!   preserving node identity
//! - **Lenient rebuilds**: forests are repopulated from flat records; unresolved parents leave
//!   nodes orphaned rather than failing
//! - **Read-time ordering**: sibling order is always derived from sort orders, never stored
//!
//! ## Architecture
//!
//! - **[`navigation`]**: Nodes, forests, the query engine and the mutation engine
//!   (`NavigationIndex`)
//! - **[`rebuild`]**: Record-driven population and the `NavigationService` rebuild entry points
//! - **[`store`]**: In-memory implementation of the durable-store collaborators
//! - **[`event`]**: Inbound structural change events
//! - **[`config`]**: Service configuration and its TOML provider
//! - **[`properties`]**: Keys, ids and tree constants
//!
//! ## Quick Start
//!
//! ```rust
//! use navtree_core::{
//!     config::NavigationConfig,
//!     properties::{NavKey, DOCUMENT_OBJECT_TYPE, NO_PARENT_ID},
//!     rebuild::{NavigationRecord, NavigationService},
//!     store::InMemoryStore,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (home, blog) = (NavKey::new(), NavKey::new());
//!     let store = InMemoryStore::new();
//!     store.set_records(
//!         DOCUMENT_OBJECT_TYPE,
//!         false,
//!         vec![
//!             NavigationRecord::new(1, home, NO_PARENT_ID, 0),
//!             NavigationRecord::new(2, blog, 1, 0),
//!         ],
//!     );
//!
//!     let service = NavigationService::new(store, NavigationConfig::content());
//!     service.rebuild_live().await?;
//!
//!     let index = service.index();
//!     assert_eq!(index.children_of(&home)?, vec![blog]);
//!     assert_eq!(index.level_of(&blog), Some(2));
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Compound mutations are serialized among writers by the index, but they are not transactions:
//! a concurrent reader may observe a node detached from its old parent and not yet attached to
//! its new one, or a subtree partially moved between forests. Callers needing a consistent
//! snapshot must exclude readers themselves.

pub mod config;
pub mod error;
pub mod event;
pub mod navigation;
pub mod properties;
pub mod rebuild;
pub mod store;

pub use error::*;
