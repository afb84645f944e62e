//! Navigation module: the in-memory navigation tree and its recycle bin.
//!
//! # Module Organization
//!
//! - [`node`]: The forest element (`NavNode`)
//! - [`forest`]: Key → node storage and roots (`NodeStore`, `Forest`)
//! - [`query`]: Read-only traversals generic over any `NodeStore`
//! - [`base`]: `NavigationIndex`, owning the live and bin forests and every mutation
//!
//! ```rust
//! use navtree_core::{navigation::NavigationIndex, properties::NavKey};
//!
//! let index = NavigationIndex::new();
//! let (home, about) = (NavKey::new(), NavKey::new());
//! index.add(home, None, None).unwrap();
//! index.add(about, Some(home), Some(1)).unwrap();
//! assert_eq!(index.children_of(&home).unwrap(), vec![about]);
//!
//! index.move_to_bin(about).unwrap();
//! assert!(index.children_of(&home).unwrap().is_empty());
//! assert_eq!(index.roots_in_bin(), vec![about]);
//! ```

mod base;
pub mod forest;
pub mod node;
pub mod query;


pub use base::NavigationIndex;
pub use forest::{Forest, NodeStore};
pub use node::NavNode;
