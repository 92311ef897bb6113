//! Component scene graph.
//!
//! Nodes live in an arena owned by [`ComponentTree`] and are addressed by
//! generational [`NodeId`]s, so parent back-references are plain indices and
//! subtree detachment cannot leave dangling pointers. Lifecycle per node:
//! **Detached → Attached → PendingRemoval → Detached**; structural unlinking
//! of live nodes only happens at the Hud's end-of-frame drain.

mod arena;
mod node;

pub use arena::{ComponentTree, NodeId};
pub use node::{Component, Content};
