//! Domain models for versioned documents.
//!
//! # Core Concepts
//!
//! - [`VersionNode`]: one state of a document's content. Nodes form a tree per
//!   document; the root is version 0.
//! - **Draft vs snapshot**: a node without a snapshot timestamp is a draft and
//!   is edited in place. Snapshotting freezes it; the next edit forks a child.
//! - [`RollbackTarget`]: undo-style moves of the active pointer, restricted to
//!   ancestors of the active version.
//! - [`HistoryEntry`]: the snapshots along the root-to-active path.
//! - [`VersionTreeNode`]: an owned, serialisable view of a whole tree.

mod version;

pub use version::*;
