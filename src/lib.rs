//! Branching version control for named text documents, held in memory.
//!
//! A [`store::DocumentRegistry`] owns every [`store::VersionedDocument`] by
//! name. Each document keeps a tree of versions: edits change the active draft
//! in place until it is snapshotted, after which the next edit forks a child.
//! The registry also ranks documents by version count ([`rank::RankHeap`]) and
//! records which documents were touched most recently. All name and version
//! lookups go through [`index::KeyedIndex`].

pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod rank;
pub mod shell;
pub mod store;

pub use error::{Error, Result};
