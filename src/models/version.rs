use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a version within its document. Assigned in creation order,
/// starting at 0 for the root, and never reused.
pub type VersionId = u32;

/// Slot of a node in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub(crate) usize);

/// One point-in-time state of a document.
///
/// A node is a *draft* until it is snapshotted. Drafts are edited in place;
/// snapshots are frozen by convention and any further edit branches a new
/// child. `created_at` is fixed at construction; only `last_modified_at`
/// moves afterwards.
#[derive(Debug, Clone)]
pub struct VersionNode {
    id: VersionId,
    content: String,
    message: String,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
    snapshot_at: Option<DateTime<Utc>>,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

impl VersionNode {
    pub(crate) fn new(id: VersionId, content: String, parent: Option<NodeHandle>) -> Self {
        let now = Utc::now();
        Self {
            id,
            content,
            message: String::new(),
            created_at: now,
            last_modified_at: now,
            snapshot_at: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> VersionId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Snapshot message. Empty unless the node was snapshotted.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }

    pub fn snapshot_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot_at
    }

    pub fn is_snapshot(&self) -> bool {
        self.snapshot_at.is_some()
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn append(&mut self, text: &str) {
        self.content.push_str(text);
        self.touch();
    }

    pub(crate) fn replace(&mut self, text: &str) {
        text.clone_into(&mut self.content);
        self.touch();
    }

    pub(crate) fn snapshot(&mut self, message: &str) {
        let now = Utc::now();
        message.clone_into(&mut self.message);
        self.snapshot_at = Some(now);
        self.last_modified_at = now;
    }

    pub(crate) fn push_child(&mut self, child: NodeHandle) {
        self.children.push(child);
    }

    fn touch(&mut self) {
        self.last_modified_at = Utc::now();
    }
}

/// Where a rollback should move the active version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollbackTarget {
    /// The active version's parent.
    #[default]
    Parent,
    /// A specific ancestor of the active version.
    Version(VersionId),
}

impl From<Option<VersionId>> for RollbackTarget {
    fn from(id: Option<VersionId>) -> Self {
        id.map_or(Self::Parent, Self::Version)
    }
}

/// A snapshot on the path from the root to the active version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: VersionId,
    pub message: String,
    pub snapshot_at: DateTime<Utc>,
}

/// A version with its nested children, used for rendering and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionTreeNode {
    pub id: VersionId,
    pub content: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
    pub snapshot_at: Option<DateTime<Utc>>,
    /// Whether this is the document's active version.
    pub active: bool,
    pub children: Vec<VersionTreeNode>,
}

impl VersionTreeNode {
    pub fn is_snapshot(&self) -> bool {
        self.snapshot_at.is_some()
    }

    /// Number of versions in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Self::size).sum::<usize>()
    }
}
