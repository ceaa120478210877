use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::index::KeyedIndex;
use crate::models::{
    HistoryEntry, NodeHandle, RollbackTarget, VersionId, VersionNode, VersionTreeNode,
};

/// Message given to the root version of every new document.
pub const INITIAL_SNAPSHOT_MESSAGE: &str = "Initial Snapshot";

const ROOT: NodeHandle = NodeHandle(0);

enum Edit<'a> {
    Append(&'a str),
    Replace(&'a str),
}

/// A named document with a branching version tree.
///
/// Nodes live in an arena owned by the document; parent and child links are
/// [`NodeHandle`]s into it, and `versions` maps every [`VersionId`] to its
/// handle. The tree only ever grows, so handles stay valid for the lifetime of
/// the document.
#[derive(Debug, Clone)]
pub struct VersionedDocument {
    name: String,
    nodes: Vec<VersionNode>,
    active: NodeHandle,
    versions: KeyedIndex<VersionId, NodeHandle>,
    total_versions: u32,
}

impl VersionedDocument {
    /// A document holding only its root: version 0, empty, already snapshotted.
    pub fn new(name: impl Into<String>) -> Self {
        let mut root = VersionNode::new(0, String::new(), None);
        root.snapshot(INITIAL_SNAPSHOT_MESSAGE);

        let mut versions = KeyedIndex::new();
        versions.insert(0, ROOT);

        Self {
            name: name.into(),
            nodes: vec![root],
            active: ROOT,
            versions,
            total_versions: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of versions ever created; also the next version id.
    pub fn version_count(&self) -> u32 {
        self.total_versions
    }

    pub fn root(&self) -> &VersionNode {
        &self.nodes[ROOT.0]
    }

    pub fn active_version(&self) -> &VersionNode {
        &self.nodes[self.active.0]
    }

    /// Resolve a handle taken from one of this document's nodes.
    pub fn node(&self, handle: NodeHandle) -> Option<&VersionNode> {
        self.nodes.get(handle.0)
    }

    pub fn parent_of(&self, node: &VersionNode) -> Option<&VersionNode> {
        node.parent().and_then(|handle| self.node(handle))
    }

    /// Content of the active version.
    pub fn read(&self) -> &str {
        self.active_version().content()
    }

    /// Append `text` to the active version, branching first if it is a
    /// snapshot. Returns the id of the version that now holds the edit.
    pub fn insert(&mut self, text: &str) -> VersionId {
        self.edit(Edit::Append(text))
    }

    /// Replace the active version's content with `text`, branching first if it
    /// is a snapshot. Returns the id of the version that now holds the edit.
    pub fn update(&mut self, text: &str) -> VersionId {
        self.edit(Edit::Replace(text))
    }

    /// Freeze the active version under `message`.
    pub fn snapshot(&mut self, message: &str) -> VersionId {
        let node = &mut self.nodes[self.active.0];
        node.snapshot(message);
        tracing::debug!(document = %self.name, version = node.id(), "snapshot taken");
        node.id()
    }

    /// Move the active pointer back along the root-to-active path.
    ///
    /// A concrete target must be an ancestor of the active version (the active
    /// version itself counts). On failure `active` is unchanged.
    pub fn rollback(&mut self, target: RollbackTarget) -> Result<VersionId> {
        let active = self.active_version();
        let handle = match target {
            RollbackTarget::Parent => active.parent().ok_or(Error::NoParent(active.id()))?,
            RollbackTarget::Version(id) => {
                let handle = self.handle_of(id)?;
                if !self.ancestry(self.active).any(|ancestor| ancestor == handle) {
                    return Err(Error::InvalidRollbackTarget {
                        target: id,
                        active: active.id(),
                    });
                }
                handle
            }
        };

        self.active = handle;
        let id = self.active_version().id();
        tracing::debug!(document = %self.name, version = id, "rolled back");
        Ok(id)
    }

    /// Point `active` at any existing version, ancestor or not.
    pub fn switch_version(&mut self, id: VersionId) -> Result<VersionId> {
        self.active = self.handle_of(id)?;
        tracing::debug!(document = %self.name, version = id, "switched version");
        Ok(id)
    }

    /// Snapshots on the path from the root to the active version, root first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        let mut path: Vec<_> = self.ancestry(self.active).collect();
        path.reverse();
        path.into_iter()
            .map(|handle| &self.nodes[handle.0])
            .filter_map(|node| {
                node.snapshot_at().map(|snapshot_at| HistoryEntry {
                    id: node.id(),
                    message: node.message().to_owned(),
                    snapshot_at,
                })
            })
            .collect()
    }

    /// Versions without children, in breadth-first order from the root.
    pub fn leaf_versions(&self) -> Vec<&VersionNode> {
        let mut leaves = Vec::new();
        let mut queue = VecDeque::from([ROOT]);
        while let Some(handle) = queue.pop_front() {
            let node = &self.nodes[handle.0];
            if node.is_leaf() {
                leaves.push(node);
            }
            queue.extend(node.children().iter().copied());
        }
        leaves
    }

    pub fn find_version(&self, id: VersionId) -> Option<&VersionNode> {
        let &handle = self.versions.get(&id)?;
        self.node(handle)
    }

    /// Owned nested view of the whole tree.
    pub fn tree(&self) -> VersionTreeNode {
        self.subtree(ROOT)
    }

    fn subtree(&self, handle: NodeHandle) -> VersionTreeNode {
        let node = &self.nodes[handle.0];
        VersionTreeNode {
            id: node.id(),
            content: node.content().to_owned(),
            message: node.message().to_owned(),
            created_at: node.created_at(),
            last_modified_at: node.last_modified_at(),
            snapshot_at: node.snapshot_at(),
            active: handle == self.active,
            children: node
                .children()
                .iter()
                .map(|&child| self.subtree(child))
                .collect(),
        }
    }

    fn edit(&mut self, edit: Edit<'_>) -> VersionId {
        let active = &mut self.nodes[self.active.0];
        if !active.is_snapshot() {
            match edit {
                Edit::Append(text) => active.append(text),
                Edit::Replace(text) => active.replace(text),
            }
            tracing::debug!(document = %self.name, version = active.id(), "edited draft");
            return active.id();
        }

        let content = match edit {
            Edit::Append(text) => format!("{}{}", active.content(), text),
            Edit::Replace(text) => text.to_owned(),
        };
        self.branch(content)
    }

    /// Add a draft child of the active version and make it active.
    fn branch(&mut self, content: String) -> VersionId {
        let id = self.total_versions;
        let handle = NodeHandle(self.nodes.len());
        let parent = self.active;

        self.nodes.push(VersionNode::new(id, content, Some(parent)));
        self.nodes[parent.0].push_child(handle);
        self.versions.insert(id, handle);
        self.total_versions += 1;
        self.active = handle;

        tracing::debug!(
            document = %self.name,
            version = id,
            parent = self.nodes[parent.0].id(),
            "branched new version"
        );
        id
    }

    fn handle_of(&self, id: VersionId) -> Result<NodeHandle> {
        self.versions
            .get(&id)
            .copied()
            .ok_or(Error::VersionNotFound(id))
    }

    /// `from` and each of its ancestors up to the root.
    fn ancestry(&self, from: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        std::iter::successors(Some(from), |handle| self.nodes[handle.0].parent())
    }
}
