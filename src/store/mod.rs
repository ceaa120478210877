mod document;

pub use document::{VersionedDocument, INITIAL_SNAPSHOT_MESSAGE};

use crate::error::{Error, Result};
use crate::index::KeyedIndex;
use crate::models::{HistoryEntry, RollbackTarget, VersionId, VersionNode, VersionTreeNode};
use crate::rank::{RankHeap, Ranked};

/// Prefix for names synthesised by [`DocumentRegistry::create`].
pub const UNTITLED_PREFIX: &str = "untitled";

/// All documents of a session, by name.
///
/// Besides owning the documents, the registry ranks them by version count and
/// keeps an append-only record of which document each successful operation
/// touched.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: KeyedIndex<String, VersionedDocument>,
    sizes: RankHeap<String>,
    accesses: Vec<String>,
    untitled_count: u64,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.contains_key(name)
    }

    pub fn document(&self, name: &str) -> Result<&VersionedDocument> {
        self.documents
            .get(name)
            .ok_or_else(|| Error::DocumentNotFound(name.to_owned()))
    }

    // ============================================================
    // Lifecycle
    // ============================================================

    /// Create a document. Without a name, the next free `untitledN` is used.
    /// Returns the name the document was registered under.
    pub fn create(&mut self, name: Option<&str>) -> Result<String> {
        let name = match name {
            Some(name) if self.documents.contains_key(name) => {
                return Err(Error::AlreadyExists(name.to_owned()));
            }
            Some(name) => name.to_owned(),
            None => self.next_untitled_name(),
        };

        let document = VersionedDocument::new(name.clone());
        self.sizes
            .insert_or_update(name.clone(), u64::from(document.version_count()));
        self.documents.insert(name.clone(), document);
        self.accesses.push(name.clone());

        tracing::debug!(document = %name, "created document");
        Ok(name)
    }

    /// Re-register a document under `new`. Both names are validated before
    /// anything moves, so a failed rename leaves the registry untouched.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        if !self.documents.contains_key(old) {
            return Err(Error::DocumentNotFound(old.to_owned()));
        }
        if self.documents.contains_key(new) {
            return Err(Error::AlreadyExists(new.to_owned()));
        }

        let mut document = self
            .documents
            .remove(old)
            .ok_or_else(|| Error::DocumentNotFound(old.to_owned()))?;
        document.rename(new);
        let score = u64::from(document.version_count());
        self.documents.insert(new.to_owned(), document);

        self.sizes.remove(old);
        self.sizes.insert_or_update(new.to_owned(), score);

        tracing::debug!(from = %old, to = %new, "renamed document");
        Ok(())
    }

    /// Drop a document and its whole version tree.
    pub fn remove(&mut self, name: &str) -> Result<VersionedDocument> {
        let document = self
            .documents
            .remove(name)
            .ok_or_else(|| Error::DocumentNotFound(name.to_owned()))?;
        self.sizes.remove(name);

        tracing::debug!(document = %name, "removed document");
        Ok(document)
    }

    // ============================================================
    // Document operations
    // ============================================================

    pub fn read(&mut self, name: &str) -> Result<&str> {
        let document = self
            .documents
            .get(name)
            .ok_or_else(|| Error::DocumentNotFound(name.to_owned()))?;
        self.accesses.push(name.to_owned());
        Ok(document.read())
    }

    pub fn insert(&mut self, name: &str, text: &str) -> Result<VersionId> {
        self.apply(name, |document| Ok(document.insert(text)))
    }

    pub fn update(&mut self, name: &str, text: &str) -> Result<VersionId> {
        self.apply(name, |document| Ok(document.update(text)))
    }

    pub fn snapshot(&mut self, name: &str, message: &str) -> Result<VersionId> {
        self.apply(name, |document| Ok(document.snapshot(message)))
    }

    pub fn rollback(&mut self, name: &str, target: RollbackTarget) -> Result<VersionId> {
        self.apply(name, |document| document.rollback(target))
    }

    pub fn switch_version(&mut self, name: &str, id: VersionId) -> Result<VersionId> {
        self.apply(name, |document| document.switch_version(id))
    }

    pub fn history(&self, name: &str) -> Result<Vec<HistoryEntry>> {
        Ok(self.document(name)?.history())
    }

    pub fn find_version(&self, name: &str, id: VersionId) -> Result<Option<&VersionNode>> {
        Ok(self.document(name)?.find_version(id))
    }

    pub fn leaf_versions(&self, name: &str) -> Result<Vec<&VersionNode>> {
        Ok(self.document(name)?.leaf_versions())
    }

    pub fn active_version(&self, name: &str) -> Result<&VersionNode> {
        Ok(self.document(name)?.active_version())
    }

    pub fn tree(&self, name: &str) -> Result<VersionTreeNode> {
        Ok(self.document(name)?.tree())
    }

    // ============================================================
    // Queries across documents
    // ============================================================

    /// The `n` most recent accesses, newest first. A document accessed
    /// repeatedly appears once per access.
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.accesses.iter().rev().take(n).cloned().collect()
    }

    /// The `n` documents with the most versions, largest first.
    pub fn biggest_trees(&self, n: usize) -> Vec<Ranked<String>> {
        self.sizes.top_k(n)
    }

    /// Every registered name, in index order.
    pub fn list_all(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    /// Run `op` against `name`, then refresh its size ranking and record the
    /// access. Nothing is recorded when `op` fails.
    fn apply<T>(
        &mut self,
        name: &str,
        op: impl FnOnce(&mut VersionedDocument) -> Result<T>,
    ) -> Result<T> {
        let document = self
            .documents
            .get_mut(name)
            .ok_or_else(|| Error::DocumentNotFound(name.to_owned()))?;
        let outcome = op(document)?;

        self.sizes
            .update(name, u64::from(document.version_count()));
        self.accesses.push(name.to_owned());
        Ok(outcome)
    }

    fn next_untitled_name(&mut self) -> String {
        loop {
            self.untitled_count += 1;
            let candidate = format!("{UNTITLED_PREFIX}{}", self.untitled_count);
            if !self.documents.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_operations_are_not_recorded() {
        let mut registry = DocumentRegistry::new();
        registry.create(Some("a")).unwrap();
        assert!(registry.rollback("a", RollbackTarget::Parent).is_err());
        assert!(registry.insert("missing", "x").is_err());
        assert_eq!(registry.recent(10), vec!["a"]);
    }

    #[test]
    fn untitled_names_skip_taken_ones() {
        let mut registry = DocumentRegistry::new();
        registry.create(Some("untitled1")).unwrap();
        assert_eq!(registry.create(None).unwrap(), "untitled2");
        assert_eq!(registry.create(None).unwrap(), "untitled3");
    }

    #[test]
    fn scores_follow_version_count() {
        let mut registry = DocumentRegistry::new();
        registry.create(Some("a")).unwrap();
        registry.insert("a", "one").unwrap();
        registry.snapshot("a", "s1").unwrap();
        registry.insert("a", "two").unwrap();

        let top = registry.biggest_trees(1);
        assert_eq!(top[0].key, "a");
        assert_eq!(top[0].score, 3);
    }
}
