//! Note record resolution over the metadata-index collaborator.
//!
//! All index access during a render pass funnels through [`RecordResolver`].
//! An unavailable index is reported once per session as a warning and then
//! treated as empty for the rest of the pass; a fresh render pass is the
//! retry mechanism.

use std::cell::Cell;

use crate::error::StemmaError;
use crate::index::MetadataIndex;
use crate::properties::NoteRecord;

pub struct RecordResolver<'a> {
    index: &'a dyn MetadataIndex,
    unavailable: Cell<bool>,
}

impl<'a> RecordResolver<'a> {
    pub fn new(index: &'a dyn MetadataIndex) -> Self {
        RecordResolver {
            index,
            unavailable: Cell::new(false),
        }
    }

    /// Fetch the record backing `path`, or `None` when the note does not
    /// exist, has not been indexed, or the index is unreachable.
    pub fn resolve(&self, path: &str) -> Option<NoteRecord> {
        match self.index.record(path) {
            Ok(record) => record,
            Err(err) => {
                self.report("record lookup", &err);
                None
            }
        }
    }

    /// Vault-wide scan: paths of every other note whose `property` list
    /// contains a link to `target`. This is the complementary side of an
    /// asymmetric relationship and costs O(total notes) per call; callers
    /// memoize per relationship per node per traversal.
    pub fn inbound_linking_paths(&self, target: &str, property: &str) -> Vec<String> {
        let records = match self.index.all_records() {
            Ok(records) => records,
            Err(err) => {
                self.report("vault scan", &err);
                return Vec::new();
            }
        };
        records
            .into_iter()
            .filter(|r| r.path != target)
            .filter(|r| r.path_list(property, None).iter().any(|p| p == target))
            .map(|r| r.path)
            .collect()
    }

    /// Structural backlinks on `path` (document hyperlinks, not declared
    /// relationship properties).
    pub fn inbound_document_links(&self, path: &str) -> Vec<String> {
        match self.index.inbound_document_links(path) {
            Ok(paths) => paths,
            Err(err) => {
                self.report("backlink lookup", &err);
                Vec::new()
            }
        }
    }

    /// Whether the index failed at any point during this session.
    pub fn index_unavailable(&self) -> bool {
        self.unavailable.get()
    }

    fn report(&self, context: &str, err: &StemmaError) {
        if !self.unavailable.replace(true) {
            tracing::warn!("Metadata index unavailable during {context}: {err}");
        }
    }
}
