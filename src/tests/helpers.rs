//! Shared fixtures for unit tests.

use crate::config::{
    RelationshipDef, CATEGORY_SUPERORDINATE, CATEGORY_SYMMETRICAL,
};
use crate::error::StemmaError;
use crate::index::{InMemoryIndex, MetadataIndex};
use crate::node::NoteNode;
use crate::properties::NoteRecord;
use crate::tree::TreeRef;

/// Hierarchical relationship: `entry-parents` on a note names its parents,
/// `entry-children` on a note names its children.
pub fn parent_def() -> RelationshipDef {
    RelationshipDef::new("parent")
        .with_primary("parent", "entry-parents")
        .with_complementary("child", "entry-children")
        .with_category(CATEGORY_SUPERORDINATE)
}

/// Second hierarchical relationship, used for multi-definition merging.
pub fn mentor_def() -> RelationshipDef {
    RelationshipDef::new("mentor")
        .with_primary("mentor", "entry-mentors")
        .with_complementary("student", "entry-students")
        .with_category(CATEGORY_SUPERORDINATE)
}

/// Symmetric relationship: both sides declare `entry-related`, so resolution
/// reads the property directly and scans it for the inbound half.
pub fn related_def() -> RelationshipDef {
    RelationshipDef::new("related")
        .with_primary("related", "entry-related")
        .with_complementary("related", "entry-related")
        .with_category(CATEGORY_SYMMETRICAL)
}

/// Build an in-memory vault from `(path, markdown)` pairs.
pub fn vault(notes: &[(&str, &str)]) -> InMemoryIndex {
    InMemoryIndex::from_notes(notes.iter().map(|(p, t)| (p.to_string(), t.to_string())))
        .expect("test vault parses")
}

/// Pre-order note paths of a tree, for shape assertions.
pub fn paths(tree: &TreeRef<NoteNode>) -> Vec<String> {
    tree.iter_pre_order().map(|n| n.value().path()).collect()
}

/// Paths of a tree's direct children.
pub fn child_paths(tree: &TreeRef<NoteNode>) -> Vec<String> {
    tree.children().iter().map(|c| c.value().path()).collect()
}

/// A metadata index that is never reachable.
pub struct FailingIndex;

impl MetadataIndex for FailingIndex {
    fn record(&self, _path: &str) -> Result<Option<NoteRecord>, StemmaError> {
        Err(StemmaError::Index("offline".to_string()))
    }

    fn all_records(&self) -> Result<Vec<NoteRecord>, StemmaError> {
        Err(StemmaError::Index("offline".to_string()))
    }

    fn inbound_document_links(&self, _path: &str) -> Result<Vec<String>, StemmaError> {
        Err(StemmaError::Index("offline".to_string()))
    }
}
