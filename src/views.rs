//! Top-level navigation views.
//!
//! [`NoteNavigator`] is the surface a UI layer calls: pick a focal note path
//! and a relationship-definition subset, get back finished trees. Each plain
//! entry point runs in a fresh [`GraphSession`]; the `_in` variants thread an
//! explicit shared session so composed multi-view renders reuse nodes (and
//! their memoized walks) across calls.

use crate::config::{NavConfig, RelationshipDef};
use crate::index::MetadataIndex;
use crate::node::NoteNode;
use crate::session::GraphSession;
use crate::tree::TreeRef;

pub const LABEL_SUPERORDINATE: &str = "superordinates";
pub const LABEL_SUBORDINATE: &str = "subordinates";
pub const LABEL_COORDINATE: &str = "coordinates";
pub const LABEL_BACKLINK: &str = "backlinks";

pub struct NoteNavigator<'a> {
    index: &'a dyn MetadataIndex,
    config: &'a NavConfig,
}

impl<'a> NoteNavigator<'a> {
    pub fn new(index: &'a dyn MetadataIndex, config: &'a NavConfig) -> Self {
        NoteNavigator { index, config }
    }

    /// Fresh session for composed multi-call renders via the `_in` variants.
    pub fn session(&self) -> GraphSession<'a> {
        GraphSession::new(self.index, self.config)
    }

    /// Ancestor view: one tree per topmost ancestor, each containing every
    /// chain of relationship links down to the focal note. With
    /// `expand_self`, the focal note's own descendant subtree (over the same
    /// definitions, bounded by `self_depth`) is grafted onto every leaf, so
    /// its descendants appear below it wherever it surfaces.
    pub fn ancestor_view(
        &self,
        path: &str,
        defs: &[RelationshipDef],
        height: Option<i32>,
        expand_self: bool,
        self_depth: Option<i32>,
    ) -> Vec<TreeRef<NoteNode>> {
        let session = self.session();
        self.ancestor_view_in(&session, path, defs, height, expand_self, self_depth)
    }

    pub fn ancestor_view_in(
        &self,
        session: &GraphSession<'a>,
        path: &str,
        defs: &[RelationshipDef],
        height: Option<i32>,
        expand_self: bool,
        self_depth: Option<i32>,
    ) -> Vec<TreeRef<NoteNode>> {
        let focal = session.node(path);
        let chains = focal.superordinate_chains(LABEL_SUPERORDINATE, defs, height, session);
        if expand_self {
            let subtree = focal.subordinate_subtrees(LABEL_SUBORDINATE, defs, self_depth, session);
            for leaf in &chains.leaves {
                for child in subtree.children() {
                    leaf.add_child(child);
                }
            }
        }
        tracing::debug!(
            "ancestor view of {path}: {} roots, {} leaves",
            chains.roots.len(),
            chains.leaves.len()
        );
        chains.roots
    }

    /// Descendant view: the subordinate subtree rooted at the focal note.
    pub fn descendant_view(
        &self,
        path: &str,
        defs: &[RelationshipDef],
        depth: Option<i32>,
    ) -> TreeRef<NoteNode> {
        let session = self.session();
        self.descendant_view_in(&session, path, defs, depth)
    }

    pub fn descendant_view_in(
        &self,
        session: &GraphSession<'a>,
        path: &str,
        defs: &[RelationshipDef],
        depth: Option<i32>,
    ) -> TreeRef<NoteNode> {
        session
            .node(path)
            .subordinate_subtrees(LABEL_SUBORDINATE, defs, depth, session)
    }

    /// Coordinate view: symmetric neighbors of the focal note, each expanded
    /// with its own descendant subtree over `secondary_defs`.
    pub fn coordinate_view(
        &self,
        path: &str,
        symmetric_defs: &[RelationshipDef],
        secondary_defs: &[RelationshipDef],
        depth: Option<i32>,
    ) -> TreeRef<NoteNode> {
        let session = self.session();
        self.coordinate_view_in(&session, path, symmetric_defs, secondary_defs, depth)
    }

    pub fn coordinate_view_in(
        &self,
        session: &GraphSession<'a>,
        path: &str,
        symmetric_defs: &[RelationshipDef],
        secondary_defs: &[RelationshipDef],
        depth: Option<i32>,
    ) -> TreeRef<NoteNode> {
        session.node(path).coordinate_subtrees(
            LABEL_COORDINATE,
            symmetric_defs,
            secondary_defs,
            depth,
            session,
        )
    }

    /// Backlink view: each structurally in-linking note wrapped through a
    /// zero-depth subordinate walk so the UI renders them uniformly as
    /// childless trees.
    pub fn backlink_view(&self, path: &str) -> Vec<TreeRef<NoteNode>> {
        let session = self.session();
        self.backlink_view_in(&session, path)
    }

    pub fn backlink_view_in(
        &self,
        session: &GraphSession<'a>,
        path: &str,
    ) -> Vec<TreeRef<NoteNode>> {
        let focal = session.node(path);
        focal
            .inbound_document_links(session)
            .into_iter()
            .map(|linking| {
                session
                    .node(&linking)
                    .subordinate_subtrees(LABEL_BACKLINK, &[], Some(0), session)
            })
            .collect()
    }
}
