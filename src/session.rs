//! Per-render-pass graph session.
//!
//! A session guarantees at most one [`NoteNode`] per note path, which is what
//! makes cycle detection and link merging correct: every reference to a path
//! within the pass resolves to the identical node object, so a walk that
//! re-enters a node still being computed observes "registered but unresolved"
//! and truncates instead of looping. Sessions are never shared across
//! independent render passes.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::config::NavConfig;
use crate::index::MetadataIndex;
use crate::node::NoteNode;
use crate::resolver::RecordResolver;

pub struct GraphSession<'a> {
    resolver: RecordResolver<'a>,
    config: &'a NavConfig,
    nodes: RefCell<BTreeMap<String, NoteNode>>,
}

impl<'a> GraphSession<'a> {
    pub fn new(index: &'a dyn MetadataIndex, config: &'a NavConfig) -> Self {
        GraphSession {
            resolver: RecordResolver::new(index),
            config,
            nodes: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn resolver(&self) -> &RecordResolver<'a> {
        &self.resolver
    }

    pub fn config(&self) -> &NavConfig {
        self.config
    }

    /// Get-or-create the node for `path`. Returns the node and whether this
    /// call created it. A first-seen link `alias` is applied only on
    /// creation; it never overrides an earlier label.
    pub fn acquire(&self, path: &str, alias: Option<&str>) -> (NoteNode, bool) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(existing) = nodes.get(path) {
            return (existing.clone(), false);
        }
        let node = NoteNode::new(path, alias);
        nodes.insert(path.to_string(), node.clone());
        tracing::trace!("session registered node {path}");
        (node, true)
    }

    /// Get-or-create without alias data.
    pub fn node(&self, path: &str) -> NoteNode {
        self.acquire(path, None).0
    }

    pub fn get(&self, path: &str) -> Option<NoteNode> {
        self.nodes.borrow().get(path).cloned()
    }

    /// Number of distinct notes touched so far in this pass.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Whether the one-time "index unavailable" notice fired this session.
    pub fn index_unavailable(&self) -> bool {
        self.resolver.index_unavailable()
    }
}
