//! The graph-traversal unit: one note within one render pass.
//!
//! A [`NoteNode`] wraps a note path plus the state a traversal accumulates
//! around it: the lazily fetched [`NoteRecord`], the relationship ledger
//! (linked path → relationship tags, consumed by a UI to pick directional
//! glyphs), and a memo cache of finished walk results. Nodes are owned by the
//! [`GraphSession`] that created them and referenced by the trees the walks
//! return; nothing survives the render pass.
//!
//! The four walks share one link-resolution primitive and differ in shaping
//! policy:
//!
//! - [`NoteNode::superordinate_chains`] climbs primary links (plus the
//!   complementary inbound scan) and splices each ancestor's chains above a
//!   copy of this node.
//! - [`NoteNode::subordinate_subtrees`] is the polarity-inverted dual,
//!   building the tree of notes below this one.
//! - [`NoteNode::coordinate_subtrees`] resolves symmetric links one level out
//!   and expands each neighbor with its own subordinate subtree.
//! - [`NoteNode::inbound_document_links`] surfaces structural backlinks, with
//!   no graph walk at all.
//!
//! Cycle safety comes from session registration order: a node enters the
//! session map before its walk result exists, so a re-entrant lookup finds
//! the node but no memo entry and truncates the walk there.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::RelationshipDef;
use crate::properties::{base_name, NoteRecord, PropertyItem};
use crate::session::GraphSession;
use crate::tree::TreeRef;

/// Transitive glyph resolution gives up past this many link hops.
const GLYPH_HOP_LIMIT: usize = 16;

/// One entry in a node's relationship ledger: which relationship connects the
/// two notes and whether the link arrived via the inbound scan side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationTag {
    pub relationship: String,
    pub inbound: bool,
}

/// Result of an ancestor-chain walk. The leaves are tree nodes wrapping the
/// walk's starting note (one per distinct convergence of ancestor paths); the
/// roots are the topmost ancestors reached. Every root-to-leaf path is one
/// valid chain of relationship links down to the starting note. Both sets are
/// deduplicated by tree-node identity.
#[derive(Clone, Default)]
pub struct AncestorChains {
    pub roots: Vec<TreeRef<NoteNode>>,
    pub leaves: Vec<TreeRef<NoteNode>>,
}

impl AncestorChains {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.leaves.is_empty()
    }
}

impl fmt::Debug for AncestorChains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AncestorChains")
            .field("roots", &self.roots.len())
            .field("leaves", &self.leaves.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum WalkKind {
    Superordinate,
    Subordinate,
    Coordinate,
}

/// Memo key: walk kind, view label, and the relationship keys involved.
/// Deliberately excludes the depth/height limit; the first call's limit
/// governs cached reuse for the rest of the session (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    kind: WalkKind,
    label: String,
    relationships: Vec<String>,
    secondary: Vec<String>,
}

impl MemoKey {
    fn new(kind: WalkKind, label: &str, defs: &[RelationshipDef]) -> Self {
        MemoKey {
            kind,
            label: label.to_string(),
            relationships: def_keys(defs),
            secondary: Vec::new(),
        }
    }

    fn coordinate(label: &str, symmetric: &[RelationshipDef], secondary: &[RelationshipDef]) -> Self {
        MemoKey {
            kind: WalkKind::Coordinate,
            label: label.to_string(),
            relationships: def_keys(symmetric),
            secondary: def_keys(secondary),
        }
    }
}

fn def_keys(defs: &[RelationshipDef]) -> Vec<String> {
    let mut keys: Vec<String> = defs.iter().map(|d| d.key.clone()).collect();
    keys.sort();
    keys.dedup();
    keys
}

enum MemoEntry {
    Chains(AncestorChains),
    Subtree(TreeRef<NoteNode>),
}

struct NodeState {
    path: String,
    alias: Option<String>,
    // None = not fetched yet; Some(None) = fetched, note has no record.
    record: Option<Option<Rc<NoteRecord>>>,
    ledger: BTreeMap<String, Vec<RelationTag>>,
    memo: HashMap<MemoKey, MemoEntry>,
}

/// Cheap-clone handle to one note's traversal state. Equality is object
/// identity: within a session there is exactly one node per path, so identity
/// comparison is path comparison that also distinguishes sessions.
#[derive(Clone)]
pub struct NoteNode(Rc<RefCell<NodeState>>);

impl PartialEq for NoteNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NoteNode {}

impl fmt::Debug for NoteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteNode({})", self.0.borrow().path)
    }
}

impl NoteNode {
    pub(crate) fn new(path: &str, alias: Option<&str>) -> Self {
        NoteNode(Rc::new(RefCell::new(NodeState {
            path: path.to_string(),
            alias: alias.map(str::to_string),
            record: None,
            ledger: BTreeMap::new(),
            memo: HashMap::new(),
        })))
    }

    pub fn path(&self) -> String {
        self.0.borrow().path.clone()
    }

    pub fn base_name(&self) -> String {
        base_name(&self.0.borrow().path).to_string()
    }

    /// First-seen link alias, if any link to this note carried one.
    pub fn alias(&self) -> Option<String> {
        self.0.borrow().alias.clone()
    }

    /// The relationship ledger accumulated so far: linked path → tags. A
    /// linked path carries several tags when multiple relationship types
    /// connect the same two notes.
    pub fn relationships(&self) -> BTreeMap<String, Vec<RelationTag>> {
        self.0.borrow().ledger.clone()
    }

    /// Lazily fetched record; cached for the node's lifetime, including the
    /// missing-record outcome.
    pub fn record(&self, session: &GraphSession) -> Option<Rc<NoteRecord>> {
        if let Some(cached) = self.0.borrow().record.clone() {
            return cached;
        }
        let fetched = session.resolver().resolve(&self.path()).map(Rc::new);
        self.0.borrow_mut().record = Some(fetched.clone());
        fetched
    }

    fn record_relation(&self, linked: &str, tag: RelationTag) {
        let mut state = self.0.borrow_mut();
        let tags = state.ledger.entry(linked.to_string()).or_default();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    /// Resolve this note's links under one relationship definition.
    ///
    /// Paths read directly from `direct_property` are tagged
    /// `inbound = invert`; paths discovered by the vault scan on
    /// `scan_property` are tagged the opposite way. The polarity flag exists
    /// because the ancestor and descendant walks read the same definition
    /// from opposite semantic directions. Returns the deduplicated union and
    /// records every path into the relationship ledger.
    pub(crate) fn resolve_linked_paths(
        &self,
        session: &GraphSession,
        relationship: &str,
        direct_property: Option<&str>,
        scan_property: Option<&str>,
        invert: bool,
        alias_sink: &mut BTreeMap<String, String>,
    ) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut linked = Vec::new();
        if let Some(property) = direct_property.filter(|p| !p.is_empty()) {
            if let Some(record) = self.record(session) {
                for path in record.path_list(property, Some(alias_sink)) {
                    self.record_relation(
                        &path,
                        RelationTag {
                            relationship: relationship.to_string(),
                            inbound: invert,
                        },
                    );
                    if seen.insert(path.clone()) {
                        linked.push(path);
                    }
                }
            }
        }
        if let Some(property) = scan_property.filter(|p| !p.is_empty()) {
            for path in session
                .resolver()
                .inbound_linking_paths(&self.path(), property)
            {
                self.record_relation(
                    &path,
                    RelationTag {
                        relationship: relationship.to_string(),
                        inbound: !invert,
                    },
                );
                if seen.insert(path.clone()) {
                    linked.push(path);
                }
            }
        }
        linked
    }

    fn memoized_chains(&self, key: &MemoKey) -> Option<AncestorChains> {
        match self.0.borrow().memo.get(key) {
            Some(MemoEntry::Chains(chains)) => Some(chains.clone()),
            _ => None,
        }
    }

    fn memoized_subtree(&self, key: &MemoKey) -> Option<TreeRef<NoteNode>> {
        match self.0.borrow().memo.get(key) {
            Some(MemoEntry::Subtree(tree)) => Some(tree.clone()),
            _ => None,
        }
    }

    fn memoize(&self, key: MemoKey, entry: MemoEntry) {
        self.0.borrow_mut().memo.insert(key, entry);
    }

    /// Ancestor-chain walk.
    ///
    /// Climbs every relationship in `defs` (primary property read directly,
    /// complementary property via the inbound scan), splicing each ancestor's
    /// own chains above a tree node wrapping this note. A negative `height`
    /// yields empty chains; a note with no ancestors is its own one-node
    /// chain. Memoized per (label, relationship set); an ancestor reached
    /// while its own walk is still in flight is a cycle and contributes
    /// nothing.
    pub fn superordinate_chains(
        &self,
        label: &str,
        defs: &[RelationshipDef],
        height: Option<i32>,
        session: &GraphSession,
    ) -> AncestorChains {
        let key = MemoKey::new(WalkKind::Superordinate, label, defs);
        if let Some(hit) = self.memoized_chains(&key) {
            return hit;
        }
        let mut chains = AncestorChains::default();
        if !matches!(height, Some(h) if h < 0) {
            tracing::trace!("superordinate walk '{label}' at {}", self.path());
            let mut aliases = BTreeMap::new();
            for def in defs {
                let linked = self.resolve_linked_paths(
                    session,
                    &def.key,
                    def.primary_property.as_deref(),
                    def.complementary_property.as_deref(),
                    false,
                    &mut aliases,
                );
                for path in linked {
                    if path == self.path() {
                        continue;
                    }
                    let (node, created) =
                        session.acquire(&path, aliases.get(&path).map(String::as_str));
                    let sub = if created {
                        Some(node.superordinate_chains(
                            label,
                            defs,
                            height.map(|h| h - 1),
                            session,
                        ))
                    } else {
                        // Registered but unresolved means this node is its
                        // own transitive ancestor; truncate the cycle here.
                        node.memoized_chains(&key)
                    };
                    let Some(sub) = sub else { continue };
                    for root in sub.roots {
                        push_unique(&mut chains.roots, root);
                    }
                    for leaf in sub.leaves {
                        let child = leaf.ensure_child(self.clone());
                        push_unique(&mut chains.leaves, child);
                    }
                }
            }
            if chains.is_empty() {
                let solo = TreeRef::new(self.clone());
                chains.roots.push(solo.clone());
                chains.leaves.push(solo);
            }
        }
        self.memoize(key, MemoEntry::Chains(chains.clone()));
        chains
    }

    /// Descendant-subtree walk: the polarity-inverted dual of
    /// [`Self::superordinate_chains`].
    ///
    /// A limit of zero or below yields a childless tree. A linked path equal
    /// to this note's own (convergence back onto the traversal root) attaches
    /// a terminal self child; a path already registered in the session
    /// attaches that node as a terminal child instead of re-expanding it.
    /// Each distinct linked path contributes at most one child.
    pub fn subordinate_subtrees(
        &self,
        label: &str,
        defs: &[RelationshipDef],
        depth: Option<i32>,
        session: &GraphSession,
    ) -> TreeRef<NoteNode> {
        let key = MemoKey::new(WalkKind::Subordinate, label, defs);
        if let Some(hit) = self.memoized_subtree(&key) {
            return hit;
        }
        let root = TreeRef::new(self.clone());
        if !matches!(depth, Some(d) if d <= 0) {
            tracing::trace!("subordinate walk '{label}' at {}", self.path());
            let mut aliases = BTreeMap::new();
            let mut attached = BTreeSet::new();
            for def in defs {
                let linked = self.resolve_linked_paths(
                    session,
                    &def.key,
                    def.complementary_property.as_deref(),
                    def.primary_property.as_deref(),
                    true,
                    &mut aliases,
                );
                for path in linked {
                    if !attached.insert(path.clone()) {
                        continue;
                    }
                    if path == self.path() {
                        root.add_child(TreeRef::new(self.clone()));
                        continue;
                    }
                    let (node, created) =
                        session.acquire(&path, aliases.get(&path).map(String::as_str));
                    if created {
                        root.add_child(node.subordinate_subtrees(
                            label,
                            defs,
                            depth.map(|d| d - 1),
                            session,
                        ));
                    } else {
                        root.add_child(TreeRef::new(node));
                    }
                }
            }
        }
        self.memoize(key, MemoEntry::Subtree(root.clone()));
        root
    }

    /// Coordinate walk: symmetric cross-links one level out, each neighbor
    /// (this note included, when a link converges back onto it) expanded with
    /// its own subordinate subtree over `secondary_defs` rather than a
    /// transitive coordinate chain.
    pub fn coordinate_subtrees(
        &self,
        label: &str,
        symmetric_defs: &[RelationshipDef],
        secondary_defs: &[RelationshipDef],
        depth: Option<i32>,
        session: &GraphSession,
    ) -> TreeRef<NoteNode> {
        let key = MemoKey::coordinate(label, symmetric_defs, secondary_defs);
        if let Some(hit) = self.memoized_subtree(&key) {
            return hit;
        }
        let root = TreeRef::new(self.clone());
        if !matches!(depth, Some(d) if d <= 0) {
            tracing::trace!("coordinate walk '{label}' at {}", self.path());
            let mut aliases = BTreeMap::new();
            let mut attached = BTreeSet::new();
            for def in symmetric_defs {
                let linked = self.resolve_linked_paths(
                    session,
                    &def.key,
                    def.complementary_property.as_deref(),
                    def.primary_property.as_deref(),
                    true,
                    &mut aliases,
                );
                for path in linked {
                    if !attached.insert(path.clone()) {
                        continue;
                    }
                    let node = if path == self.path() {
                        self.clone()
                    } else {
                        session
                            .acquire(&path, aliases.get(&path).map(String::as_str))
                            .0
                    };
                    root.add_child(node.subordinate_subtrees(
                        label,
                        secondary_defs,
                        depth.map(|d| d - 1),
                        session,
                    ));
                }
            }
        }
        self.memoize(key, MemoEntry::Subtree(root.clone()));
        root
    }

    /// Structural backlinks: every note whose document body links name this
    /// note, excluding self-references. Not memoized and not a graph walk.
    pub fn inbound_document_links(&self, session: &GraphSession) -> Vec<String> {
        let own = self.path();
        session
            .resolver()
            .inbound_document_links(&own)
            .into_iter()
            .filter(|p| *p != own)
            .collect()
    }

    /// Resolved display label: title property, else link alias, else base
    /// file name, optionally prefixed by the resolved glyph.
    pub fn display_text(&self, session: &GraphSession) -> String {
        let config = session.config();
        let name = config
            .title_property
            .as_deref()
            .and_then(|prop| {
                self.record(session)
                    .and_then(|r| r.string_list(prop).into_iter().next())
            })
            .or_else(|| self.alias())
            .unwrap_or_else(|| self.base_name());
        if config.show_glyphs {
            if let Some(glyph) = self.glyph(session) {
                return format!("{glyph} {name}");
            }
        }
        name
    }

    /// Glyph from the configured property. A link-valued glyph defers to the
    /// linked note's glyph, transitively, with a hop cap against loops.
    pub fn glyph(&self, session: &GraphSession) -> Option<String> {
        let property = session.config().glyph_property.clone()?;
        let mut visited = BTreeSet::new();
        self.glyph_inner(session, &property, &mut visited)
    }

    fn glyph_inner(
        &self,
        session: &GraphSession,
        property: &str,
        visited: &mut BTreeSet<String>,
    ) -> Option<String> {
        if visited.len() >= GLYPH_HOP_LIMIT || !visited.insert(self.path()) {
            return None;
        }
        let record = self.record(session)?;
        let value = record.property(property)?;
        match value.items().first()? {
            PropertyItem::Text(text) => Some(text.clone()),
            PropertyItem::Link { target, .. } => session
                .node(target)
                .glyph_inner(session, property, visited),
        }
    }
}

fn push_unique(list: &mut Vec<TreeRef<NoteNode>>, node: TreeRef<NoteNode>) {
    if !list.iter().any(|existing| existing.same(&node)) {
        list.push(node);
    }
}
