//! # stemma-core
//!
//! A note-graph navigation engine for personal knowledge bases: given notes
//! with user-declared directional relationship metadata in their property
//! blocks, it computes deduplicated, cycle-safe, depth-bounded tree views —
//! ancestor chains, descendant subtrees, coordinate cross-links, and
//! backlinks — rooted at a focused note.
//!
//! The name "stemma" comes from stemmatics: the family tree of a text's
//! surviving copies.
//!
//! ## Overview
//!
//! Notes declare relationships through properties. A relationship definition
//! pairs a *primary* property (the source note lists linked notes directly)
//! with an optional *complementary* property (a linked note naming this one
//! constitutes the inverse side, discovered by a vault-wide scan). From these
//! the engine resolves a directed multi-relationship graph over note paths
//! and projects it into four tree shapes, recomputed on demand from the
//! current metadata snapshot.
//!
//! - **Ancestor chains**: every path of "ranks above" links from a topmost
//!   ancestor down to the focal note, with convergent paths merged.
//! - **Descendant subtrees**: the dual view of notes below the focal note.
//! - **Coordinate subtrees**: symmetric cross-links, each neighbor expanded
//!   with its own descendant subtree.
//! - **Backlinks**: structural document hyperlinks naming the focal note.
//!
//! Cyclic relationship graphs are never an error: each render pass runs in a
//! [`session::GraphSession`] holding exactly one node per note path, and a
//! walk re-entering a node whose result is still being computed truncates
//! there instead of recursing forever.
//!
//! ## Quick Start
//!
//! ```rust
//! use stemma_core::config::{NavConfig, RelationshipDef, CATEGORY_SUPERORDINATE};
//! use stemma_core::index::InMemoryIndex;
//! use stemma_core::views::NoteNavigator;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let index = InMemoryIndex::from_notes([
//!         ("X.md", "---\nentry-parents: \"[[Y]]\"\n---\n"),
//!         ("Y.md", "# Y\n"),
//!     ])?;
//!     let parent = RelationshipDef::new("parent")
//!         .with_primary("parent", "entry-parents")
//!         .with_category(CATEGORY_SUPERORDINATE);
//!     let config = NavConfig::default();
//!     let navigator = NoteNavigator::new(&index, &config);
//!
//!     // One chain: Y above X.
//!     let roots = navigator.ancestor_view("X.md", &[parent.clone()], None, false, None);
//!     assert_eq!(roots.len(), 1);
//!     assert_eq!(roots[0].value().path(), "Y.md");
//!     assert_eq!(roots[0].children()[0].value().path(), "X.md");
//!     Ok(())
//! }
//! ```
//!
//! ## Collaborators
//!
//! File storage and metadata indexing belong to the host application; the
//! engine consumes them through [`index::MetadataIndex`]. The bundled
//! [`index::InMemoryIndex`] parses markdown frontmatter itself so the crate
//! is usable standalone. UI rendering, settings persistence, and dialogs are
//! likewise out of scope: views return [`tree::TreeRef`] structures whose
//! [`node::NoteNode`] payloads expose paths, display text, and the
//! relationship ledger a UI needs for directional glyphs.

pub mod config;
pub mod error;
pub mod index;
pub mod node;
pub mod properties;
pub mod resolver;
pub mod session;
pub mod tree;
#[cfg(test)]
mod tests;
pub mod views;

pub use error::*;
