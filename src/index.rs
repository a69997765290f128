//! The metadata-index collaborator boundary.
//!
//! The traversal core consumes note metadata through [`MetadataIndex`]; a host
//! application supplies its own implementation backed by whatever storage it
//! owns. [`InMemoryIndex`] is the bundled implementation: a vault-wide
//! snapshot built from markdown sources (in memory or walked from a
//! directory), with wikilink targets normalized onto canonical note paths and
//! an inbound document-link map derived from each note's body links.

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::StemmaError;
use crate::properties::{base_name, NoteRecord};

/// Abstract contract the core needs from the host's metadata index.
pub trait MetadataIndex {
    /// Per-path record, or `None` when the path has never been indexed.
    fn record(&self, path: &str) -> Result<Option<NoteRecord>, StemmaError>;

    /// Vault-wide snapshot, used for inbound-property scans.
    fn all_records(&self) -> Result<Vec<NoteRecord>, StemmaError>;

    /// Structural backlinks: paths of notes whose document body links name
    /// `path`. Independent of declared relationship properties.
    fn inbound_document_links(&self, path: &str) -> Result<Vec<String>, StemmaError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    records: BTreeMap<String, NoteRecord>,
    inbound: BTreeMap<String, Vec<String>>,
}

impl InMemoryIndex {
    /// Build from `(path, markdown text)` pairs.
    pub fn from_notes<I, P, T>(notes: I) -> Result<Self, StemmaError>
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<String>,
        T: AsRef<str>,
    {
        let mut records = BTreeMap::new();
        for (path, text) in notes {
            let path = path.into();
            let record = NoteRecord::from_markdown(&path, text.as_ref())?;
            records.insert(path, record);
        }
        Ok(Self::finish(records))
    }

    /// Build from pre-assembled records (fixtures, host adapters). Link
    /// normalization and the inbound map are still applied.
    pub fn from_records<I: IntoIterator<Item = NoteRecord>>(records: I) -> Self {
        Self::finish(
            records
                .into_iter()
                .map(|r| (r.path.clone(), r))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    /// Walk a directory for `*.md` files, indexing each under its
    /// root-relative path.
    pub fn from_dir<P: AsRef<Path>>(root: P) -> Result<Self, StemmaError> {
        let root = root.as_ref();
        let mut records = BTreeMap::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| StemmaError::Io(format!("vault walk failed: {e}")))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| StemmaError::Io(format!("vault path escape: {e}")))?;
            let path = rel.to_string_lossy().replace('\\', "/");
            let record = NoteRecord::from_markdown(&path, &read_to_string(entry.path())?)?;
            records.insert(path, record);
        }
        tracing::debug!("Indexed {} notes from {:?}", records.len(), root);
        Ok(Self::finish(records))
    }

    /// Normalize link targets onto known paths and derive the inbound map.
    ///
    /// Target resolution: an exact path match stays as-is; otherwise a target
    /// whose base name uniquely matches one indexed note resolves to that
    /// note's path; ambiguous or unknown targets are left untouched.
    fn finish(mut records: BTreeMap<String, NoteRecord>) -> Self {
        let mut by_base: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for path in records.keys() {
            by_base
                .entry(base_name(path).to_string())
                .or_default()
                .push(path.clone());
        }
        let known: Vec<String> = records.keys().cloned().collect();
        let resolve = |target: &str| -> Option<String> {
            if known.binary_search(&target.to_string()).is_ok() {
                return None;
            }
            match by_base.get(base_name(target)) {
                Some(paths) if paths.len() == 1 => Some(paths[0].clone()),
                _ => None,
            }
        };
        for record in records.values_mut() {
            record.normalize_links(&resolve);
        }

        let mut inbound: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for record in records.values() {
            for target in record.outbound_links() {
                let sources = inbound.entry(target.clone()).or_default();
                if !sources.contains(&record.path) {
                    sources.push(record.path.clone());
                }
            }
        }
        InMemoryIndex { records, inbound }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl MetadataIndex for InMemoryIndex {
    fn record(&self, path: &str) -> Result<Option<NoteRecord>, StemmaError> {
        Ok(self.records.get(path).cloned())
    }

    fn all_records(&self) -> Result<Vec<NoteRecord>, StemmaError> {
        Ok(self.records.values().cloned().collect())
    }

    fn inbound_document_links(&self, path: &str) -> Result<Vec<String>, StemmaError> {
        Ok(self.inbound.get(path).cloned().unwrap_or_default())
    }
}
