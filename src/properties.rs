//! Building blocks for note metadata: property values, link items, and the
//! per-note [`NoteRecord`] snapshot consumed by the traversal engine.
//!
//! A note's property block is a YAML mapping delimited by `---` lines at the
//! top of the document. Property values are scalars or lists; string values
//! written as wikilinks (`[[target]]` or `[[target|alias]]`) are parsed into
//! link items carrying a path and an optional display alias.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::StemmaError;

/// A full-string wikilink, e.g. `[[notes/topic.md|Topic]]`.
static WIKILINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[\[([^\[\]|#]+)(?:#[^\[\]|]*)?(?:\|([^\[\]]*))?\]\]$")
        .expect("wikilink pattern is valid")
});

/// Wikilinks embedded anywhere in document body text.
static BODY_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([^\[\]|#]+)(?:#[^\[\]|]*)?(?:\|[^\[\]]*)?\]\]")
        .expect("body link pattern is valid")
});

/// Strip directories and a trailing `.md` extension from a note path.
pub fn base_name(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.strip_suffix(".md").unwrap_or(name)
}

/// One element of a property value: either plain text or a link to another
/// note, optionally carrying the alias text the author wrote for the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyItem {
    Text(String),
    Link {
        target: String,
        alias: Option<String>,
    },
}

impl PropertyItem {
    /// Parse a raw string value. Wikilink syntax becomes a [`PropertyItem::Link`];
    /// anything else stays text.
    pub fn from_text(raw: &str) -> Self {
        if let Some(caps) = WIKILINK.captures(raw.trim()) {
            let target = caps[1].trim().to_string();
            let alias = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            return PropertyItem::Link { target, alias };
        }
        PropertyItem::Text(raw.to_string())
    }

    /// Linked note path, when this item is a link.
    pub fn path(&self) -> Option<&str> {
        match self {
            PropertyItem::Link { target, .. } => Some(target),
            PropertyItem::Text(_) => None,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            PropertyItem::Link { alias, .. } => alias.as_deref(),
            PropertyItem::Text(_) => None,
        }
    }

    /// Plain-string rendition: the text itself, or a link's target path.
    pub fn as_str(&self) -> &str {
        match self {
            PropertyItem::Text(s) => s,
            PropertyItem::Link { target, .. } => target,
        }
    }
}

/// A declared property value: a single item or an ordered list of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    Scalar(PropertyItem),
    List(Vec<PropertyItem>),
}

impl PropertyValue {
    pub fn items(&self) -> &[PropertyItem] {
        match self {
            PropertyValue::Scalar(item) => std::slice::from_ref(item),
            PropertyValue::List(items) => items,
        }
    }

    fn items_mut(&mut self) -> &mut [PropertyItem] {
        match self {
            PropertyValue::Scalar(item) => std::slice::from_mut(item),
            PropertyValue::List(items) => items,
        }
    }

    fn from_yaml(value: &serde_yaml::Value) -> Option<PropertyValue> {
        match value {
            serde_yaml::Value::Sequence(seq) => Some(PropertyValue::List(
                seq.iter().filter_map(Self::item_from_yaml).collect(),
            )),
            other => Self::item_from_yaml(other).map(PropertyValue::Scalar),
        }
    }

    fn item_from_yaml(value: &serde_yaml::Value) -> Option<PropertyItem> {
        match value {
            serde_yaml::Value::String(s) => Some(PropertyItem::from_text(s)),
            serde_yaml::Value::Number(n) => Some(PropertyItem::Text(n.to_string())),
            serde_yaml::Value::Bool(b) => Some(PropertyItem::Text(b.to_string())),
            _ => None,
        }
    }
}

/// Read-only snapshot of one note's declared properties plus its structural
/// outbound document links (body wikilinks, independent of any declared
/// relationship property).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub path: String,
    properties: BTreeMap<String, PropertyValue>,
    outbound_links: Vec<String>,
}

impl NoteRecord {
    pub fn new(path: impl Into<String>) -> Self {
        NoteRecord {
            path: path.into(),
            properties: BTreeMap::new(),
            outbound_links: Vec::new(),
        }
    }

    /// Fixture-style builder used heavily by tests.
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn with_outbound_link(mut self, target: impl Into<String>) -> Self {
        let target = target.into();
        if !self.outbound_links.contains(&target) {
            self.outbound_links.push(target);
        }
        self
    }

    /// Parse a markdown document: an optional leading `---`-delimited YAML
    /// property block, then a body scanned for wikilinks.
    pub fn from_markdown(path: &str, text: &str) -> Result<Self, StemmaError> {
        let mut record = NoteRecord::new(path);
        let (frontmatter, body) = split_frontmatter(text);
        if let Some(frontmatter) = frontmatter {
            let parsed: serde_yaml::Value = serde_yaml::from_str(frontmatter)?;
            if let serde_yaml::Value::Mapping(mapping) = parsed {
                for (key, value) in &mapping {
                    let Some(name) = key.as_str() else { continue };
                    if let Some(value) = PropertyValue::from_yaml(value) {
                        record.properties.insert(name.to_string(), value);
                    }
                }
            }
        }
        for caps in BODY_LINK.captures_iter(body) {
            let target = caps[1].trim().to_string();
            if !target.is_empty() && !record.outbound_links.contains(&target) {
                record.outbound_links.push(target);
            }
        }
        Ok(record)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn outbound_links(&self) -> &[String] {
        &self.outbound_links
    }

    /// Read a property as a list of linked note paths. A scalar link yields a
    /// single-element list; list items without a path are ignored. When
    /// `alias_sink` is given, each path's first-seen link alias is recorded
    /// into it so the linked note can be labeled before its own record loads.
    pub fn path_list(
        &self,
        name: &str,
        mut alias_sink: Option<&mut BTreeMap<String, String>>,
    ) -> Vec<String> {
        let Some(value) = self.properties.get(name) else {
            return Vec::new();
        };
        let mut paths = Vec::new();
        for item in value.items() {
            let Some(path) = item.path() else { continue };
            if let (Some(sink), Some(alias)) = (alias_sink.as_deref_mut(), item.alias()) {
                sink.entry(path.to_string())
                    .or_insert_with(|| alias.to_string());
            }
            paths.push(path.to_string());
        }
        paths
    }

    /// Read a property as one or more plain strings, wrapping a scalar into a
    /// single-element list. Link items render as their target path.
    pub fn string_list(&self, name: &str) -> Vec<String> {
        self.properties
            .get(name)
            .map(|value| value.items().iter().map(|i| i.as_str().to_string()).collect())
            .unwrap_or_default()
    }

    /// Rewrite link targets through `resolve` (used by the index to map
    /// wikilink names onto canonical vault paths).
    pub(crate) fn normalize_links<F>(&mut self, resolve: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for value in self.properties.values_mut() {
            for item in value.items_mut() {
                if let PropertyItem::Link { target, .. } = item {
                    if let Some(resolved) = resolve(target) {
                        *target = resolved;
                    }
                }
            }
        }
        for target in &mut self.outbound_links {
            if let Some(resolved) = resolve(target) {
                *target = resolved;
            }
        }
        self.outbound_links.dedup();
    }
}

/// Split a document into its `---`-delimited property block and body.
fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let rest = text.strip_prefix("\u{feff}").unwrap_or(text);
    let Some(after_open) = rest.strip_prefix("---\n").or_else(|| rest.strip_prefix("---\r\n"))
    else {
        return (None, rest);
    };
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let frontmatter = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (Some(frontmatter), body);
        }
        offset += line.len();
    }
    (None, rest)
}
