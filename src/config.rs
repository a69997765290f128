//! Relationship catalog and display configuration.
//!
//! A [`RelationshipDef`] names one link type between notes as a pair of
//! property roles: the primary property on a source note lists linked notes
//! directly, while the complementary property on a *linked* note constitutes
//! the inverse side, discovered via a vault-wide scan. Category tags select
//! which definitions feed which walk (`superordinate` for ancestor/descendant
//! views, `symmetrical` for coordinate views).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{read_to_string, write};
use std::path::Path;

use crate::error::StemmaError;

pub const CATEGORY_SUPERORDINATE: &str = "superordinate";
pub const CATEGORY_SYMMETRICAL: &str = "symmetrical";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDef {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complementary_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complementary_property: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub categories: BTreeSet<String>,
}

impl RelationshipDef {
    pub fn new(key: impl Into<String>) -> Self {
        RelationshipDef {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_primary(mut self, role: impl Into<String>, property: impl Into<String>) -> Self {
        self.primary_role = Some(role.into());
        self.primary_property = Some(property.into());
        self
    }

    pub fn with_complementary(
        mut self,
        role: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        self.complementary_role = Some(role.into());
        self.complementary_property = Some(property.into());
        self
    }

    pub fn with_category(mut self, tag: impl Into<String>) -> Self {
        self.categories.insert(tag.into());
        self
    }

    pub fn has_category(&self, tag: &str) -> bool {
        self.categories.contains(tag)
    }

    /// At least one of the two property names must be declared and non-empty.
    pub fn validate(&self) -> Result<(), StemmaError> {
        let declared = |p: &Option<String>| p.as_deref().is_some_and(|s| !s.is_empty());
        if declared(&self.primary_property) || declared(&self.complementary_property) {
            Ok(())
        } else {
            Err(StemmaError::Config(format!(
                "relationship '{}' declares no property name",
                self.key
            )))
        }
    }
}

/// Ordered, validated set of relationship definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipCatalog {
    definitions: Vec<RelationshipDef>,
}

impl RelationshipCatalog {
    pub fn new(definitions: Vec<RelationshipDef>) -> Result<Self, StemmaError> {
        let mut keys = BTreeSet::new();
        for def in &definitions {
            def.validate()?;
            if !keys.insert(def.key.clone()) {
                return Err(StemmaError::Config(format!(
                    "duplicate relationship key '{}'",
                    def.key
                )));
            }
        }
        Ok(RelationshipCatalog { definitions })
    }

    pub fn definitions(&self) -> &[RelationshipDef] {
        &self.definitions
    }

    pub fn get(&self, key: &str) -> Option<&RelationshipDef> {
        self.definitions.iter().find(|d| d.key == key)
    }

    pub fn by_category(&self, tag: &str) -> Vec<RelationshipDef> {
        self.definitions
            .iter()
            .filter(|d| d.has_category(tag))
            .cloned()
            .collect()
    }

    pub fn superordinate(&self) -> Vec<RelationshipDef> {
        self.by_category(CATEGORY_SUPERORDINATE)
    }

    pub fn symmetrical(&self) -> Vec<RelationshipDef> {
        self.by_category(CATEGORY_SYMMETRICAL)
    }
}

/// Display settings for rendered tree nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Property holding the note's resolved title. Falls back to the link
    /// alias, then the base file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_property: Option<String>,
    /// Property holding the note's glyph. Link-valued glyphs resolve
    /// transitively through the linked note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph_property: Option<String>,
    /// Whether display text carries the glyph prefix.
    pub show_glyphs: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        NavConfig {
            title_property: None,
            glyph_property: None,
            show_glyphs: true,
        }
    }
}

/// On-disk settings: display configuration plus the relationship catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub display: NavConfig,
    #[serde(default, rename = "relationship")]
    pub relationships: Vec<RelationshipDef>,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, StemmaError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StemmaError> {
        tracing::debug!("Attempting to read settings from: {:?}", path.as_ref());
        if !path.as_ref().exists() {
            tracing::debug!("Settings file not found, using defaults.");
            return Ok(Settings::default());
        }
        Settings::from_toml_str(&read_to_string(path)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StemmaError> {
        tracing::debug!("Attempting to write settings to: {:?}", path.as_ref());
        let toml_string = toml::to_string(self)?;
        write(path, toml_string)?;
        Ok(())
    }

    pub fn catalog(&self) -> Result<RelationshipCatalog, StemmaError> {
        RelationshipCatalog::new(self.relationships.clone())
    }
}
