//! Project files
//!
//! A project is the concept plus the abilities generated for it, stored as
//! indented UTF-8 JSON so it can be edited by hand and loaded back later.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::AbilitySet;

/// File name used when no output path is given
pub const DEFAULT_PROJECT_FILE: &str = "project_ability_data.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub concept: String,
    #[serde(default)]
    pub abilities: AbilitySet,
}

impl Project {
    pub fn new(concept: &str, abilities: AbilitySet) -> Self {
        Self {
            concept: concept.to_string(),
            abilities,
        }
    }

    /// Serialize with 4-space indentation, keeping non-ASCII text as is
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer).context("Failed to serialize project")?;

        String::from_utf8(buf).context("Project JSON is not valid UTF-8")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create project directory")?;
        }

        fs::write(path, self.to_json()?).with_context(|| format!("Failed to write project to {}", path.display()))?;

        log::info!("Saved project with {} abilities to {}", self.abilities.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read project at {}", path.display()))?;

        serde_json::from_str(&content).with_context(|| format!("Failed to parse project at {}", path.display()))
    }
}
