//! Ability data model
//!
//! An ability is a named, described bundle of randomly sampled parameters.
//! Callers describe which parameters an ability has ([`AbilityConfig`]);
//! the [`assembler`] samples them and asks the model for a name and
//! description.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::llm::LlmError;

pub mod assembler;
pub mod extract;
pub mod project;
pub mod sampler;

pub use assembler::Assembler;
pub use project::Project;

/// Fallback bounds used when a parameter config holds non-numeric values
pub const DEFAULT_BOUNDS: NormalizedBounds = NormalizedBounds {
    min: 0,
    mode: 50,
    max: 100,
};

/// Key of a description table entry.
///
/// JSON object keys are always strings while YAML keys are usually
/// integers, so both are accepted and resolved during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptionKey {
    Int(i64),
    Text(String),
}

impl DescriptionKey {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DescriptionKey::Int(n) => Some(*n),
            DescriptionKey::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for DescriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionKey::Int(n) => write!(f, "{}", n),
            DescriptionKey::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Sampling configuration for one parameter, as supplied by the caller.
///
/// Bounds are kept loosely typed: form input and hand-written files carry
/// numbers as strings often enough that rejecting them would be hostile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<serde_json::Value>,
    pub descriptions: IndexMap<DescriptionKey, String>,
}

/// Integer bounds after normalization. Always `min <= mode <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedBounds {
    pub min: i64,
    pub mode: i64,
    pub max: i64,
}

impl ParameterConfig {
    /// Build a config from integer bounds
    pub fn new(min: i64, mode: Option<i64>, max: i64) -> Self {
        Self {
            min: Some(min.into()),
            max: Some(max.into()),
            mode: mode.map(Into::into),
            descriptions: IndexMap::new(),
        }
    }

    /// Add a description for a value
    pub fn with_description(mut self, key: i64, text: &str) -> Self {
        self.descriptions.insert(DescriptionKey::Int(key), text.to_string());
        self
    }

    /// Resolve the bounds into integers.
    ///
    /// Missing `min`/`max` default to 0/100 and a missing `mode` to the
    /// floored midpoint. Any value that is present but not numeric replaces
    /// the whole triple with [`DEFAULT_BOUNDS`].
    pub fn normalize(&self) -> NormalizedBounds {
        match self.try_bounds() {
            Ok(bounds) => bounds,
            Err(field) => {
                log::warn!(
                    "Invalid number in parameter config ({}), falling back to {}..{} mode {}",
                    field,
                    DEFAULT_BOUNDS.min,
                    DEFAULT_BOUNDS.max,
                    DEFAULT_BOUNDS.mode
                );
                DEFAULT_BOUNDS
            }
        }
    }

    fn try_bounds(&self) -> Result<NormalizedBounds, &'static str> {
        let mut min = match &self.min {
            Some(v) => coerce_int(v).ok_or("min")?,
            None => 0,
        };
        let mut max = match &self.max {
            Some(v) => coerce_int(v).ok_or("max")?,
            None => 100,
        };
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }

        let mode = match &self.mode {
            Some(serde_json::Value::Null) | None => midpoint(min, max),
            Some(v) => coerce_int(v).ok_or("mode")?,
        };

        Ok(NormalizedBounds {
            min,
            mode: mode.clamp(min, max),
            max,
        })
    }

    /// Description table keyed by integer value; non-numeric keys are dropped
    pub fn description_table(&self) -> BTreeMap<i64, String> {
        let mut table = BTreeMap::new();
        for (key, text) in &self.descriptions {
            match key.as_int() {
                Some(k) => {
                    table.insert(k, text.clone());
                }
                None => log::warn!("Description key '{}' is not a number, skipping", key),
            }
        }
        table
    }
}

fn coerce_int(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn midpoint(min: i64, max: i64) -> i64 {
    ((min as i128 + max as i128).div_euclid(2)) as i64
}

/// Configuration of one requested ability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    pub parameters: IndexMap<String, ParameterConfig>,
}

impl AbilityConfig {
    pub fn with_parameter(mut self, name: &str, config: ParameterConfig) -> Self {
        self.parameters.insert(name.to_string(), config);
        self
    }
}

/// A sampled parameter value together with its description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedParameter {
    pub value: i64,
    pub description: String,
    pub raw_config: ParameterConfig,
}

/// Sampled parameters in declaration order
pub type ParameterSet = IndexMap<String, GeneratedParameter>;

/// Name and description produced by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityText {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSet,
    pub config: AbilityConfig,
}

impl Ability {
    /// Replace the generated text, leaving the parameters untouched
    pub fn apply_text(&mut self, text: AbilityText) {
        self.name = text.name;
        self.description = text.description;
    }
}

/// The abilities generated for one concept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilitySet(Vec<Ability>);

impl AbilitySet {
    pub fn new(abilities: Vec<Ability>) -> Self {
        Self(abilities)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Ability> {
        self.0.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Ability> {
        self.0.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ability> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Ability] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a AbilitySet {
    type Item = &'a Ability;
    type IntoIter = std::slice::Iter<'a, Ability>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Errors surfaced to callers of the assembler
#[derive(Debug, Error)]
pub enum AbilityError {
    #[error("character concept is required")]
    EmptyConcept,

    #[error("at least one ability configuration is required")]
    NoAbilities,

    #[error("ability {index} not found (set has {len} abilities)")]
    NotFound { index: usize, len: usize },

    #[error("text generation failed: {0}")]
    Collaborator(#[from] LlmError),
}
