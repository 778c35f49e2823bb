//! Text generation backends
//!
//! The assembler only sees [`TextGenerator`]. The production implementation
//! talks to an Ollama server over HTTP ([`client::OllamaClient`]).

use thiserror::Error;

use crate::ability::{Ability, AbilityText, ParameterSet};

pub mod client;
pub mod prompt;

pub use client::OllamaClient;

/// Failure to obtain usable text from the model server
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("server answered with status {code}")]
    Status { code: u16 },

    #[error("could not decode server response: {0}")]
    Decode(String),

    #[error("answer did not follow the expected template")]
    Unparseable,
}

/// Source of ability names, descriptions and character summaries
pub trait TextGenerator {
    /// Name and description for an ability with the given parameters
    fn generate_ability_text(&self, concept: &str, parameters: &ParameterSet) -> Result<AbilityText, LlmError>;

    /// Overall description of a character from its abilities
    fn generate_summary_text(&self, concept: &str, abilities: &[Ability]) -> Result<String, LlmError>;

    /// Models the backend can serve
    fn list_available_backends(&self) -> Result<Vec<String>, LlmError>;

    /// Whether the backend is reachable at all
    fn probe_connectivity(&self) -> bool;
}
