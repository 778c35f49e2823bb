use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::prompt::Locale;

/// Main abilgen configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub locale: Locale,
    pub paths: PathsConfig,
    pub log_level: LogLevel,
    /// File this configuration was loaded from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Connection and sampling settings for the Ollama server
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for every request to the server, in seconds
    pub timeout_secs: u64,
    /// Model used to name and describe abilities
    pub ability_model: String,
    /// Model used for the character summary
    pub summary_model: String,
    pub temperature: f32,
    pub top_p: f32,
    /// Maximum number of tokens the model may produce per answer
    pub num_predict: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where project files are written when no output path is given
    pub projects: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            _ => eyre::bail!("Unknown log level: {}", s),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 57002,
            timeout_secs: 30,
            ability_model: "gpt-oss:latest".to_string(),
            summary_model: "llama3.1:latest".to_string(),
            temperature: 0.8,
            top_p: 0.9,
            num_predict: 2000,
        }
    }
}

impl LlmConfig {
    /// Base URL of the Ollama HTTP API
    pub fn base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}:{}", self.host.trim_end_matches('/'), self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            projects: data_dir.join("abilgen").join("projects"),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check ABILGEN_CONFIG env var
        if let Ok(env_path) = std::env::var("ABILGEN_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from ABILGEN_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try ABILGEN_DIR/abilgen.yaml, then ~/.config/abilgen/abilgen.yaml
        let path = Self::config_file();
        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        // Try ./abilgen.yaml (for development)
        let local_config = PathBuf::from("abilgen.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.source = Some(path.as_ref().to_path_buf());

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Get the abilgen directory (where the config file lives)
    pub fn abilgen_dir() -> PathBuf {
        std::env::var("ABILGEN_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("abilgen"))
    }

    /// Path of the user config file
    pub fn config_file() -> PathBuf {
        Self::abilgen_dir().join("abilgen.yaml")
    }

    /// File that `save` writes to: the loaded file, else the user config file
    pub fn target_file(&self) -> PathBuf {
        self.source.clone().unwrap_or_else(Self::config_file)
    }

    /// Write this configuration back to the file it came from
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = self.target_file();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let yaml_str = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(&config_path, yaml_str).context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Projects directory with `~` and env vars expanded
    pub fn projects_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.projects)
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}
