use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "abilgen",
    about = "Character ability generator - random ability parameters named by a local Ollama model",
    version,
    after_help = "Logs are written to: ~/.local/share/abilgen/logs/abilgen.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to abilgen.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config and a sample ability file
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate abilities for a character concept
    Generate {
        /// Character concept (defaults to the `concept` field of the ability file)
        #[arg(long)]
        concept: Option<String>,

        /// Ability configurations (YAML or JSON)
        #[arg(long, short = 'a')]
        abilities: PathBuf,

        /// Project file to write (defaults to the projects directory)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Seed for reproducible parameter sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Regenerate the name and description of one ability in a project
    Regenerate {
        /// Project file
        project: PathBuf,

        /// Zero-based ability index
        index: usize,

        /// Character concept (defaults to the project's concept)
        #[arg(long)]
        concept: Option<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Describe the character of a project as a whole
    Summary {
        /// Project file
        project: PathBuf,

        /// Character concept (defaults to the project's concept)
        #[arg(long)]
        concept: Option<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Sample ability parameters without calling the model
    Preview {
        /// Ability configurations (YAML or JSON list)
        #[arg(long, short = 'a')]
        abilities: PathBuf,

        /// Seed for reproducible parameter sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Check the connection to the model server
    Status {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Diagnose setup issues
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (e.g. llm.port)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. llm.port)
        key: String,

        /// Value to set
        value: String,
    },
}
