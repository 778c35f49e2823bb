//! Model server status
//!
//! Shows whether the Ollama server answers and which models it serves.

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::llm::{OllamaClient, TextGenerator};

#[derive(Serialize)]
struct Status {
    version: String,
    url: String,
    connected: bool,
    models: Vec<String>,
    ability_model: ModelStatus,
    summary_model: ModelStatus,
    message: String,
}

#[derive(Serialize)]
struct ModelStatus {
    name: String,
    available: bool,
}

fn collect(config: &Config) -> Status {
    let client = OllamaClient::new(&config.llm, config.locale);
    let connected = client.probe_connectivity();

    let models = if connected {
        client.list_available_backends().unwrap_or_else(|e| {
            log::error!("Failed to get models: {}", e);
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let model_status = |name: &str| ModelStatus {
        name: name.to_string(),
        available: models.iter().any(|m| m == name),
    };
    let ability_model = model_status(&config.llm.ability_model);
    let summary_model = model_status(&config.llm.summary_model);

    let message = if connected {
        "Connected to Ollama".to_string()
    } else {
        "Cannot connect to Ollama. Make sure the server is running.".to_string()
    };

    Status {
        version: env!("CARGO_PKG_VERSION").to_string(),
        url: client.base_url().to_string(),
        connected,
        models,
        ability_model,
        summary_model,
        message,
    }
}

pub fn run(format: OutputFormat, config: &Config) -> Result<()> {
    let status = collect(config);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&status)?);
        }
        OutputFormat::Text => print_text(&status),
    }

    Ok(())
}

fn print_text(status: &Status) {
    println!("{} {}", "abilgen".bold(), status.version.dimmed());
    println!();

    if status.connected {
        println!("{} {} ({})", "✓".green(), status.message, status.url);
    } else {
        println!("{} {} ({})", "✗".red(), status.message, status.url);
        return;
    }

    println!();
    println!("{}", "Models:".bold());
    if status.models.is_empty() {
        println!("  {} No models installed", "⚠".yellow());
    }
    for model in &status.models {
        println!("  {}", model);
    }

    println!();
    for (role, model) in [("ability", &status.ability_model), ("summary", &status.summary_model)] {
        if model.available {
            println!("{} {} model: {}", "✓".green(), role, model.name);
        } else {
            println!("{} {} model: {} (not installed)", "⚠".yellow(), role, model.name);
        }
    }
}
