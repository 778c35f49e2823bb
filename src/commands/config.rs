use colored::*;
use eyre::{Context, Result};

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
        ConfigAction::Set { key, value } => set(&key, &value, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "abilgen Configuration".bold());
            println!();

            println!("{}:", "llm".cyan());
            println!("  url: {}", config.llm.base_url());
            println!("  timeout_secs: {}", config.llm.timeout_secs);
            println!("  ability_model: {}", config.llm.ability_model);
            println!("  summary_model: {}", config.llm.summary_model);
            println!(
                "  sampling: temperature={} top_p={} num_predict={}",
                config.llm.temperature, config.llm.top_p, config.llm.num_predict
            );
            println!();

            println!("{}: {}", "locale".cyan(), config.locale);
            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
            println!();

            println!("{}:", "paths".cyan());
            println!("  projects: {}", config.paths.projects.display());
        }
    }

    Ok(())
}

fn lookup(key: &str, config: &Config) -> Option<String> {
    match key {
        "llm.host" => Some(config.llm.host.clone()),
        "llm.port" => Some(config.llm.port.to_string()),
        "llm.timeout_secs" => Some(config.llm.timeout_secs.to_string()),
        "llm.ability_model" => Some(config.llm.ability_model.clone()),
        "llm.summary_model" => Some(config.llm.summary_model.clone()),
        "llm.temperature" => Some(config.llm.temperature.to_string()),
        "llm.top_p" => Some(config.llm.top_p.to_string()),
        "llm.num_predict" => Some(config.llm.num_predict.to_string()),
        "locale" => Some(config.locale.to_string()),
        "paths.projects" => Some(config.paths.projects.display().to_string()),
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        _ => None,
    }
}

fn get(key: &str, config: &Config) -> Result<()> {
    match lookup(key, config) {
        Some(v) => println!("{}", v),
        None => {
            eprintln!("{} Unknown config key: {}", "✗".red(), key);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn apply(key: &str, value: &str, config: &mut Config) -> Result<()> {
    match key {
        "llm.host" => config.llm.host = value.to_string(),
        "llm.port" => config.llm.port = value.parse().context("Invalid port")?,
        "llm.timeout_secs" => config.llm.timeout_secs = value.parse().context("Invalid number of seconds")?,
        "llm.ability_model" => config.llm.ability_model = value.to_string(),
        "llm.summary_model" => config.llm.summary_model = value.to_string(),
        "llm.temperature" => config.llm.temperature = value.parse().context("Invalid temperature")?,
        "llm.top_p" => config.llm.top_p = value.parse().context("Invalid top_p")?,
        "llm.num_predict" => config.llm.num_predict = value.parse().context("Invalid token count")?,
        "locale" => config.locale = value.parse()?,
        "paths.projects" => config.paths.projects = value.into(),
        "log_level" | "log-level" => config.log_level = value.parse()?,
        _ => {
            eyre::bail!("Unknown config key: {}", key);
        }
    }

    Ok(())
}

fn set(key: &str, value: &str, config: &Config) -> Result<()> {
    println!("{} Setting {} = {}", "→".blue(), key.cyan(), value.green());

    let mut new_config = config.clone();
    apply(key, value, &mut new_config)?;

    let config_path = new_config.save()?;
    println!("  {} Saved to {}", "✓".green(), config_path.display());

    Ok(())
}
