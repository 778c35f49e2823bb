//! Initialize abilgen configuration

use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::Config;

/// Example ability configurations written next to the config file
const SAMPLE_ABILITIES: &str = r#"# Ability configurations for `abilgen generate -a <this file>`.
# Each entry is one ability; every parameter is sampled between min and max,
# most likely near mode. Descriptions are matched to the nearest value.
concept: A wandering frost mage who guards a mountain pass
abilities:
  - parameters:
      power:
        min: 0
        max: 10
        mode: 6
        descriptions:
          0: barely noticeable
          1: weak
          6: dangerous
          10: devastating
      range:
        min: 1
        max: 30
        mode: 5
        descriptions:
          1: touch
          5: close
          30: across the battlefield
  - parameters:
      cooldown:
        min: 1
        max: 12
        descriptions:
          1: can be used every turn
          12: once per fight
"#;

fn write_file(path: &Path, content: &str, force: bool, label: &str) -> Result<()> {
    if path.exists() && !force {
        println!("  {} {} exists: {} (use --force to overwrite)", "⚠".yellow(), label, path.display());
        return Ok(());
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("  {} {}: {}", "✓".green(), label, path.display());
    Ok(())
}

pub fn run(force: bool, config: &Config) -> Result<()> {
    let abilgen_dir = Config::abilgen_dir();
    println!("{} Initializing abilgen in {}", "→".blue(), abilgen_dir.display());

    fs::create_dir_all(&abilgen_dir).context("Failed to create abilgen directory")?;

    let config_yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    write_file(&Config::config_file(), &config_yaml, force, "Config")?;
    write_file(&abilgen_dir.join("abilities.yaml"), SAMPLE_ABILITIES, force, "Sample abilities")?;

    let projects_dir = config.projects_dir();
    fs::create_dir_all(&projects_dir).context("Failed to create projects directory")?;
    println!("  {} Projects directory: {}", "✓".green(), projects_dir.display());

    println!();
    println!("Next steps:");
    println!("  {}", "abilgen doctor".cyan());
    println!(
        "  {}",
        format!("abilgen generate -a {}", abilgen_dir.join("abilities.yaml").display()).cyan()
    );

    Ok(())
}
