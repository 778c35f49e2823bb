//! Diagnose abilgen setup issues

use colored::*;
use eyre::Result;
use std::fs;
use std::process::Command;

use crate::config::Config;
use crate::llm::{OllamaClient, TextGenerator};

pub fn run(config: &Config) -> Result<()> {
    println!("{}", "abilgen Doctor".bold());
    println!("{}", "═".repeat(50));
    println!();

    let mut issues = 0;

    // Check config file
    let config_file = config.target_file();
    if config_file.exists() {
        println!("{} Config file: {}", "✓".green(), config_file.display());
    } else {
        println!("{} Config file missing: {} (using defaults)", "⚠".yellow(), config_file.display());
        println!("  Run {} to create it", "abilgen init".cyan());
    }

    // Check projects directory
    let projects_dir = config.projects_dir();
    if projects_dir.exists() {
        let count = count_projects(&projects_dir);
        println!(
            "{} Projects directory: {} ({} projects)",
            "✓".green(),
            projects_dir.display(),
            count
        );
    } else {
        println!("{} Projects directory missing: {}", "⚠".yellow(), projects_dir.display());
    }

    println!();

    // Check the model server
    println!("{}", "Ollama:".bold());

    match which::which("ollama") {
        Ok(path) => {
            let version = get_command_version(&path.to_string_lossy()).unwrap_or_else(|| "available".to_string());
            println!("  {} ollama CLI ({})", "✓".green(), version.dimmed());
        }
        Err(_) => {
            println!("  {} ollama CLI not found on PATH (fine if the server runs in a container)", "⚠".yellow());
        }
    }

    let client = OllamaClient::new(&config.llm, config.locale);
    if client.probe_connectivity() {
        println!("  {} Server reachable at {}", "✓".green(), client.base_url());

        let models = client.list_available_backends().unwrap_or_default();
        for (role, name) in [("ability", &config.llm.ability_model), ("summary", &config.llm.summary_model)] {
            if models.iter().any(|m| m == name) {
                println!("  {} {} model {}", "✓".green(), role, name);
            } else {
                println!("  {} {} model {} not installed", "✗".red(), role, name);
                println!("    Run {}", format!("ollama pull {}", name).cyan());
                issues += 1;
            }
        }
    } else {
        println!("  {} Server not reachable at {}", "✗".red(), client.base_url());
        println!(
            "    Start it with: {}",
            format!(
                "docker run -d -v ollama:/root/.ollama -p {}:11434 --name ollama ollama/ollama",
                config.llm.port
            )
            .cyan()
        );
        println!("    Abilities will use fallback text until the server is available.");
        issues += 1;
    }

    println!();

    // Summary
    println!("{}", "═".repeat(50));
    if issues == 0 {
        println!("{} All checks passed!", "✓".green().bold());
    } else {
        println!("{} {} issue(s) found", "⚠".yellow().bold(), issues);
    }

    Ok(())
}

fn count_projects(dir: &std::path::Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                .count()
        })
        .unwrap_or(0)
}

fn get_command_version(cmd: &str) -> Option<String> {
    let version_output = Command::new(cmd).arg("--version").output().ok()?;

    if !version_output.status.success() {
        return None;
    }

    let version_str = String::from_utf8_lossy(&version_output.stdout);
    // Extract first line, limit to reasonable length
    let version = version_str
        .lines()
        .next()
        .unwrap_or("")
        .chars()
        .take(40)
        .collect::<String>();
    Some(version.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_count_projects_only_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(count_projects(dir.path()), 2);
    }

    #[test]
    fn test_count_projects_missing_dir() {
        assert_eq!(count_projects(std::path::Path::new("/nonexistent/projects")), 0);
    }
}
