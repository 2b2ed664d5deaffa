//! Configuration commands.

use super::get_paths;
use anyhow::{Context, Result};
use bscforge_config::Config;
use colored::Colorize;
use std::process::Command;

pub fn show() -> Result<()> {
    let paths = get_paths()?;

    if !paths.config_file.exists() {
        anyhow::bail!("Config file not found. Run 'bscforge init' first.");
    }

    let contents =
        std::fs::read_to_string(&paths.config_file).context("Failed to read config file")?;

    println!("{}", "Current Configuration".cyan().bold());
    println!("{}", "─".repeat(50));
    println!("{}", contents);

    Ok(())
}

pub fn edit() -> Result<()> {
    let paths = get_paths()?;

    if !paths.config_file.exists() {
        anyhow::bail!("Config file not found. Run 'bscforge init' first.");
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "open -t".to_string()
        } else {
            "nano".to_string()
        }
    });

    let parts: Vec<&str> = editor.split_whitespace().collect();
    let (cmd, args) = parts.split_first().context("Invalid editor command")?;

    let status = Command::new(cmd)
        .args(args)
        .arg(&paths.config_file)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with error");
    }

    println!("{} Configuration saved.", "✓".green());

    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let paths = get_paths()?;

    let mut config = Config::load_from(&paths.config_file).context("Failed to load config")?;

    // Parse key path (e.g., "api.chat_model")
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "base_url"] => config.api.base_url = value.to_string(),
        ["api", "api_key"] => config.api.api_key = Some(value.to_string()),
        ["api", "embedding_model"] => config.api.embedding_model = value.to_string(),
        ["api", "chat_model"] => config.api.chat_model = value.to_string(),
        ["api", "timeout_seconds"] => {
            config.api.timeout_seconds = value.parse().context("Invalid timeout value")?;
        }
        ["generation", "temperature"] => {
            config.generation.temperature = value.parse().context("Invalid temperature value")?;
        }
        ["generation", "top_p"] => {
            config.generation.top_p = value.parse().context("Invalid top_p value")?;
        }
        ["generation", "max_tokens"] => {
            config.generation.max_tokens = value.parse().context("Invalid max_tokens value")?;
        }
        ["generation", "show_reasoning"] => {
            config.generation.show_reasoning = value.parse().context("Invalid boolean value")?;
        }
        ["chunking", "chunk_size"] => {
            config.chunking.chunk_size = value.parse().context("Invalid chunk_size value")?;
        }
        ["chunking", "chunk_overlap"] => {
            config.chunking.chunk_overlap = value.parse().context("Invalid chunk_overlap value")?;
        }
        ["retrieval", "default_k"] => {
            config.retrieval.default_k = value.parse().context("Invalid default_k value")?;
        }
        ["upload", "max_size_mb"] => {
            config.upload.max_size_mb = value.parse().context("Invalid max_size_mb value")?;
        }
        ["paths", "docs_dir"] => config.paths.docs_dir = Some(value.to_string()),
        ["paths", "output_dir"] => config.paths.output_dir = Some(value.to_string()),
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    }

    config
        .save_to(&paths.config_file)
        .context("Failed to save config")?;

    println!("{} Set {} = {}", "✓".green(), key.cyan(), value);

    Ok(())
}
