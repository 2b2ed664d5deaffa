//! Initialize bscforge.

use super::get_paths;
use anyhow::{Context, Result};
use bscforge_config::{Config, API_KEY_ENV};
use bscforge_index::Index;
use colored::Colorize;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    if paths.is_initialized() {
        println!("{} bscforge is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
        println!("  Knowledge base: {}", paths.index_file.display());
        return Ok(());
    }

    println!("{}", "Initializing bscforge...".cyan().bold());

    // Create directories
    paths.ensure_dirs().context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    // Create config file
    Config::create_default_file(&paths.config_file).context("Failed to create config file")?;
    println!(
        "  {} Created config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    // Initialize the knowledge base
    let _index = Index::open(&paths.index_file).context("Failed to initialize knowledge base")?;
    println!(
        "  {} Created knowledge base: {}",
        "✓".green(),
        paths.index_file.display()
    );

    // Report external dependencies
    println!();
    println!("{}", "Dependencies:".white().bold());
    for (tool, available) in bscforge_process::check_dependencies() {
        if available {
            println!("  {} {} (image OCR)", "✓".green(), tool);
        } else {
            println!(
                "  {} {} not found - image uploads will be rejected until it is installed",
                "✗".red(),
                tool
            );
        }
    }
    if std::env::var(API_KEY_ENV).is_err() {
        println!(
            "  {} {} is not set; add an api_key to the config or export it",
            "!".yellow(),
            API_KEY_ENV
        );
    }

    println!();
    println!("{}", "bscforge initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Place canonical B2Scala examples in: {}",
        paths.docs_dir.display()
    );
    println!("  2. Build the knowledge base: {}", "bscforge train".cyan());
    println!("  3. Start generating: {}", "bscforge chat".cyan());

    Ok(())
}
