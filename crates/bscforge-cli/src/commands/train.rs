//! Train command - build the knowledge base from the docs directory.

use super::{get_index, get_paths};
use anyhow::{Context, Result};
use bscforge_config::{Config, COLLECTION_NAME};
use bscforge_ingest::{build_collection, ChunkConfig, Chunker};
use bscforge_nvidia::NvidiaClient;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::runtime::Runtime;

pub fn run() -> Result<()> {
    let paths = get_paths()?;
    let config = Config::load().context("Failed to load configuration")?;
    let index = get_index()?;

    let docs_dir = config.docs_dir(&paths);
    if !docs_dir.is_dir() {
        anyhow::bail!(
            "Docs directory not found: {}. Create it and add .pdf/.txt/.scala examples.",
            docs_dir.display()
        );
    }

    println!("{}", "Building knowledge base...".cyan().bold());
    println!("  Source: {}", docs_dir.display());
    println!();

    // Extract, chunk, and store
    let chunker = Chunker::new(ChunkConfig::from_chunking_config(&config.chunking));
    let chunks = build_collection(&index, &chunker, COLLECTION_NAME, &docs_dir)
        .context("Failed to build knowledge base")?;

    if chunks.is_empty() {
        anyhow::bail!(
            "No training files found in {}. Supported formats: .pdf, .txt, .scala",
            docs_dir.display()
        );
    }

    println!("  {} Created {} chunks", "✓".green(), chunks.len());

    // Embed every chunk
    let client =
        NvidiaClient::from_config(&config.api).context("Failed to create API client")?;
    let rt = Runtime::new().context("Failed to create async runtime")?;

    println!(
        "  {} Embedding with '{}'",
        "→".cyan(),
        config.api.embedding_model.cyan()
    );

    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let mut embedded = 0;
    let mut errors = 0;

    for chunk in &chunks {
        match rt.block_on(client.embed(&config.api.embedding_model, &chunk.content)) {
            Ok(embedding) => {
                index.store_embedding(&chunk.id, &embedding, &config.api.embedding_model)?;
                embedded += 1;
            }
            Err(e) => {
                errors += 1;
                pb.println(format!("{} Chunk {}: {}", "Error:".red(), &chunk.id[..8], e));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    println!("  {} Embedded {} chunks", "✓".green(), embedded.to_string().green());
    if errors > 0 {
        println!("  {} {} chunks failed to embed", "⚠".yellow(), errors.to_string().yellow());
    }

    println!();
    println!("{}", "Knowledge base ready!".green().bold());

    Ok(())
}
