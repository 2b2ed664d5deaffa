//! Status command - knowledge-base statistics.

use super::{format_size, get_index, get_paths};
use anyhow::{Context, Result};
use bscforge_config::{Config, COLLECTION_NAME};
use bscforge_index::Index;
use colored::Colorize;

pub fn run() -> Result<()> {
    let paths = get_paths()?;
    let config = Config::load().context("Failed to load configuration")?;
    let index = get_index()?;

    let stats = index.get_stats(COLLECTION_NAME)?;

    println!("{}", "bscforge Status".cyan().bold());
    println!("{}", "─".repeat(50));

    println!();
    println!("{}", "Knowledge Base".white().bold());
    println!("  Documents: {}", stats.total_documents.to_string().green());
    println!("  Chunks: {}", stats.total_chunks);
    println!(
        "  Embedded: {} / {}",
        stats.embedded_chunks.to_string().green(),
        stats.total_chunks
    );
    if let Ok(size) = Index::file_size(&paths.index_file) {
        println!("  Index size: {}", format_size(size));
    }

    println!();
    println!("{}", "Models".white().bold());
    println!("  Embedding: {}", config.api.embedding_model);
    println!("  Generation: {}", config.api.chat_model);

    println!();
    println!("{}", "Paths".white().bold());
    println!("  Docs: {}", config.docs_dir(&paths).display());
    println!("  Output: {}", config.output_dir(&paths).display());

    if stats.total_chunks == 0 {
        println!();
        println!(
            "{} Knowledge base is empty. Run {} after adding examples.",
            "Note:".yellow(),
            "bscforge train".cyan()
        );
    } else if stats.embedded_chunks < stats.total_chunks {
        println!();
        println!(
            "{} {} chunks are missing embeddings. Re-run {}.",
            "Note:".yellow(),
            stats.total_chunks - stats.embedded_chunks,
            "bscforge train".cyan()
        );
    }

    Ok(())
}
