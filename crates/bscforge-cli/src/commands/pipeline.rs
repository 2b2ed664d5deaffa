//! Pipeline command - one non-interactive generation from a draft file.

use super::{generate_streaming, get_index, get_paths, write_artifact};
use anyhow::{Context, Result};
use bscforge_config::{Config, COLLECTION_NAME};
use bscforge_ingest::Retriever;
use bscforge_nvidia::NvidiaClient;
use colored::Colorize;
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub fn run(draft: Option<String>) -> Result<()> {
    let paths = get_paths()?;
    let config = Config::load().context("Failed to load configuration")?;
    let index = get_index()?;

    let draft_file: PathBuf = match draft {
        Some(path) => PathBuf::from(shellexpand::tilde(&path).into_owned()),
        None => paths.data_dir.join("structured_draft.txt"),
    };

    let draft_text = std::fs::read_to_string(&draft_file)
        .with_context(|| format!("Failed to read draft file: {}", draft_file.display()))?;

    println!("{} {}", "Draft:".cyan().bold(), draft_file.display());
    println!("{}", "─".repeat(70));

    let client = NvidiaClient::from_config(&config.api).context("Failed to create API client")?;
    let retriever = Retriever::new(
        index,
        client.clone(),
        &config.api.embedding_model,
        COLLECTION_NAME,
        config.retrieval.default_k,
    );
    let rt = Runtime::new().context("Failed to create async runtime")?;

    let outcome = generate_streaming(
        &rt,
        &client,
        &retriever,
        &config.generation,
        &config.api.chat_model,
        &draft_text,
        config.generation.show_reasoning,
    )?;

    // Dump the context used alongside the artifact
    let output_dir = config.output_dir(&paths);
    std::fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let context_file = output_dir.join("context.txt");
    let context_dump: String = outcome
        .context
        .iter()
        .map(|c| format!("{}\n---\n", c))
        .collect();
    std::fs::write(&context_file, context_dump).context("Failed to write context file")?;

    let artifact = write_artifact(&config, &paths, &outcome.code)?;

    println!();
    println!("{}", "─".repeat(70));
    println!("{} {}", "Generated:".green().bold(), artifact.display());
    println!("{} {}", "Context:".cyan(), context_file.display());

    Ok(())
}
