//! Test command - smoke test the knowledge base and API.

use super::get_index;
use anyhow::{Context, Result};
use bscforge_config::{Config, COLLECTION_NAME};
use bscforge_ingest::Retriever;
use bscforge_nvidia::NvidiaClient;
use colored::Colorize;
use tokio::runtime::Runtime;

const SMOKE_QUERIES: [&str; 4] = [
    "Simple authentication protocol with client and server",
    "Key exchange using Diffie-Hellman",
    "TLS handshake protocol",
    "Kerberos authentication",
];

pub fn run() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let index = get_index()?;

    println!("{}", "Running smoke test...".cyan().bold());
    println!();

    // The knowledge base must be built first
    let (embedded, total) = index.embedding_stats(COLLECTION_NAME)?;
    if total == 0 {
        anyhow::bail!("Knowledge base is empty. Run 'bscforge train' first.");
    }
    if embedded == 0 {
        anyhow::bail!("Knowledge base has no embeddings. Run 'bscforge train' first.");
    }
    println!(
        "  {} Knowledge base: {} chunks, {} embedded",
        "✓".green(),
        total,
        embedded
    );

    let client = NvidiaClient::from_config(&config.api).context("Failed to create API client")?;
    let rt = Runtime::new().context("Failed to create async runtime")?;

    // Reaching the embedding endpoint exercises the credentials too
    if !rt.block_on(client.is_available(&config.api.embedding_model)) {
        anyhow::bail!(
            "API is not reachable at {}. Check the API key and connection.",
            config.api.base_url
        );
    }
    println!("  {} API reachable: {}", "✓".green(), config.api.base_url);
    println!();

    let retriever = Retriever::new(
        index,
        client,
        &config.api.embedding_model,
        COLLECTION_NAME,
        config.retrieval.default_k,
    );

    let mut failures = 0;
    for (i, query) in SMOKE_QUERIES.iter().enumerate() {
        println!("{} Query {}: {}", "→".cyan(), i + 1, query);

        match rt.block_on(retriever.context(query)) {
            Ok(context) => {
                println!("    Retrieved {} relevant examples", context.len());
            }
            Err(e) => {
                failures += 1;
                println!("    {} {}", "✗".red(), e);
            }
        }
    }

    println!();
    if failures > 0 {
        anyhow::bail!("{} of {} smoke queries failed", failures, SMOKE_QUERIES.len());
    }

    println!("{}", "Smoke test passed!".green().bold());
    Ok(())
}
