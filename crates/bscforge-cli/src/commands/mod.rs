//! CLI command implementations.

pub mod chat;
pub mod config;
pub mod init;
pub mod pipeline;
pub mod status;
pub mod test;
pub mod train;

use anyhow::{Context, Result};
use bscforge_config::{AppPaths, Config, GenerationConfig};
use bscforge_index::Index;
use bscforge_ingest::Retriever;
use bscforge_nvidia::{accumulate_stream, GenerationOutcome, NvidiaClient, StreamEvent};
use colored::Colorize;
use std::io::{self, Write};
use tokio::runtime::Runtime;

/// Get the application paths.
pub fn get_paths() -> Result<AppPaths> {
    AppPaths::new().context("Failed to determine application directories")
}

/// Open the knowledge-base index, ensuring bscforge is initialized.
pub fn get_index() -> Result<Index> {
    let paths = get_paths()?;

    if !paths.is_initialized() {
        anyhow::bail!("bscforge is not initialized. Run 'bscforge init' first.");
    }

    Index::open(&paths.index_file).context("Failed to open knowledge base")
}

/// Retrieve context for a draft and stream one generation to the terminal.
///
/// Reasoning fragments render dimmed when requested; content fragments
/// render as they arrive. Returns the full artifact and the context used.
pub fn generate_streaming(
    rt: &Runtime,
    client: &NvidiaClient,
    retriever: &Retriever,
    generation: &GenerationConfig,
    chat_model: &str,
    draft: &str,
    show_reasoning: bool,
) -> Result<GenerationOutcome> {
    let context = rt
        .block_on(retriever.context(draft))
        .context("Failed to retrieve knowledge-base context")?;

    println!(
        "{} Retrieved {} canonical examples",
        "→".cyan(),
        context.len()
    );

    let rx = rt
        .block_on(client.generate_stream(generation, chat_model, draft, &context))
        .context("Failed to start generation")?;

    let mut reasoning_open = false;
    let code = rt
        .block_on(accumulate_stream(rx, |event| match event {
            StreamEvent::Reasoning(fragment) => {
                if show_reasoning {
                    print!("{}", fragment.dimmed());
                    io::stdout().flush().ok();
                    reasoning_open = true;
                }
            }
            StreamEvent::Content(fragment) => {
                if reasoning_open {
                    println!();
                    reasoning_open = false;
                }
                print!("{}", fragment);
                io::stdout().flush().ok();
            }
            StreamEvent::Failed(_) => {}
        }))
        .context("Generation failed")?;

    println!();

    Ok(GenerationOutcome {
        code,
        context,
    })
}

/// Format a file size in human-readable form.
pub fn format_size(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = KB * 1024;
    const GB: i64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Write the generated artifact to the output directory under the fixed
/// file name, returning the written path.
pub fn write_artifact(config: &Config, paths: &AppPaths, code: &str) -> Result<std::path::PathBuf> {
    let output_dir = config.output_dir(paths);
    std::fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let target = output_dir.join(bscforge_config::GENERATED_FILE_NAME);
    std::fs::write(&target, code).context("Failed to write generated code")?;

    Ok(target)
}
