//! Chat command - interactive code-generation front end.

use super::{generate_streaming, get_index, get_paths, write_artifact};
use anyhow::{Context, Result};
use bscforge_config::{Config, COLLECTION_NAME};
use bscforge_core::ConversationTurn;
use bscforge_ingest::{extract_upload, Retriever, MAX_K, MIN_K};
use bscforge_nvidia::NvidiaClient;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::runtime::Runtime;

/// State of one interactive session. Nothing here outlives the process.
struct ChatSession {
    history: Vec<ConversationTurn>,
    uploaded: Option<UploadedDraft>,
    show_reasoning: bool,
}

struct UploadedDraft {
    name: String,
    text: String,
}

/// Run the interactive chat.
pub fn run() -> Result<()> {
    let paths = get_paths()?;
    let config = Config::load().context("Failed to load configuration")?;
    let index = get_index()?;

    let client = NvidiaClient::from_config(&config.api).context("Failed to create API client")?;
    let mut retriever = Retriever::new(
        index,
        client.clone(),
        &config.api.embedding_model,
        COLLECTION_NAME,
        config.retrieval.default_k,
    );
    let rt = Runtime::new().context("Failed to create async runtime")?;

    let mut session = ChatSession {
        history: Vec::new(),
        uploaded: None,
        show_reasoning: config.generation.show_reasoning,
    };

    let mut rl = DefaultEditor::new()?;

    // Line-editing history (not the conversation history)
    let history_path = dirs::data_dir()
        .map(|p| p.join("bscforge").join("chat_history"))
        .unwrap_or_default();
    let _ = rl.load_history(&history_path);

    println!("{}", "bscforge - B2Scala Code Generator".cyan().bold());
    println!("{}", "─".repeat(50));
    println!(
        "Type a protocol draft to generate code, {} for commands, {} to quit.",
        "help".cyan(),
        "exit".cyan()
    );
    println!();

    loop {
        let readline = rl.readline(&format!("{} ", "bscforge>".green().bold()));
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Err(e) = handle_input(
                    line,
                    &mut session,
                    &mut retriever,
                    &client,
                    &config,
                    &paths,
                    &rt,
                ) {
                    eprintln!("{} {}", "Error:".red(), e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", "Error:".red(), err);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}

/// Dispatch one line of input: a command, or a draft to generate from.
fn handle_input(
    input: &str,
    session: &mut ChatSession,
    retriever: &mut Retriever,
    client: &NvidiaClient,
    config: &Config,
    paths: &bscforge_config::AppPaths,
    rt: &Runtime,
) -> Result<()> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let cmd = parts.first().copied().unwrap_or("");
    let args = &parts[1..];

    match cmd {
        "help" | "?" => print_help(),
        "exit" | "quit" | "q" => std::process::exit(0),

        "k" => {
            let Some(value) = args.first().and_then(|s| s.parse::<usize>().ok()) else {
                println!("Usage: k <1-10>  (currently {})", retriever.k());
                return Ok(());
            };
            retriever.set_k(value);
            if retriever.k() != value {
                println!(
                    "{} Neighbor count clamped to {} (allowed {}-{})",
                    "Note:".yellow(),
                    retriever.k(),
                    MIN_K,
                    MAX_K
                );
            } else {
                println!("{} Retrieving {} examples per query", "✓".green(), retriever.k());
            }
            Ok(())
        }

        "reasoning" => {
            match args.first().copied() {
                Some("on") => session.show_reasoning = true,
                Some("off") => session.show_reasoning = false,
                _ => {
                    println!("Usage: reasoning on|off");
                    return Ok(());
                }
            }
            println!(
                "{} Reasoning stream {}",
                "✓".green(),
                if session.show_reasoning { "shown" } else { "hidden" }
            );
            Ok(())
        }

        "upload" => {
            if args.is_empty() {
                println!("Usage: upload <path>");
                return Ok(());
            }
            let raw = args.join(" ");
            let path_str = shellexpand::tilde(&raw).into_owned();
            let path = std::path::Path::new(&path_str);

            let text = extract_upload(path, None, config.upload.max_size_bytes())?;

            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();

            println!("{} Processed {}", "✓".green(), name.white());
            print_preview(&text);
            println!(
                "Type additional instructions to combine with it, or {} to generate from it alone.",
                "gen".cyan()
            );

            session.uploaded = Some(UploadedDraft { name, text });
            Ok(())
        }

        "detach" => {
            match session.uploaded.take() {
                Some(upload) => println!("{} Removed {}", "✓".green(), upload.name),
                None => println!("{} No uploaded file.", "Note:".yellow()),
            }
            Ok(())
        }

        "gen" => {
            let Some(upload) = &session.uploaded else {
                println!("{} Upload a file first with {}.", "Note:".yellow(), "upload <path>".cyan());
                return Ok(());
            };
            let draft = upload.text.clone();
            generate(session, retriever, client, config, paths, rt, draft)
        }

        "history" => {
            let full = args.first().copied() == Some("full");
            if session.history.is_empty() {
                println!("{}", "No conversation yet.".dimmed());
                return Ok(());
            }
            for turn in &session.history {
                let shown = if full {
                    turn.content.clone()
                } else {
                    turn.display_content()
                };
                println!("{}: {}", turn.role.to_string().cyan().bold(), shown);
                println!();
            }
            Ok(())
        }

        "clear" | "cls" => {
            print!("\x1B[2J\x1B[1;1H");
            Ok(())
        }

        // Anything else is a draft (or extra instructions for an upload)
        _ => {
            let draft = match &session.uploaded {
                Some(upload) => format!(
                    "Uploaded file content:\n{}\n\nAdditional instructions:\n{}",
                    upload.text, input
                ),
                None => input.to_string(),
            };
            generate(session, retriever, client, config, paths, rt, draft)
        }
    }
}

/// Run one generation and record it in the session history.
fn generate(
    session: &mut ChatSession,
    retriever: &Retriever,
    client: &NvidiaClient,
    config: &Config,
    paths: &bscforge_config::AppPaths,
    rt: &Runtime,
    draft: String,
) -> Result<()> {
    let user_turn = ConversationTurn::user(draft.clone());
    println!("{} {}", "You:".cyan().bold(), user_turn.display_content());
    println!();

    let outcome = generate_streaming(
        rt,
        client,
        retriever,
        &config.generation,
        &config.api.chat_model,
        &draft,
        session.show_reasoning,
    )?;

    // Record turns only after a successful generation
    session.history.push(user_turn);
    session.history.push(ConversationTurn::assistant(outcome.code.clone()));

    let artifact = write_artifact(config, paths, &outcome.code)?;

    println!();
    println!("{} {}", "Saved:".green().bold(), artifact.display());
    println!(
        "{} {} context chunks used",
        "Context:".cyan(),
        outcome.context.len()
    );

    Ok(())
}

/// Show the first part of extracted upload text.
fn print_preview(text: &str) {
    const PREVIEW_CHARS: usize = 500;
    let preview: String = text.chars().take(PREVIEW_CHARS).collect();
    println!("{}", "Preview:".white().bold());
    for line in preview.lines().take(10) {
        println!("  {}", line.dimmed());
    }
    if text.chars().count() > PREVIEW_CHARS {
        println!("  {}", "...".dimmed());
    }
}

fn print_help() -> Result<()> {
    println!("{}", "Commands:".cyan().bold());
    println!();
    println!("  {}       Extract a draft from a file (pdf, image, txt, scala)", "upload <path>".white());
    println!("  {}                 Generate from the uploaded file alone", "gen".white());
    println!("  {}              Remove the uploaded file", "detach".white());
    println!("  {}             Set the number of retrieved examples (1-10)", "k <n>".white());
    println!("  {}    Show or hide the model's reasoning", "reasoning on|off".white());
    println!("  {}      Show the conversation (user turns abbreviated)", "history [full]".white());
    println!("  {}               Clear the screen", "clear".white());
    println!("  {}                Exit the chat", "exit".white());
    println!();
    println!("Any other input is treated as a protocol draft. With a file");
    println!("uploaded, typed input becomes additional instructions combined");
    println!("with the uploaded content.");
    println!();
    Ok(())
}
