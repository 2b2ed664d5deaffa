//! bscforge CLI - Protocol drafts in, B2Scala models out.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// bscforge - RAG-powered B2Scala code generation from protocol drafts
#[derive(Parser)]
#[command(name = "bscforge")]
#[command(version)]
#[command(about = "Formalize protocol drafts into B2Scala models", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize bscforge (create config and knowledge base)
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Build the knowledge base from the docs directory
    Train,

    /// Start the interactive code-generation chat
    Chat,

    /// Run one generation from a structured draft file
    Pipeline {
        /// Draft file (default: structured_draft.txt in the data directory)
        draft: Option<String>,
    },

    /// Run a smoke test against the knowledge base and API
    Test,

    /// Build the knowledge base, then run the smoke test
    All,

    /// Show knowledge-base statistics
    Status,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open config file in editor
    Edit,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., api.chat_model)
        key: String,

        /// Value to set
        value: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bscforge=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bscforge=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(),
            ConfigCommands::Edit => commands::config::edit(),
            ConfigCommands::Set { key, value } => commands::config::set(&key, &value),
        },
        Commands::Train => commands::train::run(),
        Commands::Chat => commands::chat::run(),
        Commands::Pipeline { draft } => commands::pipeline::run(draft),
        Commands::Test => commands::test::run(),
        Commands::All => commands::train::run().and_then(|_| commands::test::run()),
        Commands::Status => commands::status::run(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
