//! litreview CLI: terminal interface for automated literature reviews.
//!
//! Runs single-question reviews (with an optional follow-up chat), weekly
//! digests over a topic list, and the classification and source-selection
//! stages on their own.

mod commands;
mod repl;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// litreview: LLM-assisted literature reviews over arXiv, PubMed and Semantic Scholar
#[derive(Parser, Debug)]
#[command(name = "litreview", version, about, long_about = None)]
struct Cli {
    /// LLM model to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Workspace directory (artifacts and `.litreview/config.toml` live here)
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Configuration file path (replaces the layered lookup)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Review the literature on a research question
    Review {
        /// The research question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Search the question as written instead of refining it first
        #[arg(long)]
        no_refine: bool,

        /// Ask follow-up questions about the review afterwards
        #[arg(short, long)]
        follow_up: bool,
    },
    /// Run the weekly digest over the configured topics
    Digest {
        /// Topic to include (repeatable); replaces the configured list
        #[arg(short, long = "topic")]
        topics: Vec<String>,
    },
    /// Classify a query into a scientific category and show its sources
    Classify {
        /// The query to classify
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show the sources searched for a category
    Sources {
        /// Category label (e.g. "computer science"); omit to list all
        category: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create default configuration file
    Init,
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)));

    let log_dir = directories::ProjectDirs::from("dev", "litreview", "litreview")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "litreview.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let options = commands::GlobalOptions {
        workspace,
        config_path: cli.config,
        model: cli.model,
        quiet: cli.quiet,
    };
    commands::handle_command(cli.command, &options).await
}
