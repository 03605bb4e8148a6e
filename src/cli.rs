//! Command-line interface definitions.
//!
//! Two subcommands share one set of backend flags:
//! - `generate` calls the model once and writes a static news page
//! - `serve` runs the interactive news view over HTTP
//!
//! Any flag left unset falls back to the YAML config file, then to defaults.

use crate::config::Provider;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Pre-render pages/news.html with Gemini
/// GEMINI_API_KEY=... privacy_news generate -o pages/news.html
///
/// # Serve the live news view with Anthropic
/// ANTHROPIC_API_KEY=... privacy_news serve --listen 0.0.0.0:8080
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the static news page once and exit
    Generate(GenerateArgs),
    /// Serve the interactive news view
    Serve(ServeArgs),
}

/// Flags selecting and tuning the generation API.
#[derive(Args, Debug, Default, Clone)]
pub struct BackendArgs {
    /// Generation API to call
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum output tokens requested from the model
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Base URL of the API (for proxies and local testing)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API key; defaults to ANTHROPIC_API_KEY or GEMINI_API_KEY
    #[arg(long)]
    pub api_key: Option<String>,

    /// Retry failed generation calls this many times (default: no retry)
    #[arg(long)]
    pub retries: Option<usize>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Path of the HTML page to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write a news.json snapshot into this directory
    #[arg(short, long)]
    pub json_output_dir: Option<PathBuf>,

    /// Date text to generate for, e.g. "April 5, 2025" (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Address to listen on
    #[arg(short, long)]
    pub listen: Option<String>,
}
