//! # Privacy News
//!
//! AI-written data-privacy news for a youth privacy education site. A
//! generative-text model is asked for six short articles and four policy
//! debates as JSON; the reply is parsed and rendered into HTML cards.
//!
//! ## Usage
//!
//! ```sh
//! # Pre-render the static page (e.g. from a scheduled job)
//! privacy_news generate -o pages/news.html
//!
//! # Serve the live news view
//! privacy_news serve --listen 127.0.0.1:8080
//! ```
//!
//! ## Architecture
//!
//! Both subcommands share one pipeline:
//! 1. **Prompt**: build the instruction for today's date ([`prompt`])
//! 2. **Generate**: one call to the configured model API ([`api`])
//! 3. **Parse**: strip code fences and decode the JSON ([`parse`])
//! 4. **Render**: escape and template the cards ([`render`])
//!
//! `generate` then writes a complete page and exits; any failure aborts
//! the run with a non-zero status and leaves the previous page in place.
//! `serve` keeps the result in a [`session::NewsSession`] and re-renders it
//! for filters and refreshes.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod generate;
mod models;
mod outputs;
mod parse;
mod pipeline;
mod prompt;
mod render;
mod server;
mod session;
mod utils;

use cli::{Cli, Command};
use config::{DEFAULT_LISTEN, DEFAULT_OUTPUT_PATH, FileConfig, GenerationConfig, Provider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(config = ?args.config, "Parsed CLI arguments");

    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => FileConfig::default(),
    };
    let env = |name: &str| std::env::var(name).ok();

    match args.command {
        Command::Generate(gen_args) => {
            let backend =
                GenerationConfig::resolve(&file_config, &gen_args.backend, Provider::Gemini, env)?;
            let generator = api::build_generator(&backend)?;

            let date = gen_args.date.unwrap_or_else(utils::today_long);
            let output = gen_args
                .output
                .or(file_config.output_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));
            let json_dir = gen_args.json_output_dir.or(file_config.json_output_dir);

            if let Err(e) =
                generate::run(generator.as_ref(), &date, &output, json_dir.as_deref()).await
            {
                error!(error = %e, "Generation failed; page left unchanged");
                return Err(e.into());
            }
        }
        Command::Serve(serve_args) => {
            let backend = GenerationConfig::resolve(
                &file_config,
                &serve_args.backend,
                Provider::Anthropic,
                env,
            )?;
            let generator = api::build_generator(&backend)?;

            let listen = serve_args
                .listen
                .or(file_config.listen)
                .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
            let state = Arc::new(server::AppState::new(generator));
            server::serve(&listen, state).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
