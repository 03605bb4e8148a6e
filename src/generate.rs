//! One-shot page generation.
//!
//! Fetch, parse, render and write, strictly in that order. Any failure ends
//! the run before the page is touched, so a bad model reply never replaces a
//! good page.

use crate::api::TextGenerator;
use crate::error::Result;
use crate::models::Variant;
use crate::outputs::{json, page};
use crate::pipeline::fetch_news;
use std::path::Path;
use tracing::{info, instrument};

/// Generate the page for `date` and write it to `output_path`.
///
/// When `json_output_dir` is given a `news.json` snapshot is written after
/// the page.
#[instrument(level = "info", skip_all, fields(%date, output = %output_path.display()))]
pub async fn run(
    generator: &dyn TextGenerator,
    date: &str,
    output_path: &Path,
    json_output_dir: Option<&Path>,
) -> Result<()> {
    info!("Fetching news for {date}");
    let payload = fetch_news(generator, date, Variant::Static).await?;
    info!(
        articles = payload.articles.len(),
        debates = payload.debates.len(),
        "Got news"
    );

    let html = page::render_document(&payload, date);
    page::write_page(output_path, &html).await?;

    if let Some(dir) = json_output_dir {
        json::write_snapshot(&payload, date, dir).await?;
    }

    info!(path = %output_path.display(), "Page generated");
    Ok(())
}
