//! JSON snapshot of a generated edition.
//!
//! Alongside the HTML page the batch flow can write the parsed payload as
//! `news.json`, so other pages or tools can consume the same cards without
//! scraping markup:
//!
//! ```text
//! json_output_dir/
//! └── news.json   # { "generated": "April 5, 2025", "articles": [...], "debates": [...] }
//! ```

use crate::error::Result;
use crate::models::{Article, Debate, NewsPayload};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    generated: &'a str,
    articles: &'a [Article],
    debates: &'a [Debate],
}

/// Write `payload` to `{json_output_dir}/news.json` and return the path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display()))]
pub async fn write_snapshot(
    payload: &NewsPayload,
    date: &str,
    json_output_dir: &Path,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&Snapshot {
        generated: date,
        articles: &payload.articles,
        debates: &payload.debates,
    })?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = json_output_dir.join("news.json");
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON snapshot");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_round_trips_payload() {
        let dir = tempfile::tempdir().unwrap();
        let payload = NewsPayload {
            articles: vec![Article {
                category: "minors".to_string(),
                headline: "H".to_string(),
                ..Default::default()
            }],
            debates: vec![Debate {
                num: "01".to_string(),
                ..Default::default()
            }],
        };
        let path = write_snapshot(&payload, "April 5, 2025", &dir.path().join("api"))
            .await
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["generated"], "April 5, 2025");
        let back: NewsPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }
}
