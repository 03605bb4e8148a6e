//! The prompt → request → parse sequence shared by both front ends.

use crate::api::TextGenerator;
use crate::error::Result;
use crate::models::{NewsPayload, Variant};
use crate::parse::parse_payload;
use crate::prompt::build_prompt;
use std::time::Instant;
use tracing::{info, instrument};

/// Ask the model for today's news and parse the reply.
///
/// Makes exactly one call on `generator`. Any failure along the way is
/// returned as-is; nothing is partially accepted.
///
/// # Arguments
///
/// * `generator` - The model client to ask
/// * `date` - Human-readable date the prompt is anchored to, e.g. `"April 5, 2025"`
/// * `variant` - Which front end the prompt is shaped for
///
/// # Returns
///
/// The parsed articles and debates, or the first transport, API or parse error.
///
/// # Examples
///
/// ```ignore
/// let generator = build_generator(&config)?;
/// let payload = fetch_news(generator.as_ref(), &today_long(), Variant::Static).await?;
/// println!("{} articles", payload.articles.len());
/// ```
#[instrument(level = "info", skip_all, fields(%date, ?variant))]
pub async fn fetch_news(
    generator: &dyn TextGenerator,
    date: &str,
    variant: Variant,
) -> Result<NewsPayload> {
    let t0 = Instant::now();
    let prompt = build_prompt(date, variant);
    let raw = generator.generate(&prompt).await?;
    let payload = parse_payload(&raw)?;
    info!(
        articles = payload.articles.len(),
        debates = payload.debates.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched news"
    );
    Ok(payload)
}

#[cfg(test)]
pub mod testing {
    //! In-process stand-ins for the generation API.

    use crate::api::TextGenerator;
    use crate::error::{NewsError, Result};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replies with queued responses in order and records every prompt.
    /// An exhausted queue answers with a 500.
    #[derive(Debug, Default)]
    pub struct ScriptedGenerator {
        replies: Mutex<VecDeque<Result<String>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(NewsError::Status {
                        status: 500,
                        body: "no scripted reply".to_string(),
                    })
                })
        }
    }

    /// A well-formed reply: six articles and four debates, fenced like a chat model would.
    pub fn sample_reply() -> String {
        let articles = [
            ("california", "California Laws", "purple"),
            ("minors", "Teen & Minors", "green"),
            ("breaches", "Data Breaches", "navy"),
            ("bigtech", "Big Tech", "red"),
            ("california", "California Laws", "purple"),
            ("minors", "Teen & Minors", "green"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (cat, tag, color))| {
            serde_json::json!({
                "id": i + 1,
                "category": cat,
                "tag": tag,
                "tagColor": color,
                "headline": format!("Headline {}", i + 1),
                "summary": "Regulators did a thing. It matters to teens.",
                "date": "This month",
                "sourceLabel": "CPPA",
                "sourceUrl": format!("https://example.org/story/{}", i + 1),
            })
        })
        .collect::<Vec<_>>();
        let debates = (1..=4)
            .map(|n| {
                serde_json::json!({
                    "num": format!("0{n}"),
                    "title": format!("Debate {n}"),
                    "summary": "People disagree. Lawmakers are watching.",
                })
            })
            .collect::<Vec<_>>();
        format!(
            "```json\n{}\n```",
            serde_json::json!({ "articles": articles, "debates": debates })
        )
    }
}
