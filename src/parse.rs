//! Turning the model's raw text into a [`NewsPayload`].
//!
//! Models often wrap JSON in markdown fences even when told not to. Every
//! triple-backtick marker (with or without a `json` tag) is removed, the
//! remainder is trimmed and parsed. There is no partial recovery: either the
//! whole object parses or the reply is rejected.

use crate::error::{NewsError, Result};
use crate::models::NewsPayload;
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new("```json|```").expect("static regex"));

/// Remove code-fence markers and surrounding whitespace.
pub fn strip_fences(raw: &str) -> String {
    FENCE.replace_all(raw, "").trim().to_string()
}

/// Parse a model reply into articles and debates.
///
/// Fences are stripped first (see [`strip_fences`]). Individual card fields
/// are read leniently, so a `null` or numeric value where text was asked for
/// does not lose the rest of the reply.
///
/// # Arguments
///
/// * `raw` - The model's text output, fenced or bare
///
/// # Returns
///
/// The decoded [`NewsPayload`]. Missing `articles`/`debates` keys yield empty
/// lists.
///
/// # Errors
///
/// Returns [`NewsError::Parse`] when the stripped text is not JSON, when its
/// top level is not an object, or when `articles`/`debates` are not lists of
/// objects.
///
/// # Examples
///
/// ```ignore
/// let payload = parse_payload(r#"{"articles": [], "debates": []}"#)?;
/// assert!(payload.articles.is_empty());
/// ```
pub fn parse_payload(raw: &str) -> Result<NewsPayload> {
    let clean = strip_fences(raw);

    let value: serde_json::Value = serde_json::from_str(&clean).map_err(|e| {
        warn!(
            error = %e,
            reply_preview = %truncate_for_log(&clean, 300),
            "Model reply is not valid JSON"
        );
        NewsError::Parse(e.to_string())
    })?;

    if !value.is_object() {
        warn!(reply_preview = %truncate_for_log(&clean, 300), "Model reply is not a JSON object");
        return Err(NewsError::Parse("top-level value is not an object".to_string()));
    }

    let payload: NewsPayload =
        serde_json::from_value(value).map_err(|e| NewsError::Parse(e.to_string()))?;
    debug!(
        articles = payload.articles.len(),
        debates = payload.debates.len(),
        "Parsed model reply"
    );
    Ok(payload)
}
