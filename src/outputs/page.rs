//! Static news page for the batch flow.
//!
//! The generated document is self-contained apart from the site stylesheet:
//! navigation, hero, filter bar, every article card, the debate list, the
//! footer and a few lines of script that filter cards by toggling their
//! visibility via `data-category`.
//!
//! The page is written next to its final location and renamed into place,
//! so readers only ever see the previous page or the complete new one.

use crate::error::Result;
use crate::models::{Filter, NewsPayload};
use crate::render::{Escaped, article_card, debates_list};
use crate::utils::ensure_writable_dir;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

fn filter_buttons() -> String {
    Filter::choices()
        .map(|f| {
            let active = if f == Filter::All { " active" } else { "" };
            format!(
                r#"        <button class="topic-filter{active}" onclick="filterNews(this,'{}')">{}</button>"#,
                f.token(),
                Escaped(f.label())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the complete document for `payload`, stamped with `date`.
pub fn render_document(payload: &NewsPayload, date: &str) -> String {
    let articles_html = payload
        .articles
        .iter()
        .map(article_card)
        .collect::<Vec<_>>()
        .join("\n");
    let debates_html = debates_list(&payload.debates).unwrap_or_default();
    let date = Escaped(date);
    let filters = filter_buttons();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>News — CalInformed</title>
  <link href="https://fonts.googleapis.com/css2?family=Poppins:wght@400;600;700;900&display=swap" rel="stylesheet" />
  <link rel="stylesheet" href="../styles.css" />
</head>
<body>

  <nav class="site-nav">
    <div class="nav-logo" onclick="location.href='../index.html'">Cal<span>Informed</span></div>
    <div class="nav-links">
      <a href="what-is-data-privacy.html" class="nav-btn">What is Data Privacy?</a>
      <a href="california-privacy-laws.html" class="nav-btn">California Privacy Laws</a>
      <a href="protect-yourself.html" class="nav-btn">Protect Yourself</a>
      <a href="news.html" class="nav-btn active">News</a>
      <a href="resources.html" class="nav-btn">Resources</a>
    </div>
  </nav>

  <header class="page-hero">
    <p class="hero-eyebrow">&#x2022; News &amp; Updates &#x2022;</p>
    <h1>What's Happening in <em>Data Privacy</em> Right Now</h1>
    <p>Updated daily by AI — stories across California privacy law, teen safety, data breaches, and Big Tech.</p>
  </header>

  <div class="section">
    <div class="inner">

      <div style="display:flex; gap:10px; flex-wrap:wrap; margin-bottom:36px; align-items:center;">
        <span style="font-family:'Poppins',sans-serif; font-size:0.78rem; font-weight:700; text-transform:uppercase; letter-spacing:2px; color:#999;">Filter:</span>
{filters}
      </div>

      <div style="display:flex; justify-content:space-between; align-items:center; margin-bottom:28px; flex-wrap:wrap; gap:12px;">
        <div>
          <p class="section-label" style="margin-bottom:4px;">Auto-Updated Feed</p>
          <h2 class="section-title" style="margin-bottom:0;">Latest Privacy News</h2>
        </div>
        <div style="font-family:'Poppins',sans-serif; font-size:0.78rem; color:#999;">
          <span class="live-badge"><span class="live-dot"></span>Last updated: {date}</span>
        </div>
      </div>

      <div id="news-grid" class="news-grid">
{articles_html}
      </div>

    </div>
  </div>

  <div class="section gray">
    <div class="inner">
      <p class="section-label">Ongoing Debates</p>
      <h2 class="section-title">The Biggest Privacy Questions Right Now</h2>
      <p class="section-subtitle">These debates shape the laws of tomorrow — and they affect you directly.</p>
      <div class="hot-topics">
{debates_html}
      </div>
      <div class="callout" style="margin-top:32px;">
        <strong>Stay Informed</strong>
        For the most current developments, follow the California Privacy Protection Agency at cppa.ca.gov,
        the Electronic Frontier Foundation at eff.org, and the California AG's privacy page at oag.ca.gov/privacy.
      </div>
    </div>
  </div>

  <footer class="site-footer">
    <div class="footer-logo" onclick="location.href='../index.html'">Cal<span>Informed</span></div>
    <div class="footer-links"><a href="#">Instagram</a><a href="#">GitHub</a><a href="#">Twitter</a></div>
    <div class="footer-copy">© 2025 CalInformed. Informational purposes only. Not legal advice.</div>
  </footer>

  <script>
    function filterNews(btn, category) {{
      document.querySelectorAll('.topic-filter').forEach(b => b.classList.remove('active'));
      btn.classList.add('active');
      document.querySelectorAll('#news-grid .news-card').forEach(card => {{
        card.style.display = (category === 'all' || card.dataset.category === category) ? '' : 'none';
      }});
    }}
  </script>

</body>
</html>
"##
    )
}

/// Write `html` to `path`, replacing any previous page in one step.
///
/// The content goes to a hidden `.{name}.tmp` sibling first and is then
/// renamed over `path`. The parent directory is created if needed.
///
/// # Arguments
///
/// * `path` - Final location of the page
/// * `html` - Complete document, usually from [`render_document`]
///
/// # Errors
///
/// Returns [`crate::error::NewsError::Io`] if the directory is not writable or
/// the write or rename fails. On a failed rename the temporary file is removed
/// and the previous page is left untouched.
///
/// # Examples
///
/// ```ignore
/// let html = render_document(&payload, "April 5, 2025");
/// write_page(Path::new("pages/news.html"), &html).await?;
/// ```
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_page(path: &Path, html: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    ensure_writable_dir(&dir).await?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "news.html".to_string());
    let tmp = dir.join(format!(".{file_name}.tmp"));

    fs::write(&tmp, html).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        error!(error = %e, "Failed to move page into place");
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    info!(bytes = html.len(), "Wrote news page");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, Debate};

    fn payload() -> NewsPayload {
        crate::parse::parse_payload(&crate::pipeline::testing::sample_reply()).unwrap()
    }

    #[test]
    fn test_document_has_all_sections() {
        let html = render_document(&payload(), "April 5, 2025");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<nav class="site-nav">"#));
        assert!(html.contains(r#"<header class="page-hero">"#));
        assert!(html.contains(r#"<footer class="site-footer">"#));
        assert!(html.contains("function filterNews(btn, category) {"));
        assert!(html.contains("Last updated: April 5, 2025"));
        assert_eq!(html.matches(r#"class="news-card""#).count(), 6);
        assert_eq!(html.matches(r#"class="hot-topic""#).count(), 4);
    }

    #[test]
    fn test_filter_bar_lists_all_tokens() {
        let html = render_document(&NewsPayload::default(), "May 1, 2025");
        assert!(html.contains(r#"<button class="topic-filter active" onclick="filterNews(this,'all')">All Topics</button>"#));
        for token in ["california", "minors", "breaches", "bigtech"] {
            assert!(html.contains(&format!("filterNews(this,'{token}')")));
        }
        assert!(html.contains("Teen &amp; Minors"));
    }

    #[test]
    fn test_cards_carry_category_for_script_filter() {
        let html = render_document(&payload(), "May 1, 2025");
        assert_eq!(html.matches(r#"data-category="california""#).count(), 2);
        assert_eq!(html.matches(r#"data-category="bigtech""#).count(), 1);
    }

    #[test]
    fn test_model_text_cannot_break_out() {
        let p = NewsPayload {
            articles: vec![Article {
                category: r#"x" onmouseover="alert(1)"#.to_string(),
                headline: "</div><script>steal()</script>".to_string(),
                ..Default::default()
            }],
            debates: vec![Debate {
                summary: "<iframe>".to_string(),
                ..Default::default()
            }],
        };
        let html = render_document(&p, "<b>today</b>");
        assert!(!html.contains("<script>steal()"));
        assert!(!html.contains(r#"" onmouseover="#));
        assert!(!html.contains("<iframe>"));
        assert!(html.contains("&lt;b&gt;today&lt;/b&gt;"));
    }

    #[tokio::test]
    async fn test_write_page_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages").join("news.html");
        write_page(&path, "old").await.unwrap();
        write_page(&path, "new").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("pages").join(".news.html.tmp").exists());
    }
}
