//! View state of the interactive news page.
//!
//! A [`NewsSession`] owns everything the live news view shows: the last
//! loaded articles and debates, the active [`Filter`], whether anything has
//! loaded yet, and the rendered regions of the page (card grid, loading and
//! error indicators, refresh control, "last updated" line, debate list).
//!
//! The session is replaced wholesale on each successful refresh and is
//! otherwise only touched by [`NewsSession::set_filter`]. A failed fetch
//! shows the error banner and keeps the previous data, so choosing a filter
//! afterwards still shows the last good articles.
//!
//! [`load`] drives one fetch against a shared session without holding the
//! lock across the network call. Two overlapping fetches are not
//! coordinated; whichever finishes last wins.

use crate::api::TextGenerator;
use crate::error::Result;
use crate::models::{Article, Debate, Filter, NewsPayload, Variant};
use crate::pipeline::fetch_news;
use crate::render::{articles_grid, debates_list, updated_badge};
use crate::utils::{clock_label, today_long};
use chrono::{DateTime, Local};
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

pub const REFRESH_LABEL: &str = "↻ Refresh";
pub const LOADING_LABEL: &str = "↻ Loading…";

/// Rendered regions of the host page.
#[derive(Debug, Clone, PartialEq)]
pub struct Regions {
    /// Inner HTML of the article grid.
    pub grid: String,
    pub loading_visible: bool,
    pub error_visible: bool,
    pub refresh_disabled: bool,
    pub refresh_label: &'static str,
    /// Inner HTML of the "last updated" line; empty until the first success.
    pub last_updated: String,
    /// Inner HTML of the debate container; untouched when a load has no debates.
    pub debates: String,
}

impl Default for Regions {
    fn default() -> Self {
        Self {
            grid: String::new(),
            loading_visible: false,
            error_visible: false,
            refresh_disabled: false,
            refresh_label: REFRESH_LABEL,
            last_updated: String::new(),
            debates: String::new(),
        }
    }
}

/// Single-owner state of the live news view.
#[derive(Debug, Default)]
pub struct NewsSession {
    articles: Vec<Article>,
    debates: Vec<Debate>,
    filter: Filter,
    loaded: bool,
    updated_at: Option<DateTime<Local>>,
    regions: Regions,
}

impl NewsSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn debates(&self) -> &[Debate] {
        &self.debates
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    pub fn regions(&self) -> &Regions {
        &self.regions
    }

    /// True until the first successful load; navigation uses it to decide
    /// whether to fetch.
    pub fn needs_initial_load(&self) -> bool {
        !self.loaded
    }

    /// Clear the grid, hide the error, show loading and lock the refresh control.
    pub fn begin_fetch(&mut self) {
        self.regions.grid.clear();
        self.regions.error_visible = false;
        self.regions.loading_visible = true;
        self.regions.refresh_disabled = true;
        self.regions.refresh_label = LOADING_LABEL;
    }

    /// Apply the outcome of a fetch started with [`begin_fetch`](Self::begin_fetch).
    ///
    /// On success the data is replaced, both lists are re-rendered and the
    /// update time is stamped with `now`. On failure the error banner is
    /// shown and the grid stays empty. The refresh control is restored
    /// either way.
    pub fn complete_fetch(&mut self, outcome: Result<NewsPayload>, now: DateTime<Local>) {
        self.regions.loading_visible = false;
        match outcome {
            Ok(payload) => {
                self.articles = payload.articles;
                self.debates = payload.debates;
                self.loaded = true;
                self.render_articles();
                self.render_debates();
                self.updated_at = Some(now);
                self.regions.last_updated = updated_badge(&clock_label(&now));
            }
            Err(e) => {
                self.regions.error_visible = true;
                error!(error = %e, "News fetch error");
            }
        }
        self.regions.refresh_disabled = false;
        self.regions.refresh_label = REFRESH_LABEL;
    }

    /// Select a filter and re-render the grid. Reselecting is a no-op in effect.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.render_articles();
    }

    fn render_articles(&mut self) {
        self.regions.grid = articles_grid(&self.articles, self.filter);
    }

    fn render_debates(&mut self) {
        if let Some(html) = debates_list(&self.debates) {
            self.regions.debates = format!(r#"<div class="hot-topics">{html}</div>"#);
        }
    }
}

/// Run one fetch against a shared session.
///
/// The lock is released while the model is working so the page can still be
/// rendered (showing the loading state) in the meantime.
#[instrument(level = "info", skip_all)]
pub async fn load(session: &Mutex<NewsSession>, generator: &dyn TextGenerator) {
    session.lock().await.begin_fetch();
    let date = today_long();
    let outcome = fetch_news(generator, &date, Variant::Interactive).await;
    let ok = outcome.is_ok();
    session.lock().await.complete_fetch(outcome, Local::now());
    info!(success = ok, "News view updated");
}

/// Fetch only if nothing has loaded yet. Called on each visit to the news view.
pub async fn ensure_loaded(session: &Mutex<NewsSession>, generator: &dyn TextGenerator) {
    let needed = session.lock().await.needs_initial_load();
    if needed {
        load(session, generator).await;
    }
}
