//! HTTP front end for the interactive news view.
//!
//! The first visit to `/news` triggers the pipeline once; later visits reuse
//! the loaded session. `POST /news/refresh` refetches unconditionally, and
//! `?filter=<token>` re-renders the grid for one category.

use crate::api::TextGenerator;
use crate::models::Filter;
use crate::render::Escaped;
use crate::session::{NewsSession, ensure_loaded, load};
use axum::{
    Json, Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub struct AppState {
    pub session: Mutex<NewsSession>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            session: Mutex::new(NewsSession::new()),
            generator,
        }
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/news") }))
        .route("/news", get(news_page))
        .route("/news/refresh", post(refresh))
        .route("/news/status", get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `listen` and serve until the process is stopped.
pub async fn serve(listen: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(listen).await?;
    info!(addr = %listener.local_addr()?, "Serving news view");
    axum::serve(listener, create_app(state)).await
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub filter: Option<String>,
}

async fn news_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> impl IntoResponse {
    ensure_loaded(&state.session, state.generator.as_ref()).await;

    let mut session = state.session.lock().await;
    if let Some(token) = query.filter.as_deref() {
        let filter = token.parse::<Filter>().unwrap_or_else(|e| {
            warn!(error = %e, "Unknown filter; showing all topics");
            Filter::All
        });
        session.set_filter(filter);
    }
    Html(render_host_page(&session))
}

async fn refresh(State(state): State<Arc<AppState>>) -> Redirect {
    load(&state.session, state.generator.as_ref()).await;
    Redirect::to("/news")
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub loaded: bool,
    pub filter: &'static str,
    pub articles: usize,
    pub debates: usize,
    pub updated_at: Option<String>,
    pub loading: bool,
    pub error: bool,
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusView> {
    let s = state.session.lock().await;
    Json(StatusView {
        loaded: s.is_loaded(),
        filter: s.filter().token(),
        articles: s.articles().len(),
        debates: s.debates().len(),
        updated_at: s.updated_at().map(|t| t.to_rfc3339()),
        loading: s.regions().loading_visible,
        error: s.regions().error_visible,
    })
}

fn display(visible: bool) -> &'static str {
    if visible { "block" } else { "none" }
}

/// The host document: filter controls, refresh form and the session's regions.
pub fn render_host_page(session: &NewsSession) -> String {
    let r = session.regions();
    let filters = Filter::choices()
        .map(|f| {
            let active = if f == session.filter() { " active" } else { "" };
            format!(
                r#"<a class="topic-filter{active}" href="/news?filter={}">{}</a>"#,
                f.token(),
                Escaped(f.label())
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");
    let disabled = if r.refresh_disabled { " disabled" } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>News — CalInformed</title>
  <link rel="stylesheet" href="/styles.css" />
</head>
<body>
  <div class="section" id="page-news">
    <div class="inner">
      <div class="filter-bar">
        {filters}
      </div>
      <div class="news-toolbar">
        <div id="last-updated">{last_updated}</div>
        <form method="post" action="/news/refresh">
          <button id="refresh-btn" type="submit"{disabled}>{label}</button>
        </form>
      </div>
      <div id="news-loading" style="display:{loading}">Loading the latest privacy news…</div>
      <div id="news-error" style="display:{error}">Couldn't load news right now. Try refreshing.</div>
      <div id="news-grid-live" class="news-grid">{grid}</div>
      <div id="hot-topics-live">{debates}</div>
    </div>
  </div>
</body>
</html>"#,
        last_updated = r.last_updated,
        label = r.refresh_label,
        loading = display(r.loading_visible),
        error = display(r.error_visible),
        grid = r.grid,
        debates = r.debates,
    )
}
