use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::config::Mode;
use crate::gateway::NewsEndpoint;
use crate::global::Global;

pub mod news;

pub fn routes(global: &Arc<Global>) -> Router<Arc<Global>> {
    Router::new()
        .route("/", get(root))
        .nest("/api", news::routes(global))
}

#[derive(serde::Serialize)]
struct RootResponse {
    message: &'static str,
    version: &'static str,
    uptime: u64,
    endpoints: Vec<String>,
}

#[tracing::instrument(skip(global))]
async fn root(State(global): State<Arc<Global>>) -> Json<RootResponse> {
    let upstream = [NewsEndpoint::TopHeadlines, NewsEndpoint::Everything];

    let mut endpoints: Vec<String> = upstream
        .iter()
        .map(|e| format!("/api/news?endpoint={}", e.as_str()))
        .collect();

    if global.config.mode == Mode::Development {
        endpoints.extend(upstream.iter().map(|e| format!("/api/news/{}", e.as_str())));
    }

    Json(RootResponse {
        message: "NewsFlow relay",
        version: env!("CARGO_PKG_VERSION"),
        uptime: global.started_at.elapsed().as_secs(),
        endpoints,
    })
}
