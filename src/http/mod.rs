use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use axum::extract::Request;
use axum::response::Response;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::global::Global;

pub mod error;
pub mod routes;


pub fn app(global: Arc<Global>) -> Router {
    Router::new()
        .merge(routes::routes(&global))
        .with_state(global)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(CompressionLayer::new())
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|req: &Request| {
                            tracing::info_span!(
                                "request",
                                method = %req.method(),
                                path = %req.uri().path(),
                                status = tracing::field::Empty,
                            )
                        })
                        .on_request(|req: &Request, _span: &Span| {
                            tracing::info!(method = %req.method(), path = %req.uri().path(), "incoming request");
                        })
                        .on_response(|res: &Response, latency: Duration, span: &Span| {
                            span.record("status", res.status().as_u16());
                            tracing::info!(status = res.status().as_u16(), latency = ?latency, "response");
                        })
                        .on_failure(()),
                ),
        )
}

#[tracing::instrument]
async fn not_found() -> error::ApiError {
    error::ApiError::not_found(error::ApiErrorCode::ROUTE_NOT_FOUND, "route not found")
}

#[tracing::instrument(name = "HTTP", skip_all)]
pub async fn run(global: Arc<Global>) -> anyhow::Result<()> {
    let bind = global.config.bind_addr();

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .context("failed to bind HTTP server")?;

    tracing::info!(%bind, mode = ?global.config.mode, "relay listening");

    axum::serve(
        listener,
        app(global).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("http server error")?;

    Ok(())
}
