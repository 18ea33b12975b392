use std::sync::Arc;

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{header, Method, Response};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::{body::Body, Json, Router};
use hyper::StatusCode;
use reqwest::Url;

use crate::config::Mode;
use crate::gateway::NewsEndpoint;
use crate::global::Global;
use crate::http::error::{ApiError, ApiErrorCode};

const CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate=60";
const CREDENTIAL_PARAM: &str = "apiKey";
const ENDPOINT_PARAM: &str = "endpoint";

const METHOD_NOT_ALLOWED: &str = "Method not allowed";
const API_KEY_NOT_CONFIGURED: &str = "API key not configured";
const MISSING_ENDPOINT: &str = "Missing endpoint parameter (top-headlines or everything)";
const UPSTREAM_FAILED: &str = "Failed to fetch from NewsAPI";

pub fn routes(global: &Arc<Global>) -> Router<Arc<Global>> {
    let router = Router::new().route("/news", any(relay));

    match global.config.mode {
        Mode::Development => router.route("/news/:endpoint", get(dev_proxy)),
        Mode::Production => router,
    }
}

/// A validated relay request: the upstream path plus the parameters to pass
/// through, in arrival order.
#[derive(Debug, PartialEq, Eq)]
struct RelayRequest {
    endpoint: NewsEndpoint,
    params: Vec<(String, String)>,
}

impl RelayRequest {
    /// Parameters given more than once are dropped, and an `endpoint` given
    /// more than once is treated as missing. A client supplied credential is
    /// never forwarded.
    fn parse(pairs: Vec<(String, String)>) -> Result<Self, ApiError> {
        let count = |key: &str| pairs.iter().filter(|(k, _)| k == key).count();

        let endpoint = match pairs.iter().find(|(k, _)| k == ENDPOINT_PARAM) {
            Some((_, v)) if count(ENDPOINT_PARAM) == 1 => NewsEndpoint::from_slug(v),
            _ => None,
        }
        .ok_or_else(|| ApiError::bad_request(ApiErrorCode::MISSING_ENDPOINT, MISSING_ENDPOINT))?;

        let params = pairs
            .iter()
            .filter(|(k, _)| k != ENDPOINT_PARAM && k != CREDENTIAL_PARAM)
            .filter(|(k, _)| count(k) == 1)
            .cloned()
            .collect();

        Ok(Self { endpoint, params })
    }
}

fn upstream_url(base: &str, endpoint: &str) -> Result<Url, ApiError> {
    Url::parse(&format!("{}/{}", base.trim_end_matches('/'), endpoint)).map_err(|e| {
        tracing::error!(error = %e, base, "invalid upstream base url");
        ApiError::internal_server_error(ApiErrorCode::UPSTREAM_ERROR, UPSTREAM_FAILED)
    })
}

/// GETs `url` and hands back the upstream status and JSON body untouched.
async fn forward(client: &reqwest::Client, url: Url) -> Result<(StatusCode, serde_json::Value), ApiError> {
    let resp = client.get(url).send().await.map_err(|e| {
        tracing::error!(error = %e, "failed to reach upstream");
        ApiError::internal_server_error(ApiErrorCode::UPSTREAM_ERROR, UPSTREAM_FAILED)
    })?;

    let status = resp.status();

    let body = resp.json::<serde_json::Value>().await.map_err(|e| {
        tracing::error!(error = %e, %status, "upstream body is not json");
        ApiError::internal_server_error(ApiErrorCode::UPSTREAM_ERROR, UPSTREAM_FAILED)
    })?;

    Ok((status, body))
}

/// /api/news?endpoint=top-headlines|everything&...
///
/// Attaches the server credential and forwards the rest of the query string
/// to the upstream API.
#[tracing::instrument(skip(global, pairs))]
async fn relay(
    State(global): State<Arc<Global>>,
    method: Method,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response<Body>, ApiError> {
    if method != Method::GET {
        tracing::debug!(code = ?ApiErrorCode::METHOD_NOT_ALLOWED, "rejecting non-GET relay request");
        return Err(ApiError::method_not_allowed(ApiErrorCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED));
    }

    let Some(api_key) = global.config.relay.api_key.as_deref().filter(|k| !k.is_empty()) else {
        tracing::error!(code = ?ApiErrorCode::API_KEY_NOT_CONFIGURED, "relay api key missing");
        return Err(ApiError::internal_server_error(
            ApiErrorCode::API_KEY_NOT_CONFIGURED,
            API_KEY_NOT_CONFIGURED,
        ));
    };

    let request = RelayRequest::parse(pairs)?;

    let mut url = upstream_url(&global.config.upstream.base_url, request.endpoint.as_str())?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair(CREDENTIAL_PARAM, api_key);
        for (k, v) in &request.params {
            query.append_pair(k, v);
        }
    }

    let (status, body) = forward(&global.http_client, url).await?;
    tracing::info!(endpoint = request.endpoint.as_str(), %status, "relayed upstream response");

    Ok((
        status,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        Json(body),
    )
        .into_response())
}

/// /api/news/:endpoint
///
/// Development only. Passes the query string, credential included, straight
/// through to the upstream API.
#[tracing::instrument(skip(global, query))]
async fn dev_proxy(
    State(global): State<Arc<Global>>,
    Path(endpoint): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response<Body>, ApiError> {
    let mut url = upstream_url(&global.config.upstream.base_url, &endpoint)?;
    url.set_query(query.as_deref());

    let (status, body) = forward(&global.http_client, url).await?;

    Ok((status, Json(body)).into_response())
}
