//! In-process stand-in for the upstream news API (or the relay, from the
//! gateway's point of view). Records every request and answers with a canned
//! response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
}

impl CapturedRequest {
    /// Decoded query pairs, in order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let Some(query) = &self.query else {
            return Vec::new();
        };
        reqwest::Url::parse(&format!("http://localhost/?{query}"))
            .map(|u| u.query_pairs().into_owned().collect())
            .unwrap_or_default()
    }

    pub fn param(&self, key: &str) -> Option<String> {
        self.pairs().into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    status: StatusCode,
    content_type: &'static str,
    body: &'static str,
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockUpstream {
    pub async fn json(status: StatusCode, body: &'static str) -> Self {
        Self::start(status, "application/json", body).await
    }

    pub async fn start(status: StatusCode, content_type: &'static str, body: &'static str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: requests.clone(),
            status,
            content_type,
            body,
        };

        let app = Router::new().fallback(handle).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn captured(&self) -> Vec<CapturedRequest> {
        self.requests.lock().await.clone()
    }
}

async fn handle(State(state): State<MockState>, method: Method, uri: Uri) -> Response {
    state.requests.lock().await.push(CapturedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_owned),
    });

    (state.status, [(header::CONTENT_TYPE, state.content_type)], state.body).into_response()
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub const HEADLINES_BODY: &str = r#"{
    "status": "ok",
    "totalResults": 3,
    "articles": [
        {
            "source": { "id": "the-verge", "name": "The Verge" },
            "author": "Jane Roe",
            "title": "New chips announced",
            "description": "Faster than last year",
            "url": "https://example.com/chips",
            "urlToImage": "https://example.com/chips.png",
            "publishedAt": "2024-03-01T12:00:00Z",
            "content": "Body"
        },
        {
            "source": { "id": null, "name": "[Removed]" },
            "author": null,
            "title": "[Removed]",
            "description": null,
            "url": "https://removed.com",
            "urlToImage": null,
            "publishedAt": "1970-01-01T00:00:00Z",
            "content": null
        },
        {
            "source": { "id": null, "name": "Wire" },
            "author": null,
            "title": "Markets rally",
            "description": null,
            "url": "https://example.com/markets",
            "urlToImage": null,
            "publishedAt": "2024-03-01T11:00:00Z",
            "content": null
        }
    ]
}"#;

pub const UNAUTHORIZED_BODY: &str = r#"{
    "status": "error",
    "code": "apiKeyInvalid",
    "message": "Your API key is invalid or incorrect. Check your key, or go to https://newsapi.org to create a free API key."
}"#;
