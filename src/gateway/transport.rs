use async_trait::async_trait;
use reqwest::{Client, Url};

use super::error::TransportError;
use super::NewsRequest;
use crate::types::NewsResponse;

/// Where a [`NewsRequest`] is sent. Chosen once when the gateway is built.
#[async_trait]
pub trait RequestTransport: Send + Sync {
    fn name(&self) -> &'static str;

    fn client(&self) -> &Client;

    /// Full URL, query string included, that `send` will GET.
    fn url(&self, request: &NewsRequest) -> Result<Url, TransportError>;

    async fn send(&self, request: &NewsRequest) -> Result<NewsResponse, TransportError> {
        let url = self.url(request)?;
        tracing::debug!(transport = self.name(), endpoint = request.endpoint.as_str(), "sending news request");
        fetch(self.client(), url).await
    }
}

/// Talks to the relay's development proxy path, which forwards straight to
/// the upstream API. The client's own credential rides along as `apiKey`.
pub struct DevProxyTransport {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl DevProxyTransport {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl RequestTransport for DevProxyTransport {
    fn name(&self) -> &'static str {
        "dev-proxy"
    }

    fn client(&self) -> &Client {
        &self.client
    }

    fn url(&self, request: &NewsRequest) -> Result<Url, TransportError> {
        let base = self.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, request.endpoint.as_str()))
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(key) = &self.api_key {
                query.append_pair("apiKey", key);
            }
            for (k, v) in &request.params {
                query.append_pair(k, v);
            }
        }

        Ok(url)
    }
}

/// Talks to the hosted relay. The operation travels as `endpoint`; the relay
/// holds the credential, so none is ever sent from here.
pub struct RelayTransport {
    client: Client,
    relay_url: String,
}

impl RelayTransport {
    pub fn new(client: Client, relay_url: impl Into<String>) -> Self {
        Self {
            client,
            relay_url: relay_url.into(),
        }
    }
}

#[async_trait]
impl RequestTransport for RelayTransport {
    fn name(&self) -> &'static str {
        "relay"
    }

    fn client(&self) -> &Client {
        &self.client
    }

    fn url(&self, request: &NewsRequest) -> Result<Url, TransportError> {
        let mut url =
            Url::parse(&self.relay_url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("endpoint", request.endpoint.as_str());
            for (k, v) in &request.params {
                query.append_pair(k, v);
            }
        }

        Ok(url)
    }
}

async fn fetch(client: &Client, url: Url) -> Result<NewsResponse, TransportError> {
    let resp = client.get(url).send().await?;
    let status = resp.status();

    if !status.is_success() {
        let message = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("message")?.as_str().map(str::to_owned))
            .filter(|m| !m.is_empty());

        return Err(TransportError::Status { status, message });
    }

    Ok(resp.json::<NewsResponse>().await?)
}
