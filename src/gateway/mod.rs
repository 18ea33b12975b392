//! Resolves logical news requests into HTTP calls.
//!
//! Callers ask for "top headlines in a category" or "search results for a
//! query"; the [`RequestTransport`] picked at construction decides whether
//! that goes to the development proxy or the hosted relay. Every failure is
//! reduced to a [`GatewayError`] carrying one human readable message.

use reqwest::Client;

use crate::config::{Mode, Settings};
use crate::types::{Category, NewsResponse};

pub mod error;
pub mod transport;


pub use error::{GatewayError, TransportError};
pub use transport::{DevProxyTransport, RelayTransport, RequestTransport};

pub const FIRST_PAGE: u32 = 1;

/// Top headlines are always scoped to this country.
const HEADLINES_COUNTRY: &str = "us";
const SEARCH_SORT: &str = "publishedAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsEndpoint {
    TopHeadlines,
    Everything,
}

impl NewsEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopHeadlines => "top-headlines",
            Self::Everything => "everything",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        match s {
            "top-headlines" => Some(Self::TopHeadlines),
            "everything" => Some(Self::Everything),
            _ => None,
        }
    }
}

/// The logical operation behind a request, used to pick fallback messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    TopHeadlines,
    Search,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TopHeadlines => "top_headlines",
            Self::Search => "search",
        }
    }

    /// Used when the request never made it onto the wire.
    pub fn fallback(&self) -> &'static str {
        match self {
            Self::TopHeadlines => "Failed to fetch top headlines",
            Self::Search => "Failed to search news",
        }
    }

    /// Used when the request was sent but failed without an upstream message.
    pub fn transport_fallback(&self) -> &'static str {
        match self {
            Self::TopHeadlines => "Failed to fetch top headlines. Check your API key.",
            Self::Search => "Failed to search news. Check your API key.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    pub endpoint: NewsEndpoint,
    /// Query parameters in the order they are sent.
    pub params: Vec<(&'static str, String)>,
}

impl NewsRequest {
    pub fn top_headlines(category: Category, page: u32) -> Self {
        Self {
            endpoint: NewsEndpoint::TopHeadlines,
            params: vec![
                ("category", category.slug().to_string()),
                ("page", page.to_string()),
                ("country", HEADLINES_COUNTRY.to_string()),
            ],
        }
    }

    pub fn search(query: &str, page: u32) -> Self {
        Self {
            endpoint: NewsEndpoint::Everything,
            params: vec![
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("sortBy", SEARCH_SORT.to_string()),
            ],
        }
    }
}

pub struct NewsGateway {
    transport: Box<dyn RequestTransport>,
}

impl NewsGateway {
    pub fn new(transport: impl RequestTransport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    pub fn from_settings(settings: &Settings, client: Client) -> Self {
        match settings.mode {
            Mode::Development => Self::new(DevProxyTransport::new(
                client,
                settings.gateway.dev_proxy_url.clone(),
                settings.gateway.api_key.clone(),
            )),
            Mode::Production => Self::new(RelayTransport::new(client, settings.gateway.relay_url.clone())),
        }
    }

    pub fn transport(&self) -> &dyn RequestTransport {
        self.transport.as_ref()
    }

    #[tracing::instrument(skip(self), fields(transport = self.transport.name()))]
    pub async fn get_top_headlines(&self, category: Category, page: u32) -> Result<NewsResponse, GatewayError> {
        let request = NewsRequest::top_headlines(category, page);
        self.transport
            .send(&request)
            .await
            .map_err(|e| GatewayError::normalize(Operation::TopHeadlines, e))
    }

    #[tracing::instrument(skip(self), fields(transport = self.transport.name()))]
    pub async fn search_news(&self, query: &str, page: u32) -> Result<NewsResponse, GatewayError> {
        let request = NewsRequest::search(query, page);
        self.transport
            .send(&request)
            .await
            .map_err(|e| GatewayError::normalize(Operation::Search, e))
    }
}
