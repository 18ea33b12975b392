use crate::gateway::{GatewayError, NewsGateway, FIRST_PAGE};
use crate::store::NewsStore;
use crate::types::{Article, NewsResponse};

/// Identifies one fetch cycle. Tickets are issued in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Drives fetch cycles from the store's current view mode into the store.
///
/// Only the most recently issued ticket may write its result; a slower,
/// superseded fetch that completes later is dropped instead of overwriting
/// newer articles.
#[derive(Debug, Default)]
pub struct Feed {
    latest: u64,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, store: &mut NewsStore) -> FetchTicket {
        self.latest += 1;
        store.set_loading(true);
        store.set_error(None);
        FetchTicket(self.latest)
    }

    /// Applies a finished fetch. Returns `false` if the ticket was stale and
    /// the result was discarded.
    pub fn complete(
        &mut self,
        store: &mut NewsStore,
        ticket: FetchTicket,
        result: Result<NewsResponse, GatewayError>,
    ) -> bool {
        if ticket.0 != self.latest {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "discarding superseded fetch");
            return false;
        }

        match result {
            Ok(resp) => {
                let articles: Vec<Article> = resp
                    .articles
                    .into_iter()
                    .filter(Article::is_displayable)
                    .collect();
                tracing::info!(count = articles.len(), total = resp.total_results, "articles loaded");
                store.set_articles(articles);
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch failed");
                store.set_error(Some(e.message));
            }
        }

        store.set_loading(false);
        true
    }

    /// One full cycle: search when a query is set, headlines for the
    /// selected category otherwise.
    pub async fn refresh(&mut self, store: &mut NewsStore, gateway: &NewsGateway) -> bool {
        let ticket = self.begin(store);

        let result = if store.is_search_mode() {
            gateway.search_news(store.search_query(), FIRST_PAGE).await
        } else {
            gateway
                .get_top_headlines(store.selected_category(), FIRST_PAGE)
                .await
        };

        self.complete(store, ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::RelayTransport;
    use crate::mock_upstream::{closed_addr, MockUpstream, HEADLINES_BODY};
    use crate::types::Category;
    use hyper::StatusCode;

    fn response(urls: &[&str]) -> NewsResponse {
        let articles = urls
            .iter()
            .map(|url| {
                serde_json::from_value(serde_json::json!({
                    "source": { "id": null, "name": "Wire" },
                    "author": null,
                    "title": format!("story {url}"),
                    "description": null,
                    "url": url,
                    "urlToImage": null,
                    "publishedAt": "2024-03-01T12:00:00Z",
                    "content": null
                }))
                .unwrap()
            })
            .collect::<Vec<Article>>();

        NewsResponse {
            status: "ok".into(),
            total_results: articles.len() as u64,
            articles,
        }
    }

    fn relay(base: &str) -> NewsGateway {
        NewsGateway::new(RelayTransport::new(reqwest::Client::new(), format!("{base}/api/news")))
    }

    #[test]
    fn test_begin_sets_loading_and_clears_error() {
        let mut store = NewsStore::in_memory();
        store.set_error(Some("old".into()));
        let mut feed = Feed::new();

        feed.begin(&mut store);

        assert!(store.is_loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut store = NewsStore::in_memory();
        let mut feed = Feed::new();

        let first = feed.begin(&mut store);
        let second = feed.begin(&mut store);
        assert!(first < second);

        assert!(feed.complete(&mut store, second, Ok(response(&["https://x/new"]))));
        assert!(!store.is_loading());

        assert!(!feed.complete(&mut store, first, Ok(response(&["https://x/old"]))));
        assert_eq!(store.articles()[0].url, "https://x/new");
    }

    #[test]
    fn test_stale_completion_keeps_loading() {
        let mut store = NewsStore::in_memory();
        let mut feed = Feed::new();

        let first = feed.begin(&mut store);
        let _second = feed.begin(&mut store);

        assert!(!feed.complete(&mut store, first, Err(GatewayError::new("slow failure"))));
        assert!(store.is_loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_failure_records_message() {
        let mut store = NewsStore::in_memory();
        store.set_articles(response(&["https://x/1"]).articles);
        let mut feed = Feed::new();

        let ticket = feed.begin(&mut store);
        feed.complete(&mut store, ticket, Err(GatewayError::new("Failed to search news")));

        assert_eq!(store.error(), Some("Failed to search news"));
        assert!(!store.is_loading());
        // Previous articles are left alone on failure
        assert_eq!(store.articles().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_headlines_filters_removed() {
        let upstream = MockUpstream::json(StatusCode::OK, HEADLINES_BODY).await;
        let gateway = relay(&upstream.base_url());
        let mut store = NewsStore::in_memory();
        store.set_selected_category(Category::Technology);
        let mut feed = Feed::new();

        assert!(feed.refresh(&mut store, &gateway).await);

        let urls: Vec<&str> = store.articles().iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/chips", "https://example.com/markets"]);
        assert!(!store.is_loading());

        let captured = upstream.captured().await;
        assert_eq!(captured[0].param("endpoint").as_deref(), Some("top-headlines"));
        assert_eq!(captured[0].param("category").as_deref(), Some("technology"));
    }

    #[tokio::test]
    async fn test_refresh_uses_search_when_query_set() {
        let upstream = MockUpstream::json(StatusCode::OK, HEADLINES_BODY).await;
        let gateway = relay(&upstream.base_url());
        let mut store = NewsStore::in_memory();
        store.set_search_query("chips");
        let mut feed = Feed::new();

        feed.refresh(&mut store, &gateway).await;

        let captured = upstream.captured().await;
        assert_eq!(captured[0].param("endpoint").as_deref(), Some("everything"));
        assert_eq!(captured[0].param("q").as_deref(), Some("chips"));
        assert!(captured[0].param("category").is_none());
    }

    #[tokio::test]
    async fn test_refresh_failure() {
        let addr = closed_addr().await;
        let gateway = relay(&format!("http://{addr}"));
        let mut store = NewsStore::in_memory();
        let mut feed = Feed::new();

        feed.refresh(&mut store, &gateway).await;

        assert_eq!(
            store.error(),
            Some("Failed to fetch top headlines. Check your API key.")
        );
        assert!(!store.is_loading());
        assert!(store.articles().is_empty());
    }
}
