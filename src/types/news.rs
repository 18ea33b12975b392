use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title NewsAPI substitutes for articles that were taken down.
pub const REMOVED_TITLE: &str = "[Removed]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: String,
}

/// A single article as returned by the upstream API.
///
/// `url` is the identity of an article: two values with the same `url` are
/// the same article for favorite membership, whatever the other fields say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source: ArticleSource,
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: String,
    pub content: Option<String>,
}

impl Article {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn is_displayable(&self) -> bool {
        !self.title.is_empty() && self.title != REMOVED_TITLE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    pub total_results: u64,
    pub articles: Vec<Article>,
}
