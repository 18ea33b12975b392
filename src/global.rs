use std::sync::Arc;

use anyhow::Context as _;

use crate::config::Settings;

pub struct Global {
    pub config: Settings,
    pub http_client: reqwest::Client,
    pub started_at: std::time::Instant,
}

impl Global {
    pub fn init(config: Settings) -> anyhow::Result<Arc<Self>> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.upstream.user_agent.as_str())
            .build()
            .context("http client")?;

        if config.relay.api_key.is_none() {
            tracing::warn!("relay api key is not configured, /api/news will answer 500");
        }

        Ok(Arc::new(Self {
            config,
            http_client,
            started_at: std::time::Instant::now(),
        }))
    }
}
