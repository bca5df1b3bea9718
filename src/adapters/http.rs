use crate::domain::model::FetchedResponse;
use crate::domain::ports::Fetcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use tokio::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, deadline: Instant) -> Result<FetchedResponse> {
        // 請求本身的逾時 = 距離共用截止時間的剩餘時間
        let remaining = deadline.saturating_duration_since(Instant::now());

        tracing::debug!("Making API request to: {} (budget {:?})", url, remaining);
        let response = self.client.get(url).timeout(remaining).send().await?;

        let status = response.status();
        tracing::debug!("API response status from {}: {}", url, status);
        if !status.is_success() {
            tracing::debug!("Non-success status from {}, decoding body anyway", url);
        }

        let body = response.bytes().await?;
        Ok(FetchedResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}
