use crate::adapters::{provider_for, HttpFetcher};
use crate::domain::model::{FetchedResponse, RaceOutcome, RacePolicy};
use crate::domain::ports::{AddressProvider, ConfigProvider, Fetcher};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Races every registered service against one shared deadline.
///
/// Each service runs as its own task and reports exactly once on a channel
/// sized to the number of services, so a late branch never blocks on send.
/// Branches still in flight when [`LookupRace::run`] returns are aborted.
pub struct LookupRace {
    fetcher: Arc<dyn Fetcher>,
    providers: Vec<Arc<dyn AddressProvider>>,
    timeout: Duration,
    policy: RacePolicy,
}

impl LookupRace {
    pub fn new(fetcher: Arc<dyn Fetcher>, timeout: Duration, policy: RacePolicy) -> Self {
        Self {
            fetcher,
            providers: Vec::new(),
            timeout,
            policy,
        }
    }

    /// Builds a race over the configured services using the reqwest fetcher.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let mut race = Self::new(Arc::new(HttpFetcher::new()), config.timeout(), config.policy());
        for endpoint in config.services() {
            race.add_provider(provider_for(&endpoint));
        }
        race
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn add_provider(&mut self, provider: Arc<dyn AddressProvider>) {
        self.providers.push(provider);
    }

    pub fn with_provider(mut self, provider: Arc<dyn AddressProvider>) -> Self {
        self.add_provider(provider);
        self
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub async fn run(&self, cep: &str) -> RaceOutcome {
        if self.providers.is_empty() {
            tracing::warn!("No lookup services configured");
            return RaceOutcome::Exhausted {
                failures: Vec::new(),
            };
        }

        let deadline = Instant::now() + self.timeout;
        let (tx, mut rx) = mpsc::channel::<(usize, Result<FetchedResponse>)>(self.providers.len());
        let mut branches = JoinSet::new();

        for (index, provider) in self.providers.iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let url = provider.lookup_url(cep);
            let tx = tx.clone();
            tracing::debug!("🏁 Starting {} lookup: {}", provider.name(), url);
            branches.spawn(async move {
                let result = fetcher.fetch(&url, deadline).await;
                // 接收端可能已經結束，忽略送出失敗
                let _ = tx.send((index, result)).await;
            });
        }
        // 只留分支手上的 sender，全部結束後 recv 才會回傳 None
        drop(tx);

        let expiry = tokio::time::sleep_until(deadline);
        tokio::pin!(expiry);

        let mut failures = Vec::new();
        let outcome = loop {
            tokio::select! {
                received = rx.recv() => {
                    let Some((index, result)) = received else {
                        break RaceOutcome::Exhausted { failures };
                    };
                    let provider = &self.providers[index];
                    match result {
                        Ok(response) => {
                            tracing::info!(
                                "✅ {} answered first (status {}, {} bytes)",
                                provider.name(),
                                response.status,
                                response.body.len()
                            );
                            break RaceOutcome::Resolved {
                                service: provider.name().to_string(),
                                address: provider.decode(&response.body),
                            };
                        }
                        Err(e) => {
                            tracing::warn!("⚠️ {} lookup failed: {}", provider.name(), e);
                            if self.policy == RacePolicy::FirstEvent {
                                break RaceOutcome::Failed {
                                    service: provider.name().to_string(),
                                };
                            }
                            failures.push(provider.name().to_string());
                        }
                    }
                }
                _ = &mut expiry => {
                    tracing::warn!("⏱️ No service answered within {:?}", self.timeout);
                    break RaceOutcome::TimedOut;
                }
            }
        };

        // 輸家不再等待，直接中止
        branches.abort_all();
        outcome
    }
}
