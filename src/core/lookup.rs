use crate::core::race::LookupRace;
use crate::domain::model::RaceOutcome;
use crate::domain::ports::{ConfigProvider, Fetcher};
use crate::utils::error::Result;
use crate::utils::validation::{normalize_cep, Validate};
use std::sync::Arc;

pub struct LookupEngine<C: ConfigProvider + Validate> {
    config: C,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl<C: ConfigProvider + Validate> LookupEngine<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            fetcher: None,
        }
    }

    /// Replaces the default reqwest fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Validates the configuration, then races the configured services once.
    pub async fn run(&self) -> Result<RaceOutcome> {
        self.config.validate()?;
        let cep = normalize_cep(self.config.cep())?;

        let mut race = LookupRace::from_config(&self.config);
        if let Some(fetcher) = &self.fetcher {
            race = race.with_fetcher(Arc::clone(fetcher));
        }

        tracing::info!(
            "🔎 Looking up CEP {} across {} service(s), timeout {:?}, policy {:?}",
            cep,
            race.provider_count(),
            self.config.timeout(),
            self.config.policy()
        );

        let outcome = race.run(&cep).await;
        tracing::debug!("Race outcome: {:?}", outcome);
        Ok(outcome)
    }
}
