pub mod toml_config;

pub use toml_config::TomlConfig;

use crate::domain::model::{
    RacePolicy, ServiceEndpoint, ServiceKind, DEFAULT_BRASILAPI_URL, DEFAULT_CEP,
    DEFAULT_TIMEOUT_MS, DEFAULT_VIACEP_URL,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{normalize_cep, validate_range, validate_url, Validate};
use std::time::Duration;

pub const MAX_TIMEOUT_MS: u64 = 60_000;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cep-race")]
#[command(about = "Looks up a Brazilian CEP on BrasilAPI and ViaCEP, printing the fastest answer")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_CEP)]
    pub cep: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS, help = "Deadline for the whole race")]
    pub timeout_ms: u64,

    #[arg(long, value_enum, default_value_t = RacePolicy::FirstSuccess)]
    pub policy: RacePolicy,

    #[arg(long, default_value = DEFAULT_BRASILAPI_URL)]
    pub brasilapi_url: String,

    #[arg(long, default_value = DEFAULT_VIACEP_URL)]
    pub viacep_url: String,

    #[arg(long, help = "Read lookup settings from a TOML file instead of flags")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON on stderr")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn cep(&self) -> &str {
        &self.cep
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn policy(&self) -> RacePolicy {
        self.policy
    }

    fn services(&self) -> Vec<ServiceEndpoint> {
        vec![
            ServiceEndpoint::new(ServiceKind::BrasilApi, self.brasilapi_url.clone()),
            ServiceEndpoint::new(ServiceKind::ViaCep, self.viacep_url.clone()),
        ]
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_lookup(self)
    }
}

/// Checks shared by every configuration source.
pub fn validate_lookup<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    normalize_cep(config.cep())?;
    validate_range(
        "timeout_ms",
        config.timeout().as_millis() as u64,
        1,
        MAX_TIMEOUT_MS,
    )?;
    for endpoint in config.services() {
        let field = match endpoint.kind {
            ServiceKind::BrasilApi => "brasilapi_url",
            ServiceKind::ViaCep => "viacep_url",
        };
        validate_url(field, &endpoint.base_url)?;
    }
    Ok(())
}
