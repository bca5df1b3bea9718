use crate::config::validate_lookup;
use crate::domain::model::{RacePolicy, ServiceEndpoint, DEFAULT_CEP, DEFAULT_TIMEOUT_MS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// File-based lookup settings.
///
/// ```toml
/// [lookup]
/// cep = "69304-350"
/// timeout_ms = 1000
/// policy = "first-success"
///
/// [[services]]
/// kind = "brasilapi"
/// base_url = "${BRASILAPI_URL}"
/// ```
///
/// Without a `[[services]]` list both public services are raced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub lookup: LookupSection,
    pub services: Option<Vec<ServiceEndpoint>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupSection {
    #[serde(default = "default_cep")]
    pub cep: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub policy: RacePolicy,
}

fn default_cep() -> String {
    DEFAULT_CEP.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for LookupSection {
    fn default() -> Self {
        Self {
            cep: default_cep(),
            timeout_ms: default_timeout_ms(),
            policy: RacePolicy::default(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LookupError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LookupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BRASILAPI_URL})，找不到的變數原樣保留
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LookupError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn cep(&self) -> &str {
        &self.lookup.cep
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.lookup.timeout_ms)
    }

    fn policy(&self) -> RacePolicy {
        self.lookup.policy
    }

    fn services(&self) -> Vec<ServiceEndpoint> {
        self.services.clone().unwrap_or_else(ServiceEndpoint::defaults)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(services) = &self.services {
            if services.is_empty() {
                return Err(LookupError::ConfigValidationError {
                    field: "services".to_string(),
                    message: "At least one service must be listed".to_string(),
                });
            }
        }
        validate_lookup(self)
    }
}
