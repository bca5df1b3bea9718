use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid CEP '{value}': expected 8 digits, optionally written as 00000-000")]
    InvalidCep { value: String },
}

impl LookupError {
    /// 給使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            LookupError::ApiError(_) => "Could not reach the lookup service".to_string(),
            LookupError::IoError(e) => format!("Could not read a local file: {}", e),
            LookupError::InvalidCep { value } => format!("'{}' is not a valid CEP", value),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LookupError::ApiError(_) => "Check your network connection and the service URLs",
            LookupError::IoError(_) => "Check that the config file path exists and is readable",
            LookupError::InvalidCep { .. } => "Pass the CEP as 8 digits, e.g. --cep 69304350",
            LookupError::ConfigError { .. }
            | LookupError::ConfigValidationError { .. }
            | LookupError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML config file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
