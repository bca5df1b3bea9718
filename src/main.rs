use cep_race::domain::ports::ConfigProvider;
use cep_race::utils::logger;
use cep_race::utils::validation::Validate;
use cep_race::{render_outcome, CliConfig, LookupEngine, LookupError, RaceOutcome, TomlConfig};
use clap::Parser;

async fn run_with<C: ConfigProvider + Validate>(config: C) -> Result<RaceOutcome, LookupError> {
    LookupEngine::new(config).run().await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    let result = match &config.config {
        Some(path) => {
            tracing::info!("📄 Loading lookup settings from {}", path.display());
            match TomlConfig::from_file(path) {
                Ok(file_config) => run_with(file_config).await,
                Err(e) => Err(e),
            }
        }
        None => run_with(config.clone()).await,
    };

    match result {
        Ok(outcome) => {
            if let Some(text) = render_outcome(&outcome) {
                println!("{}", text);
            }
        }
        Err(e) => {
            // 設定錯誤：尚未發出任何請求
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }

    Ok(())
}
