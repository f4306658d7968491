use financial_literacy_assistant::{api::start_server, AppConfig, FinanceAssistant};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Missing credentials abort startup
    let config = AppConfig::from_env().map_err(|e| {
        error!("{}", e);
        eprintln!("Set GEMINI_API_KEY in the environment or a .env file (see .env.example)");
        e
    })?;

    info!("Financial Literacy Assistant - API Server");
    info!(
        addr = %config.bind_addr(),
        model = %config.model.model,
        relevance = %config.relevance,
        timeout_secs = config.model.timeout.as_secs(),
        "Configuration loaded"
    );

    let assistant = Arc::new(FinanceAssistant::from_config(&config)?);

    info!("Starting API server...");
    start_server(assistant, &config.bind_addr()).await?;

    Ok(())
}
