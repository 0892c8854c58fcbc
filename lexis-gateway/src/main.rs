//! Lexis Gateway - Main entry point.

use anyhow::Result;
use lexis_common::config::Config;
use lexis_common::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load and validate configuration
    let config = Config::load_and_validate()?;

    init_logging(&config.observability.log_level, &config.observability.log_format);

    tracing::info!("Lexis Gateway v{}", env!("CARGO_PKG_VERSION"));

    lexis_gateway::start_server(&config).await
}
