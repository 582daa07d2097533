use clap::Parser;
use contact_aggregator::api::run_server;
use contact_aggregator::utils::{logger, validation::validate_socket_addr, validation::Validate};
use contact_aggregator::{AppState, CliConfig, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting contact-aggregator");
    tracing::debug!("Loading configuration from {}", cli.config);

    let config = match TomlConfig::from_file(&cli.config).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                "❌ Configuration validation failed: {} (Category: {:?})",
                e,
                e.category()
            );
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let bind = cli.bind.as_deref().unwrap_or_else(|| config.bind_address());
    let addr = validate_socket_addr("bind", bind)?;

    let state = AppState::from_config(&config)?;
    run_server(addr, state).await?;

    Ok(())
}
