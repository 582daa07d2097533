pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "contact-aggregator")]
#[command(about = "CRM contact aggregation facade")]
pub struct CliConfig {
    #[arg(long, default_value = "contact-aggregator.toml")]
    pub config: String,

    #[arg(long, help = "Override the [server] bind address")]
    pub bind: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
