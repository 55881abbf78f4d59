pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use tracing::debug;

use crate::core::config::AppConfig;
use crate::providers::alternative_me::AlternativeMeProvider;
use crate::providers::binance::BinanceProvider;
use crate::providers::finmind::FinMindProvider;
use crate::providers::mempool::MempoolProvider;

/// The subcommands the library can run; the binary's clap enum converts
/// into this.
#[derive(Debug, Clone, Copy)]
pub enum AppCommand {
    Market,
    Sentiment,
    Derivatives,
    Balance,
}

fn binance_urls(config: &AppConfig) -> (&str, &str) {
    config.providers.binance.as_ref().map_or(
        ("https://api.binance.com", "https://fapi.binance.com"),
        |p| (p.base_url.as_str(), p.futures_base_url.as_str()),
    )
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Market => {
            let (spot_url, futures_url) = binance_urls(&config);
            let crypto_provider = BinanceProvider::new(spot_url, futures_url);
            let finmind = config.providers.finmind.as_ref();
            let taiwan_provider = FinMindProvider::new(
                finmind.map_or("https://api.finmindtrade.com", |p| &p.base_url),
                finmind.and_then(|p| p.token.as_deref()),
            );
            cli::market::run(
                &config.watchlist,
                &crypto_provider,
                &taiwan_provider,
                config.rsi_period,
            )
            .await
        }
        AppCommand::Sentiment => {
            let base_url = config
                .providers
                .alternative_me
                .as_ref()
                .map_or("https://api.alternative.me", |p| &p.base_url);
            let provider = AlternativeMeProvider::new(base_url);
            cli::sentiment::run(&provider).await
        }
        AppCommand::Derivatives => {
            let (spot_url, futures_url) = binance_urls(&config);
            let provider = BinanceProvider::new(spot_url, futures_url);
            cli::derivatives::run(&config.watchlist, &provider).await
        }
        AppCommand::Balance => {
            let base_url = config
                .providers
                .mempool
                .as_ref()
                .map_or("https://mempool.space", |p| &p.base_url);
            let provider = MempoolProvider::new(base_url);
            cli::balance::run(&config.addresses, &provider, config.window_days).await
        }
    }
}
