use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_rsi_period() -> usize {
    crate::core::oscillator::DEFAULT_RSI_PERIOD
}

fn default_window_days() -> u32 {
    90
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CryptoWatch {
    pub symbol: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TaiwanStockWatch {
    pub stock_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum WatchItem {
    Crypto(CryptoWatch),
    TaiwanStock(TaiwanStockWatch),
}

impl WatchItem {
    pub fn label(&self) -> &str {
        match self {
            WatchItem::Crypto(c) => &c.symbol,
            WatchItem::TaiwanStock(t) => &t.stock_id,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrackedAddress {
    pub label: String,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BinanceProviderConfig {
    pub base_url: String,
    pub futures_base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AlternativeMeProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MempoolProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FinMindProviderConfig {
    pub base_url: String,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub binance: Option<BinanceProviderConfig>,
    pub alternative_me: Option<AlternativeMeProviderConfig>,
    pub mempool: Option<MempoolProviderConfig>,
    pub finmind: Option<FinMindProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            binance: Some(BinanceProviderConfig {
                base_url: "https://api.binance.com".to_string(),
                futures_base_url: "https://fapi.binance.com".to_string(),
            }),
            alternative_me: Some(AlternativeMeProviderConfig {
                base_url: "https://api.alternative.me".to_string(),
            }),
            mempool: Some(MempoolProviderConfig {
                base_url: "https://mempool.space".to_string(),
            }),
            finmind: Some(FinMindProviderConfig {
                base_url: "https://api.finmindtrade.com".to_string(),
                token: None,
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub watchlist: Vec<WatchItem>,
    #[serde(default)]
    pub addresses: Vec<TrackedAddress>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "coindash", "coindash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
