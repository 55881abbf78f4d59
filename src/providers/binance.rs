use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::market::{CandleProvider, DerivativesProvider, DerivativesSnapshot};

/// Binance spot klines for closes, Binance futures for positioning data.
pub struct BinanceProvider {
    base_url: String,
    futures_base_url: String,
}

impl BinanceProvider {
    pub fn new(base_url: &str, futures_base_url: &str) -> Self {
        BinanceProvider {
            base_url: base_url.to_string(),
            futures_base_url: futures_base_url.to_string(),
        }
    }
}

// Kline rows are heterogeneous JSON arrays; the close is the string at
// index 4.
const KLINE_CLOSE_INDEX: usize = 4;

#[derive(Deserialize, Debug)]
struct LongShortRatioEntry {
    #[serde(alias = "longShortRatio")]
    long_short_ratio: String,
}

#[derive(Deserialize, Debug)]
struct PremiumIndexResponse {
    #[serde(alias = "lastFundingRate")]
    last_funding_rate: String,
}

#[async_trait]
impl CandleProvider for BinanceProvider {
    #[instrument(name = "BinanceKlines", skip(self), fields(symbol = %symbol))]
    async fn fetch_closes(&self, symbol: &str, limit: usize) -> Result<Vec<f64>> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval=1d&limit={}",
            self.base_url, symbol, limit
        );
        debug!("Requesting klines from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(super::USER_AGENT)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let rows = response.json::<Vec<Vec<serde_json::Value>>>().await?;
        let mut closes = Vec::with_capacity(rows.len());
        for row in &rows {
            let close = row
                .get(KLINE_CLOSE_INDEX)
                .and_then(|v| v.as_str())
                .ok_or_else(|| anyhow!("Malformed kline row for symbol: {}", symbol))?;
            closes.push(close.parse::<f64>().map_err(|e| {
                anyhow!("Unparseable close '{}' for symbol {}: {}", close, symbol, e)
            })?);
        }

        debug!("Fetched {} closes for {}", closes.len(), symbol);
        Ok(closes)
    }
}

#[async_trait]
impl DerivativesProvider for BinanceProvider {
    #[instrument(name = "BinanceDerivatives", skip(self), fields(symbol = %symbol))]
    async fn fetch_derivatives(&self, symbol: &str) -> Result<DerivativesSnapshot> {
        let client = reqwest::Client::builder()
            .user_agent(super::USER_AGENT)
            .build()?;

        let ratio_url = format!(
            "{}/futures/data/globalLongShortAccountRatio?symbol={}&period=1d&limit=1",
            self.futures_base_url, symbol
        );
        debug!("Requesting long/short ratio from {}", ratio_url);
        let entries = client
            .get(&ratio_url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?
            .json::<Vec<LongShortRatioEntry>>()
            .await?;
        let entry = entries
            .first()
            .ok_or_else(|| anyhow!("No long/short ratio data for symbol: {}", symbol))?;
        let long_short_ratio = entry.long_short_ratio.parse::<f64>().map_err(|e| {
            anyhow!(
                "Unparseable long/short ratio '{}' for symbol {}: {}",
                entry.long_short_ratio,
                symbol,
                e
            )
        })?;

        let funding_url = format!(
            "{}/fapi/v1/premiumIndex?symbol={}",
            self.futures_base_url, symbol
        );
        debug!("Requesting funding rate from {}", funding_url);
        let premium = client
            .get(&funding_url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?
            .json::<PremiumIndexResponse>()
            .await?;
        let funding_rate = premium.last_funding_rate.parse::<f64>().map_err(|e| {
            anyhow!(
                "Unparseable funding rate '{}' for symbol {}: {}",
                premium.last_funding_rate,
                symbol,
                e
            )
        })?;

        Ok(DerivativesSnapshot {
            long_short_ratio,
            funding_rate,
        })
    }
}
