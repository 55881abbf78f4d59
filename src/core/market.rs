//! Market data abstractions

use anyhow::Result;
use async_trait::async_trait;

/// Supplies ordered daily closing prices for an instrument.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// Fetches up to `limit` daily closes, oldest first, newest last.
    async fn fetch_closes(&self, id: &str, limit: usize) -> Result<Vec<f64>>;
}

/// Latest positioning data for a perpetual futures symbol.
#[derive(Debug, Clone, Copy)]
pub struct DerivativesSnapshot {
    /// Global long/short account ratio (longs divided by shorts).
    pub long_short_ratio: f64,
    /// Last funding rate as a fraction, e.g. 0.0001 for 0.01%.
    pub funding_rate: f64,
}

#[async_trait]
pub trait DerivativesProvider: Send + Sync {
    async fn fetch_derivatives(&self, symbol: &str) -> Result<DerivativesSnapshot>;
}
