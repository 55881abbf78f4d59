//! Market sentiment abstractions

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// One Fear & Greed style reading: a value in [0, 100] plus the label the
/// upstream index assigns to it.
#[derive(Debug, Clone)]
pub struct SentimentReading {
    pub date: NaiveDate,
    pub value: u8,
    pub classification: String,
}

#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Fetches up to `limit` readings, newest first.
    async fn fetch_readings(&self, limit: usize) -> Result<Vec<SentimentReading>>;
}
