use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::sentiment::{SentimentProvider, SentimentReading};

/// Alternative.me crypto Fear & Greed index.
pub struct AlternativeMeProvider {
    base_url: String,
}

impl AlternativeMeProvider {
    pub fn new(base_url: &str) -> Self {
        AlternativeMeProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct FngResponse {
    data: Vec<FngEntry>,
}

// All fields arrive as strings from this API.
#[derive(Deserialize, Debug)]
struct FngEntry {
    value: String,
    value_classification: String,
    timestamp: String,
}

#[async_trait]
impl SentimentProvider for AlternativeMeProvider {
    #[instrument(name = "FearGreedFetch", skip(self))]
    async fn fetch_readings(&self, limit: usize) -> Result<Vec<SentimentReading>> {
        let url = format!("{}/fng/?limit={}&format=json", self.base_url, limit);
        debug!("Requesting fear & greed index from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(super::USER_AGENT)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for URL: {}",
                response.status(),
                url
            ));
        }

        let data = response.json::<FngResponse>().await?;
        if data.data.is_empty() {
            return Err(anyhow!("No fear & greed data returned"));
        }

        let mut readings = Vec::with_capacity(data.data.len());
        for entry in &data.data {
            let value = entry
                .value
                .parse::<u8>()
                .map_err(|e| anyhow!("Unparseable index value '{}': {}", entry.value, e))?;
            let ts = entry
                .timestamp
                .parse::<i64>()
                .map_err(|e| anyhow!("Unparseable timestamp '{}': {}", entry.timestamp, e))?;
            let date = DateTime::from_timestamp(ts, 0)
                .ok_or_else(|| anyhow!("Out-of-range timestamp: {}", ts))?
                .date_naive();
            readings.push(SentimentReading {
                date,
                value,
                classification: entry.value_classification.clone(),
            });
        }
        Ok(readings)
    }
}
