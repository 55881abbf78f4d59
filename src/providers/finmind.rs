use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::market::CandleProvider;

/// FinMind Taiwan market data API (`TaiwanStockPrice` dataset).
pub struct FinMindProvider {
    base_url: String,
    token: Option<String>,
}

impl FinMindProvider {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        FinMindProvider {
            base_url: base_url.to_string(),
            token: token.map(str::to_string),
        }
    }
}

#[derive(Deserialize, Debug)]
struct FinMindResponse {
    // The API reports either a numeric 200 or the string "OK" on success.
    status: Option<serde_json::Value>,
    msg: Option<String>,
    #[serde(default)]
    data: Vec<FinMindRow>,
}

#[derive(Deserialize, Debug)]
struct FinMindRow {
    date: String,
    close: f64,
}

fn status_ok(status: &Option<serde_json::Value>) -> bool {
    match status {
        None => true,
        Some(v) => v.as_i64() == Some(200) || v.as_str() == Some("OK"),
    }
}

#[async_trait]
impl CandleProvider for FinMindProvider {
    #[instrument(name = "FinMindFetch", skip(self), fields(stock_id = %stock_id))]
    async fn fetch_closes(&self, stock_id: &str, limit: usize) -> Result<Vec<f64>> {
        // Double the calendar span to cover weekends and market holidays.
        let end = Utc::now().date_naive();
        let start = end - Duration::days((limit as i64) * 2);
        let url = format!(
            "{}/api/v4/data?dataset=TaiwanStockPrice&data_id={}&start_date={}&end_date={}",
            self.base_url, stock_id, start, end
        );
        debug!("Requesting Taiwan stock prices from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(super::USER_AGENT)
            .build()?;
        let mut request = client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for stock: {} URL: {}", e, stock_id, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for stock: {}",
                response.status(),
                stock_id
            ));
        }

        let data = response.json::<FinMindResponse>().await?;
        if !status_ok(&data.status) {
            return Err(anyhow!(
                "FinMind API error for stock {}: {}",
                stock_id,
                data.msg.as_deref().unwrap_or("unknown error")
            ));
        }
        if data.data.is_empty() {
            return Err(anyhow!("No price data found for stock: {}", stock_id));
        }

        let mut rows = data.data;
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        let closes: Vec<f64> = rows.iter().map(|row| row.close).collect();
        let trimmed_start = closes.len().saturating_sub(limit);
        Ok(closes[trimmed_start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_successful_fetch_sorts_and_trims() {
        let mock_response = r#"{
            "msg": "success",
            "status": 200,
            "data": [
                {"date": "2024-03-13", "stock_id": "2330", "close": 770.0},
                {"date": "2024-03-11", "stock_id": "2330", "close": 750.0},
                {"date": "2024-03-12", "stock_id": "2330", "close": 760.0}
            ]
        }"#;

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/data"))
            .and(query_param("dataset", "TaiwanStockPrice"))
            .and(query_param("data_id", "2330"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let provider = FinMindProvider::new(&mock_server.uri(), None);
        let closes = provider.fetch_closes("2330", 2).await.unwrap();
        assert_eq!(closes, vec![760.0, 770.0]);
    }

    #[tokio::test]
    async fn test_token_is_sent_as_bearer() {
        let mock_response = r#"{
            "msg": "success",
            "status": "OK",
            "data": [{"date": "2024-03-13", "stock_id": "0050", "close": 135.0}]
        }"#;

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/data"))
            .and(header("authorization", "Bearer sekrit"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let provider = FinMindProvider::new(&mock_server.uri(), Some("sekrit"));
        let closes = provider.fetch_closes("0050", 15).await.unwrap();
        assert_eq!(closes, vec![135.0]);
    }

    #[tokio::test]
    async fn test_api_error_status_surfaces_message() {
        let mock_response = r#"{"msg": "rate limit exceeded", "status": 402, "data": []}"#;

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/data"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let provider = FinMindProvider::new(&mock_server.uri(), None);
        let result = provider.fetch_closes("2330", 15).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "FinMind API error for stock 2330: rate limit exceeded"
        );
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/data"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let provider = FinMindProvider::new(&mock_server.uri(), None);
        let result = provider.fetch_closes("2330", 15).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP error: 429"));
    }

    #[tokio::test]
    async fn test_empty_data_is_an_error() {
        let mock_response = r#"{"msg": "success", "status": 200, "data": []}"#;

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/data"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let provider = FinMindProvider::new(&mock_server.uri(), None);
        let result = provider.fetch_closes("9999", 15).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No price data found for stock: 9999"
        );
    }
}
