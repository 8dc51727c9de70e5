//! HTTP seam for the WhatsApp messaging API.
//!
//! The dispatcher only sees these traits; production wires in reqwest and a
//! real sleep, tests substitute scripted fakes so the retry policy can be
//! verified without a network or timers.

use std::time::Duration;

use async_trait::async_trait;

/// Status and decoded JSON body of one API response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP operations the messaging API requires.
#[async_trait]
pub trait WhatsAppTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, String>;

    async fn get_json(&self, url: &str, api_key: &str) -> Result<TransportResponse, String>;
}

/// Suspension between retry attempts.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Production transport over reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("rastreamento-server/0.3")
            .build()
            .expect("Failed to create reqwest client");
        Self { client }
    }

    async fn decode(response: reqwest::Response) -> TransportResponse {
        let status = response.status().as_u16();
        // Some endpoints reply with empty or non-JSON bodies on error.
        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);
        TransportResponse { status, body }
    }
}

#[async_trait]
impl WhatsAppTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, String> {
        let response = self
            .client
            .post(url)
            .header("apikey", api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Ok(Self::decode(response).await)
    }

    async fn get_json(&self, url: &str, api_key: &str) -> Result<TransportResponse, String> {
        let response = self
            .client
            .get(url)
            .header("apikey", api_key)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Ok(Self::decode(response).await)
    }
}

/// Production delay backed by the tokio timer.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
