//! Shared helpers for the integration tests: scripted transport, recording
//! delay and a filled-in sample contract.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use rastreamento_server::contract::ContractRecord;
use rastreamento_server::whatsapp::{Delay, TransportResponse, WhatsAppTransport};

/// One scripted reply for the mock transport.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Status(u16),
    StatusWithBody(u16, serde_json::Value),
    TransportError(String),
}

/// Record of one request the mock transport received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub api_key: String,
    pub body: serde_json::Value,
}

/// Transport that replays a scripted list of replies and records every call.
///
/// When the script runs out, the last reply repeats.
pub struct MockTransport {
    script: Mutex<Vec<ScriptedReply>>,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new(script: Vec<ScriptedReply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn always(reply: ScriptedReply) -> Arc<Self> {
        Self::new(vec![reply])
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_reply(&self) -> ScriptedReply {
        let mut script = self.script.lock().await;
        if script.len() > 1 {
            script.remove(0)
        } else {
            script[0].clone()
        }
    }

    async fn respond(
        &self,
        method: &'static str,
        url: &str,
        api_key: &str,
        body: serde_json::Value,
    ) -> Result<TransportResponse, String> {
        self.requests.lock().await.push(RecordedRequest {
            method,
            url: url.to_string(),
            api_key: api_key.to_string(),
            body,
        });

        match self.next_reply().await {
            ScriptedReply::Status(status) => Ok(TransportResponse {
                status,
                body: serde_json::Value::Null,
            }),
            ScriptedReply::StatusWithBody(status, body) => Ok(TransportResponse { status, body }),
            ScriptedReply::TransportError(message) => Err(message),
        }
    }
}

#[async_trait]
impl WhatsAppTransport for MockTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, String> {
        self.respond("POST", url, api_key, body.clone()).await
    }

    async fn get_json(&self, url: &str, api_key: &str) -> Result<TransportResponse, String> {
        self.respond("GET", url, api_key, serde_json::Value::Null)
            .await
    }
}

/// Delay that records requested durations instead of sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    pub waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn wait_count(&self) -> usize {
        self.waits.lock().await.len()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().await.push(duration);
    }
}

/// A completely filled contract record without signature data.
pub fn sample_contract() -> ContractRecord {
    ContractRecord {
        document: "123.456.789-09".to_string(),
        name: "Maria Silva".to_string(),
        email: "maria@example.com".to_string(),
        phone: "(11) 98765-4321".to_string(),
        street: "Rua das Flores".to_string(),
        number: "42".to_string(),
        neighborhood: "Centro".to_string(),
        city: "São Paulo".to_string(),
        state: "SP".to_string(),
        zip_code: "01234-567".to_string(),
        vehicle_model: "Fiat Uno".to_string(),
        license_plate: "ABC1D23".to_string(),
        tracker_model: "GT06".to_string(),
        imei: "490154203237518".to_string(),
        registration_date: String::new(),
        installation_location: "Oficina Central".to_string(),
        ip_address: None,
        signature_date: None,
        geolocation: None,
    }
}
