use std::env;
use std::time::Duration;

/// Connection and retry settings for the WhatsApp messaging API.
///
/// Always passed in explicitly so tests can point the dispatcher at a fake
/// endpoint; `from_env` is only used by the server bootstrap.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Base URL of the messaging API, without a trailing slash.
    pub base_url: String,
    pub api_key: String,
    /// Name of the connected WhatsApp instance.
    pub instance: String,
    /// Base URL embedded in contract links sent to clients.
    pub contract_link_base: String,
    /// Total attempts per dispatch, including the first.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub retry_delay: Duration,
}

const DEFAULT_LINK_BASE: &str = "https://sistema-rastreamento.com.br";
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

impl WhatsAppConfig {
    /// Read the configuration from the environment.
    ///
    /// `WHATSAPP_BASE_URL`, `WHATSAPP_API_KEY` and `WHATSAPP_INSTANCE` are
    /// required; `CONTRACT_LINK_BASE` is optional.
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("WHATSAPP_BASE_URL")
            .map_err(|_| "WHATSAPP_BASE_URL must be set".to_string())?;
        let api_key = env::var("WHATSAPP_API_KEY")
            .map_err(|_| "WHATSAPP_API_KEY must be set".to_string())?;
        let instance = env::var("WHATSAPP_INSTANCE")
            .map_err(|_| "WHATSAPP_INSTANCE must be set".to_string())?;
        let contract_link_base =
            env::var("CONTRACT_LINK_BASE").unwrap_or_else(|_| DEFAULT_LINK_BASE.to_string());

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            instance,
            contract_link_base: contract_link_base.trim_end_matches('/').to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Configuration for tests: local endpoints, default retry policy.
    pub fn for_tests(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: "test-key".to_string(),
            instance: "test-instance".to_string(),
            contract_link_base: DEFAULT_LINK_BASE.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}
