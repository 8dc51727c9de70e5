//! Notification dispatch with a bounded retry policy.
//!
//! A dispatch is up to `max_attempts` POSTs to the messaging API with a fixed
//! pause between failed attempts. The progression is modelled as an explicit
//! state machine so the attempt cap and delay placement are testable without
//! real timers: `Attempting(n)` either succeeds, schedules `Retrying`, or
//! terminates in `Failed` after the last attempt.

use std::sync::Arc;

use serde_json::json;

use super::config::WhatsAppConfig;
use super::transport::{Delay, HttpTransport, TokioDelay, WhatsAppTransport};
use super::{AttemptError, DispatchError};
use crate::phone;

/// Successful dispatch outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// How many attempts the dispatch took, 1-based.
    pub attempts: u32,
}

/// One step of a dispatch in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DispatchState {
    Attempting(u32),
    Retrying { completed: u32, last_error: AttemptError },
    Succeeded { attempts: u32 },
    Failed { attempts: u32, last_error: AttemptError },
}

impl DispatchState {
    /// Transition after attempt `attempt` failed with `error`.
    fn after_failure(attempt: u32, error: AttemptError, max_attempts: u32) -> Self {
        if attempt >= max_attempts {
            DispatchState::Failed {
                attempts: attempt,
                last_error: error,
            }
        } else {
            DispatchState::Retrying {
                completed: attempt,
                last_error: error,
            }
        }
    }
}

/// Ephemeral record of a single delivery try; exists for the log line only.
#[derive(Debug)]
struct DispatchAttempt<'a> {
    phone_raw: &'a str,
    phone: &'a str,
    contract_id: Option<&'a str>,
    attempt: u32,
    max_attempts: u32,
}

/// Sends contract notifications through the configured WhatsApp instance.
pub struct NotificationDispatcher {
    config: WhatsAppConfig,
    transport: Arc<dyn WhatsAppTransport>,
    delay: Arc<dyn Delay>,
}

impl NotificationDispatcher {
    pub fn new(config: WhatsAppConfig) -> Self {
        Self::with_parts(config, Arc::new(HttpTransport::new()), Arc::new(TokioDelay))
    }

    /// Build a dispatcher with explicit transport and delay, used by tests.
    pub fn with_parts(
        config: WhatsAppConfig,
        transport: Arc<dyn WhatsAppTransport>,
        delay: Arc<dyn Delay>,
    ) -> Self {
        Self {
            config,
            transport,
            delay,
        }
    }

    fn message_url(&self) -> String {
        format!(
            "{}/message/sendText/{}",
            self.config.base_url, self.config.instance
        )
    }

    fn instance_url(&self, operation: &str) -> String {
        format!(
            "{}/instance/{}/{}",
            self.config.base_url, operation, self.config.instance
        )
    }

    /// Notify a client that their contract is ready for review.
    pub async fn send_contract_notification(
        &self,
        phone_raw: &str,
        contract_id: &str,
    ) -> Result<Delivery, DispatchError> {
        let text = format!(
            "Seu contrato de rastreamento veicular (ID: {contract_id}) está disponível \
             para visualização em: {}/contratos/{contract_id}",
            self.config.contract_link_base
        );
        self.dispatch(phone_raw, Some(contract_id), &text).await
    }

    /// Send a free-form text message through the same retry pipeline.
    pub async fn send_text(&self, phone_raw: &str, text: &str) -> Result<Delivery, DispatchError> {
        self.dispatch(phone_raw, None, text).await
    }

    async fn dispatch(
        &self,
        phone_raw: &str,
        contract_id: Option<&str>,
        text: &str,
    ) -> Result<Delivery, DispatchError> {
        let number = phone::normalize(phone_raw);
        if !phone::is_valid(&number) {
            return Err(DispatchError::InvalidPhoneNumber(phone_raw.to_string()));
        }

        let url = self.message_url();
        let payload = json!({ "number": number, "text": text });
        let max_attempts = self.config.max_attempts.max(1);

        let mut state = DispatchState::Attempting(1);
        loop {
            state = match state {
                DispatchState::Attempting(attempt) => {
                    let record = DispatchAttempt {
                        phone_raw,
                        phone: &number,
                        contract_id,
                        attempt,
                        max_attempts,
                    };
                    log::info!(
                        "Sending WhatsApp message (attempt {}/{}) to {} (raw {:?}, contract {:?})",
                        record.attempt,
                        record.max_attempts,
                        record.phone,
                        record.phone_raw,
                        record.contract_id
                    );

                    match self
                        .transport
                        .post_json(&url, &self.config.api_key, &payload)
                        .await
                    {
                        Ok(response) if response.is_success() => DispatchState::Succeeded {
                            attempts: attempt,
                        },
                        Ok(response) => DispatchState::after_failure(
                            attempt,
                            AttemptError::Status(response.status),
                            max_attempts,
                        ),
                        Err(e) => DispatchState::after_failure(
                            attempt,
                            AttemptError::Transport(e),
                            max_attempts,
                        ),
                    }
                }
                DispatchState::Retrying {
                    completed,
                    last_error,
                } => {
                    log::warn!(
                        "WhatsApp attempt {}/{} failed ({}), retrying in {:?}",
                        completed,
                        max_attempts,
                        last_error,
                        self.config.retry_delay
                    );
                    self.delay.wait(self.config.retry_delay).await;
                    DispatchState::Attempting(completed + 1)
                }
                DispatchState::Succeeded { attempts } => {
                    log::info!("WhatsApp message delivered on attempt {}", attempts);
                    return Ok(Delivery { attempts });
                }
                DispatchState::Failed {
                    attempts,
                    last_error,
                } => {
                    log::error!(
                        "WhatsApp delivery gave up after {} attempt(s): {}",
                        attempts,
                        last_error
                    );
                    return Err(DispatchError::DeliveryFailed {
                        attempts,
                        last_error,
                    });
                }
            };
        }
    }

    /// Whether the configured instance is currently connected to WhatsApp.
    pub async fn connection_state(&self) -> Result<bool, String> {
        let response = self
            .transport
            .get_json(&self.instance_url("connectionState"), &self.config.api_key)
            .await?;

        let body = &response.body;
        let connected = body["state"] == "CONNECTED"
            || body["connected"] == true
            || body["isConnected"] == true;
        Ok(connected)
    }

    /// Fetch a pairing QR code for the configured instance.
    ///
    /// Returns the QR payload from the response body when present, or the
    /// instance QR URL as a fallback; `None` when the API refused the request.
    pub async fn qr_code(&self) -> Result<Option<String>, String> {
        let url = self.instance_url("qr");
        let response = self.transport.get_json(&url, &self.config.api_key).await?;

        if !response.is_success() {
            return Ok(None);
        }

        let qrcode = response.body["qrcode"]
            .as_str()
            .map(str::to_string)
            .unwrap_or(url);
        Ok(Some(qrcode))
    }

    /// Restart the configured instance; true when the API accepted it.
    pub async fn restart_instance(&self) -> Result<bool, String> {
        let response = self
            .transport
            .post_json(
                &self.instance_url("restart"),
                &self.config.api_key,
                &serde_json::Value::Null,
            )
            .await?;
        Ok(response.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_before_the_cap_schedules_a_retry() {
        let state = DispatchState::after_failure(1, AttemptError::Status(500), 3);
        assert_eq!(
            state,
            DispatchState::Retrying {
                completed: 1,
                last_error: AttemptError::Status(500),
            }
        );
    }

    #[test]
    fn failure_on_the_last_attempt_terminates() {
        let state = DispatchState::after_failure(3, AttemptError::Status(500), 3);
        assert_eq!(
            state,
            DispatchState::Failed {
                attempts: 3,
                last_error: AttemptError::Status(500),
            }
        );
    }

    #[test]
    fn single_attempt_policy_never_retries() {
        let state = DispatchState::after_failure(1, AttemptError::Transport("down".into()), 1);
        assert!(matches!(state, DispatchState::Failed { attempts: 1, .. }));
    }
}
