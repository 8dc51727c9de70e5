//! WhatsApp module - contract notification delivery over the messaging API.
//!
//! - `config` - injected endpoint/credential/retry configuration
//! - `transport` - HTTP seam (reqwest in production, mocks in tests)
//! - `dispatcher` - retry state machine and message templates
//! - `handlers` - HTTP endpoints

pub mod config;
pub mod dispatcher;
pub mod handlers;
pub mod transport;

pub use config::WhatsAppConfig;
pub use dispatcher::{Delivery, NotificationDispatcher};
pub use transport::{Delay, HttpTransport, TokioDelay, TransportResponse, WhatsAppTransport};

use thiserror::Error;

/// Failure of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Terminal outcome of a dispatch, surfaced to the caller.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The number failed validation; no request was issued.
    #[error("invalid phone number: {0}")]
    InvalidPhoneNumber(String),
    /// Every attempt failed; carries the last underlying error.
    #[error("delivery failed after {attempts} attempt(s): {last_error}")]
    DeliveryFailed {
        attempts: u32,
        #[source]
        last_error: AttemptError,
    },
}
