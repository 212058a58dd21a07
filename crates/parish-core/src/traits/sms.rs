//! Outbound SMS port

use async_trait::async_trait;
use thiserror::Error;

use crate::value_objects::PhoneNumber;

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("SMS provider is not configured")]
    NotConfigured,

    #[error("SMS rejected by provider: {0}")]
    Rejected(String),

    #[error("SMS transport error: {0}")]
    Transport(String),
}

/// Delivers a text message and returns the provider's message id
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<String, SmsError>;
}
