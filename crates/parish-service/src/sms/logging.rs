//! Log-only SMS sender

use async_trait::async_trait;
use parish_core::traits::{SmsError, SmsSender};
use parish_core::PhoneNumber;
use tracing::info;

/// Provider id reported for messages that were only logged
pub const DEV_PROVIDER_ID: &str = "dev-sid";

/// Writes messages to the log instead of delivering them
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSmsSender;

#[async_trait]
impl SmsSender for LoggingSmsSender {
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<String, SmsError> {
        info!(to = %to, body, "SMS (not sent, no provider configured)");
        Ok(DEV_PROVIDER_ID.to_string())
    }
}
