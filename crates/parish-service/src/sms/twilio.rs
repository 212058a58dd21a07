//! Twilio REST API sender

use async_trait::async_trait;
use parish_common::TwilioConfig;
use parish_core::traits::{SmsError, SmsSender};
use parish_core::PhoneNumber;
use serde::Deserialize;
use tracing::{debug, instrument};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Sends messages through Twilio's Messages resource
pub struct TwilioSmsSender {
    config: TwilioConfig,
    api_base: String,
    client: reqwest::Client,
}

impl TwilioSmsSender {
    /// Create a sender for the given account
    pub fn new(config: TwilioConfig) -> Self {
        Self::with_api_base(config, TWILIO_API_BASE)
    }

    /// Create a sender that talks to a different API host
    pub fn with_api_base(config: TwilioConfig, api_base: impl Into<String>) -> Self {
        Self {
            config,
            api_base: api_base.into(),
            client: reqwest::Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

impl std::fmt::Debug for TwilioSmsSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioSmsSender")
            .field("config", &self.config)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct MessageCreated {
    sid: String,
}

#[derive(Deserialize)]
struct ApiFailure {
    message: Option<String>,
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    #[instrument(skip(self, body), fields(to = %to))]
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<String, SmsError> {
        let params = [
            ("To", to.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| SmsError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .json::<ApiFailure>()
                .await
                .ok()
                .and_then(|f| f.message)
                .unwrap_or_else(|| format!("provider returned status {status}"));
            return Err(SmsError::Rejected(reason));
        }

        let created: MessageCreated = response
            .json()
            .await
            .map_err(|e| SmsError::Transport(format!("Failed to parse response: {e}")))?;

        debug!(sid = %created.sid, "SMS accepted by provider");
        Ok(created.sid)
    }
}
