//! SMS log entry - one row per delivery attempt

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PhoneNumber, SmsLogId, UserId};

/// Why a message was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsMessageType {
    Reminder,
    Verification,
    AdminAlert,
}

impl SmsMessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::Verification => "verification",
            Self::AdminAlert => "admin_alert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reminder" => Some(Self::Reminder),
            "verification" => Some(Self::Verification),
            "admin_alert" => Some(Self::AdminAlert),
            _ => None,
        }
    }
}

/// Outcome of a delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsStatus {
    Sent,
    Failed,
}

impl SmsStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(Self::Sent),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsLogEntry {
    pub id: SmsLogId,
    pub user_id: Option<UserId>,
    pub phone: PhoneNumber,
    pub message_type: SmsMessageType,
    pub body: String,
    /// Identifier returned by the provider on success
    pub provider_id: Option<String>,
    pub status: SmsStatus,
    pub created_at: DateTime<Utc>,
}

impl SmsLogEntry {
    /// Record the outcome of sending `body` to `phone`
    pub fn record(
        user_id: Option<UserId>,
        phone: PhoneNumber,
        message_type: SmsMessageType,
        body: String,
        provider_id: Option<String>,
    ) -> Self {
        let status = if provider_id.is_some() {
            SmsStatus::Sent
        } else {
            SmsStatus::Failed
        };
        Self {
            id: SmsLogId::new(),
            user_id,
            phone,
            message_type,
            body,
            provider_id,
            status,
            created_at: Utc::now(),
        }
    }
}
