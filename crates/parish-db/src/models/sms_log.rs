//! SMS log database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for sms_log table
#[derive(Debug, Clone, FromRow)]
pub struct SmsLogModel {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub phone: String,
    pub message_type: String,
    pub message_body: String,
    pub provider_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
