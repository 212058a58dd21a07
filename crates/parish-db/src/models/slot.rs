//! Slot database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for slots table
#[derive(Debug, Clone, FromRow)]
pub struct SlotModel {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
