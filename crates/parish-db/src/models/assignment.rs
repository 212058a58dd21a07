//! Assignment database models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for assignments table
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentModel {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub user_id: Uuid,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub reminders_sent: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

/// Assignment joined with its slot, event and volunteer
///
/// Column aliases are prefixed by table (`a_`, `s_`, `e_`, `u_`).
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentDetailsModel {
    pub a_id: Uuid,
    pub a_notes: Option<String>,
    pub a_created_by: Uuid,
    pub a_reminders_sent: Vec<i32>,
    pub a_created_at: DateTime<Utc>,

    pub s_id: Uuid,
    pub s_name: String,
    pub s_capacity: i32,
    pub s_notes: Option<String>,
    pub s_created_at: DateTime<Utc>,

    pub e_id: Uuid,
    pub e_title: String,
    pub e_description: Option<String>,
    pub e_event_type: String,
    pub e_event_date: NaiveDate,
    pub e_start_time: NaiveTime,
    pub e_end_time: Option<NaiveTime>,
    pub e_location: Option<String>,
    pub e_recurrence_type: String,
    pub e_recurrence_end_date: Option<NaiveDate>,
    pub e_parent_event_id: Option<Uuid>,
    pub e_created_by: Uuid,
    pub e_created_at: DateTime<Utc>,
    pub e_updated_at: DateTime<Utc>,

    pub u_id: Uuid,
    pub u_name: String,
    pub u_phone: String,
    pub u_email: Option<String>,
    pub u_role: String,
    pub u_is_active: bool,
    pub u_notifications_enabled: bool,
    pub u_created_at: DateTime<Utc>,
    pub u_updated_at: DateTime<Utc>,
}
