//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Identifiers serialize as UUID strings, dates as `YYYY-MM-DD` and
//! wall-clock times as `HH:MM`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use parish_core::{
    AssignmentId, EventId, EventType, RecurrenceType, Role, SlotId, SmsLogId, SmsMessageType,
    SmsStatus, UserId,
};
use serde::Serialize;

// ============================================================================
// User Responses
// ============================================================================

/// Full user record, for administrators and the user themselves
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    pub capabilities: Vec<&'static str>,
    pub is_active: bool,
    pub notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Just enough of a user to label an assignment
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
}

// ============================================================================
// Event Responses
// ============================================================================

/// A single event occurrence
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: EventId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_type: EventType,
    pub event_date: NaiveDate,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub recurrence_type: RecurrenceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_event_id: Option<EventId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event row in a listing, with its slots' occupancy
#[derive(Debug, Clone, Serialize)]
pub struct EventListItem {
    #[serde(flatten)]
    pub event: EventResponse,
    pub slots: Vec<SlotResponse>,
}

/// Event with its slots, the people filling them, and its generated occurrences
#[derive(Debug, Clone, Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub slots: Vec<SlotDetailResponse>,
    pub children: Vec<ChildEventResponse>,
}

/// Generated occurrence reference
#[derive(Debug, Clone, Serialize)]
pub struct ChildEventResponse {
    pub id: EventId,
    pub event_date: NaiveDate,
}

/// Outcome of creating an event and its occurrences
#[derive(Debug, Clone, Serialize)]
pub struct EventSeriesResponse {
    pub event: EventResponse,
    pub instances_created: usize,
    pub slots_created: usize,
}

/// Outcome of an event update
#[derive(Debug, Clone, Serialize)]
pub struct EventUpdateResponse {
    pub event: EventResponse,
    pub children_updated: usize,
}

/// Outcome of an event deletion
#[derive(Debug, Clone, Serialize)]
pub struct EventDeleteResponse {
    pub events_deleted: u64,
}

// ============================================================================
// Slot Responses
// ============================================================================

/// Slot with capacity figures
#[derive(Debug, Clone, Serialize)]
pub struct SlotResponse {
    pub id: SlotId,
    pub event_id: EventId,
    pub name: String,
    pub capacity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub assigned_count: usize,
    pub is_full: bool,
    pub is_overbooked: bool,
    pub open_spots: usize,
    pub created_at: DateTime<Utc>,
}

/// Slot with the assignments filling it
#[derive(Debug, Clone, Serialize)]
pub struct SlotDetailResponse {
    #[serde(flatten)]
    pub slot: SlotResponse,
    pub assignments: Vec<SlotAssigneeResponse>,
}

/// One person filling a slot
#[derive(Debug, Clone, Serialize)]
pub struct SlotAssigneeResponse {
    pub assignment_id: AssignmentId,
    pub user: UserSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ============================================================================
// Assignment Responses
// ============================================================================

/// Assignment resolved to its slot, event and volunteer
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResponse {
    pub id: AssignmentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_by: UserId,
    pub reminders_sent: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub slot: AssignmentSlotSummary,
    pub event: AssignmentEventSummary,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentSlotSummary {
    pub id: SlotId,
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentEventSummary {
    pub id: EventId,
    pub title: String,
    pub event_type: EventType,
    pub event_date: NaiveDate,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Newly created assignment plus any non-blocking warnings
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResult {
    pub assignment: AssignmentResponse,
    pub warnings: Vec<String>,
}

// ============================================================================
// Reminder Responses
// ============================================================================

/// Per-offset tallies of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OffsetReport {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Totals of one reminder sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub date: Option<NaiveDate>,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Keyed by days-before
    pub by_offset: BTreeMap<i32, OffsetReport>,
}

impl SweepReport {
    pub(crate) fn record(&mut self, offset: i32, outcome: DispatchOutcome) {
        let entry = self.by_offset.entry(offset).or_default();
        match outcome {
            DispatchOutcome::Sent => {
                entry.sent += 1;
                self.sent += 1;
            }
            DispatchOutcome::Failed => {
                entry.failed += 1;
                self.failed += 1;
            }
            DispatchOutcome::Skipped => {
                entry.skipped += 1;
                self.skipped += 1;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DispatchOutcome {
    Sent,
    Failed,
    Skipped,
}

/// Result of a manual reminder
#[derive(Debug, Clone, Serialize)]
pub struct ManualReminderResponse {
    pub assignment_id: AssignmentId,
    pub provider_id: String,
    pub message: String,
}

/// One recorded SMS attempt
#[derive(Debug, Clone, Serialize)]
pub struct SmsLogResponse {
    pub id: SmsLogId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub phone: String,
    pub message_type: SmsMessageType,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    pub status: SmsStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Public Responses
// ============================================================================

/// Upcoming event as shown to anonymous visitors
#[derive(Debug, Clone, Serialize)]
pub struct PublicEventResponse {
    pub id: EventId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_type: EventType,
    pub event_date: NaiveDate,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub slots: Vec<PublicSlotResponse>,
}

/// Slot as shown to anonymous visitors: names only, no contact details
#[derive(Debug, Clone, Serialize)]
pub struct PublicSlotResponse {
    pub id: SlotId,
    pub name: String,
    pub capacity: u32,
    pub assigned_count: usize,
    pub assignees: Vec<PublicAssigneeResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicAssigneeResponse {
    pub name: String,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    /// `None` means there is no database to check (in-memory store)
    pub fn ready(database_healthy: Option<bool>) -> Self {
        let (ready, database) = match database_healthy {
            Some(true) => (true, "healthy"),
            Some(false) => (false, "unhealthy"),
            None => (true, "in_memory"),
        };
        Self {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: database.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
