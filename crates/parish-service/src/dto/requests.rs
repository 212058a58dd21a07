//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Dates travel as `YYYY-MM-DD` and times as `HH:MM`; their exact shape is
//! checked when the service parses them.

use parish_core::{AssignmentId, EventId, EventType, RecurrenceType, Role, SlotId, UserId};
use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Distinguish an absent field from an explicit `null`
///
/// Absent stays `None` through `#[serde(default)]`; `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Event Requests
// ============================================================================

/// Slot definition copied onto every occurrence of a new event
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SlotTemplateRequest {
    #[validate(length(min = 1, max = 100, message = "Slot name must be 1-100 characters"))]
    pub name: String,

    #[validate(range(
        min = 1,
        max = 2_147_483_647,
        message = "Capacity must be between 1 and 2147483647"
    ))]
    #[serde(default = "default_capacity")]
    pub capacity: i64,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

fn default_capacity() -> i64 {
    1
}

/// Create event request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub event_type: EventType,

    /// First occurrence, `YYYY-MM-DD`
    pub event_date: String,

    /// `HH:MM`
    pub start_time: String,

    /// `HH:MM`
    pub end_time: Option<String>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    #[serde(default)]
    pub recurrence_type: RecurrenceType,

    /// Last date a recurring event may fall on, `YYYY-MM-DD`
    pub recurrence_end_date: Option<String>,

    #[validate(nested)]
    #[serde(default)]
    pub slots: Vec<SlotTemplateRequest>,
}

/// Update event request
///
/// Absent fields are left alone; `null` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,

    pub event_type: Option<EventType>,

    pub event_date: Option<String>,

    pub start_time: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub end_time: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,

    /// Copy the template fields to every generated occurrence as well
    #[serde(default, alias = "updateFutureInstances")]
    pub apply_to_future: bool,
}

/// Event listing filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEventsQuery {
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,

    #[serde(alias = "endDate")]
    pub end_date: Option<String>,

    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
}

/// Event deletion options
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DeleteEventQuery {
    #[serde(default, alias = "deleteFutureInstances")]
    pub delete_future_instances: bool,
}

// ============================================================================
// Slot Requests
// ============================================================================

/// Add a slot to an existing event
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSlotRequest {
    pub event_id: EventId,

    #[validate(length(min = 1, max = 100, message = "Slot name must be 1-100 characters"))]
    pub name: String,

    #[validate(range(
        min = 1,
        max = 2_147_483_647,
        message = "Capacity must be between 1 and 2147483647"
    ))]
    #[serde(default = "default_capacity")]
    pub capacity: i64,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// Update slot request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSlotRequest {
    #[validate(length(min = 1, max = 100, message = "Slot name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(range(
        min = 1,
        max = 2_147_483_647,
        message = "Capacity must be between 1 and 2147483647"
    ))]
    pub capacity: Option<i64>,

    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

// ============================================================================
// Assignment Requests
// ============================================================================

/// Assign a volunteer to a slot
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    pub slot_id: SlotId,

    pub user_id: UserId,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// Assignment listing filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAssignmentsQuery {
    #[serde(alias = "userId")]
    pub user_id: Option<UserId>,

    #[serde(alias = "eventId")]
    pub event_id: Option<EventId>,

    #[serde(alias = "startDate")]
    pub start_date: Option<String>,

    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
}

// ============================================================================
// Reminder Requests
// ============================================================================

/// Send a reminder for one assignment right now
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendReminderRequest {
    #[serde(alias = "assignmentId")]
    pub assignment_id: AssignmentId,

    /// Replaces the standard reminder text
    #[validate(length(min = 1, max = 1600, message = "Message must be 1-1600 characters"))]
    #[serde(alias = "customMessage")]
    pub custom_message: Option<String>,
}

/// Sweep options
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SweepQuery {
    /// Run as if today were this date, `YYYY-MM-DD`
    pub date: Option<String>,
}

/// SMS log listing options
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SmsLogQuery {
    pub limit: Option<i64>,
}

// ============================================================================
// User Requests
// ============================================================================

/// Create user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 10, max = 20, message = "Valid phone number required"))]
    pub phone: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default)]
    pub role: Role,
}

/// Update profile fields of a user
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(alias = "notificationsEnabled")]
    pub notifications_enabled: Option<bool>,
}

/// Change a user's role
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

/// Activate or deactivate a user
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct SetActiveRequest {
    #[serde(alias = "isActive")]
    pub is_active: bool,
}

/// User listing filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
    pub active: Option<bool>,
    /// Case-insensitive match on name, or substring of the phone number
    pub search: Option<String>,
}

// ============================================================================
// Public Requests
// ============================================================================

/// Public schedule options
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicScheduleQuery {
    #[serde(alias = "eventType")]
    pub event_type: Option<EventType>,
    pub limit: Option<i64>,
}
