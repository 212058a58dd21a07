//! Test fixtures and request builders
//!
//! Request bodies are written out here rather than borrowed from the service
//! crate so the tests pin the wire format.

use serde::Serialize;

/// Slot definition inside an event request
#[derive(Debug, Clone, Serialize)]
pub struct SlotTemplate {
    pub name: String,
    pub capacity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SlotTemplate {
    pub fn new(name: &str, capacity: i64) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            notes: None,
        }
    }
}

/// Create event request
#[derive(Debug, Clone, Serialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub event_type: String,
    pub event_date: String,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub recurrence_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<String>,
    pub slots: Vec<SlotTemplate>,
}

impl CreateEventRequest {
    /// A single Sunday Mass at 09:30
    pub fn mass(date: &str) -> Self {
        Self {
            title: "Sunday Mass".to_string(),
            event_type: "mass".to_string(),
            event_date: date.to_string(),
            start_time: "09:30".to_string(),
            end_time: Some("10:30".to_string()),
            location: Some("Main Church".to_string()),
            recurrence_type: "none".to_string(),
            recurrence_end_date: None,
            slots: vec![SlotTemplate::new("Lector", 2), SlotTemplate::new("Greeter", 1)],
        }
    }

    /// Weekly Mass from `start` through `until`
    pub fn weekly_mass(start: &str, until: &str) -> Self {
        Self {
            recurrence_type: "weekly".to_string(),
            recurrence_end_date: Some(until.to_string()),
            ..Self::mass(start)
        }
    }
}

/// Create assignment request
#[derive(Debug, Clone, Serialize)]
pub struct CreateAssignmentRequest {
    pub slot_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateAssignmentRequest {
    pub fn new(slot_id: &str, user_id: impl ToString) -> Self {
        Self {
            slot_id: slot_id.to_string(),
            user_id: user_id.to_string(),
            notes: None,
        }
    }
}

/// Create user request
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
}

impl CreateUserRequest {
    pub fn peer(name: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            email: None,
            role: "peer_minister".to_string(),
        }
    }
}
