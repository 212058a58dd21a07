//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use parish_core::calendar::format_time;
use parish_core::{AssignmentDetails, Event, Slot, SmsLogEntry, User};

use super::responses::{
    AssignmentEventSummary, AssignmentResponse, AssignmentSlotSummary, ChildEventResponse,
    EventResponse, PublicAssigneeResponse, SlotResponse, SmsLogResponse, UserResponse,
    UserSummary,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            phone: user.phone.as_str().to_string(),
            email: user.email.clone(),
            role: user.role,
            capabilities: user.role.capabilities().list(),
            is_active: user.is_active,
            notifications_enabled: user.notifications_enabled,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

impl From<&User> for PublicAssigneeResponse {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
        }
    }
}

// ============================================================================
// Event Mappers
// ============================================================================

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            event_type: event.event_type,
            event_date: event.event_date,
            start_time: format_time(event.start_time),
            end_time: event.end_time.map(format_time),
            location: event.location.clone(),
            recurrence_type: event.recurrence.kind,
            recurrence_end_date: event.recurrence.until,
            parent_event_id: event.parent_event_id,
            created_by: event.created_by,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self::from(&event)
    }
}

impl From<&Event> for ChildEventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            event_date: event.event_date,
        }
    }
}

impl From<&Event> for AssignmentEventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            event_type: event.event_type,
            event_date: event.event_date,
            start_time: format_time(event.start_time),
            end_time: event.end_time.map(format_time),
            location: event.location.clone(),
        }
    }
}

// ============================================================================
// Slot Mappers
// ============================================================================

impl SlotResponse {
    /// Build a slot response given how many assignments fill it
    pub fn with_count(slot: &Slot, assigned: usize) -> Self {
        let occupancy = slot.occupancy(assigned);
        Self {
            id: slot.id,
            event_id: slot.event_id,
            name: slot.name.clone(),
            capacity: slot.capacity,
            notes: slot.notes.clone(),
            assigned_count: assigned,
            is_full: occupancy.is_full(),
            is_overbooked: occupancy.is_overbooked(),
            open_spots: occupancy.open_spots(),
            created_at: slot.created_at,
        }
    }
}

impl From<&Slot> for AssignmentSlotSummary {
    fn from(slot: &Slot) -> Self {
        Self {
            id: slot.id,
            name: slot.name.clone(),
            capacity: slot.capacity,
        }
    }
}

// ============================================================================
// Assignment Mappers
// ============================================================================

impl From<&AssignmentDetails> for AssignmentResponse {
    fn from(details: &AssignmentDetails) -> Self {
        let assignment = &details.assignment;
        Self {
            id: assignment.id,
            notes: assignment.notes.clone(),
            created_by: assignment.created_by,
            reminders_sent: assignment.reminders_sent.to_raw(),
            created_at: assignment.created_at,
            slot: AssignmentSlotSummary::from(&details.slot),
            event: AssignmentEventSummary::from(&details.event),
            user: UserSummary::from(&details.user),
        }
    }
}

impl From<AssignmentDetails> for AssignmentResponse {
    fn from(details: AssignmentDetails) -> Self {
        Self::from(&details)
    }
}

// ============================================================================
// SMS Log Mappers
// ============================================================================

impl From<SmsLogEntry> for SmsLogResponse {
    fn from(entry: SmsLogEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            phone: entry.phone.as_str().to_string(),
            message_type: entry.message_type,
            body: entry.body,
            provider_id: entry.provider_id,
            status: entry.status,
            created_at: entry.created_at,
        }
    }
}
