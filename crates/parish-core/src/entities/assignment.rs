//! Assignment entity - links one volunteer to one slot

use chrono::{DateTime, Utc};

use crate::entities::{Event, Slot, User};
use crate::value_objects::{AssignmentId, ReminderOffset, RemindersSent, SlotId, UserId};

/// Assignment entity
///
/// The pair `(slot_id, user_id)` is unique across all assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: AssignmentId,
    pub slot_id: SlotId,
    pub user_id: UserId,
    pub notes: Option<String>,
    pub created_by: UserId,
    pub reminders_sent: RemindersSent,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(slot_id: SlotId, user_id: UserId, notes: Option<String>, created_by: UserId) -> Self {
        Self {
            id: AssignmentId::new(),
            slot_id,
            user_id,
            notes,
            created_by,
            reminders_sent: RemindersSent::new(),
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn reminder_sent(&self, offset: ReminderOffset) -> bool {
        self.reminders_sent.contains(offset)
    }
}

/// An assignment joined with everything needed to describe it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDetails {
    pub assignment: Assignment,
    pub slot: Slot,
    pub event: Event,
    pub user: User,
}
