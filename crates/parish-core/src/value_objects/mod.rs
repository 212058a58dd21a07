//! Value objects - immutable types that represent domain concepts

mod ids;
mod phone;
mod recurrence;
mod reminder;
mod role;

pub use ids::{AssignmentId, EventId, IdParseError, SlotId, SmsLogId, UserId};
pub use phone::{normalize_phone, PhoneNumber};
pub use recurrence::{RecurrenceRule, RecurrenceType};
pub use reminder::{ReminderOffset, RemindersSent};
pub use role::{Capabilities, Role};
