//! Domain entities - core business objects

mod assignment;
mod event;
mod slot;
mod sms_log;
mod user;

pub use assignment::{Assignment, AssignmentDetails};
pub use event::{Event, EventChanges, EventTemplate, EventType};
pub use slot::{Slot, SlotOccupancy, SlotTemplate, MAX_SLOT_CAPACITY};
pub use sms_log::{SmsLogEntry, SmsMessageType, SmsStatus};
pub use user::User;
