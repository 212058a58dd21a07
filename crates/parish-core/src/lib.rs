//! # parish-core
//!
//! Domain layer for parish ministry scheduling: entities, value objects,
//! recurrence expansion, booking rules and the repository/SMS ports.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod calendar;
pub mod entities;
pub mod error;
pub mod scheduling;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Assignment, AssignmentDetails, Event, EventChanges, EventTemplate, EventType, Slot,
    SlotOccupancy, SlotTemplate, SmsLogEntry, SmsMessageType, SmsStatus, User,
};
pub use error::DomainError;
pub use scheduling::{booking_warnings, expand, EventSeries, DOUBLE_BOOKING_WARNING};
pub use traits::{
    AssignmentQuery, AssignmentRepository, EventQuery, EventRepository, RepoResult,
    SlotRepository, SmsError, SmsLogRepository, SmsSender, UserRepository,
};
pub use value_objects::{
    AssignmentId, Capabilities, EventId, IdParseError, PhoneNumber, RecurrenceRule,
    RecurrenceType, ReminderOffset, RemindersSent, Role, SlotId, SmsLogId, UserId,
};
