//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod assignment;
pub mod context;
pub mod error;
pub mod event;
pub mod permission;
pub mod reminder;
pub mod schedule;
pub mod slot;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

// Re-export all services for convenience
pub use assignment::AssignmentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{CascadeFailure, ServiceError, ServiceResult};
pub use event::EventService;
pub use permission::PermissionService;
pub use reminder::{reminder_text, ReminderService};
pub use schedule::ScheduleService;
pub use slot::SlotService;
pub use user::UserService;
