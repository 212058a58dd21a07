//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in parish-core.
//! Each repository handles database operations for a specific domain entity.

mod assignment;
mod error;
mod event;
mod slot;
mod sms_log;
mod user;

pub use assignment::PgAssignmentRepository;
pub use event::PgEventRepository;
pub use slot::PgSlotRepository;
pub use sms_log::PgSmsLogRepository;
pub use user::PgUserRepository;
