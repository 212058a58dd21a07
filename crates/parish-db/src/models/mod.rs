//! Database models - SQLx-compatible structs for PostgreSQL tables

mod assignment;
mod event;
mod slot;
mod sms_log;
mod user;

pub use assignment::{AssignmentDetailsModel, AssignmentModel};
pub use event::EventModel;
pub use slot::SlotModel;
pub use sms_log::SmsLogModel;
pub use user::UserModel;
