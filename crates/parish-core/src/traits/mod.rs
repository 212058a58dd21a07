//! Ports implemented by the infrastructure crates

mod repositories;
mod sms;

pub use repositories::{
    AssignmentQuery, AssignmentRepository, EventQuery, EventRepository, RepoResult,
    SlotRepository, SmsLogRepository, UserRepository,
};
pub use sms::{SmsError, SmsSender};
