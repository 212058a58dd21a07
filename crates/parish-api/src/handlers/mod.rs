//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod assignments;
pub mod events;
pub mod health;
pub mod public;
pub mod reminders;
pub mod slots;
pub mod users;
