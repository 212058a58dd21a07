//! # parish-service
//!
//! Application layer containing the scheduling use cases, reminder
//! dispatch, SMS delivery adapters and DTOs.

pub mod dto;
pub mod services;
pub mod sms;

pub use dto::*;
pub use services::*;
pub use sms::{LoggingSmsSender, TwilioSmsSender};
