//! SMS delivery adapters
//!
//! Implementations of the `SmsSender` port: a Twilio REST client for
//! production and a log-only sender for development and tests.

mod logging;
mod twilio;

pub use logging::LoggingSmsSender;
pub use twilio::TwilioSmsSender;
