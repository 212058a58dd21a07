//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path ids and query strings.

mod auth;
mod cron;
mod path;
mod query;
mod validated;

pub use auth::AuthUser;
pub use cron::CronAuth;
pub use path::IdPath;
pub use query::QueryParams;
pub use validated::ValidatedJson;
