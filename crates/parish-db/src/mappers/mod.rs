//! Model to entity mappers
//!
//! Rows are converted with `TryFrom<Model> for Entity`. Enumerated columns
//! are stored as text, so a value outside the known set is reported as a
//! database error instead of being silently defaulted.

mod assignment;
mod event;
mod slot;
mod sms_log;
mod user;

use std::str::FromStr;

use parish_core::DomainError;

/// Parse a text column into its domain enum
fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr,
{
    value
        .parse()
        .map_err(|_| corrupt_column(column, value))
}

fn corrupt_column(column: &str, value: impl std::fmt::Display) -> DomainError {
    DomainError::DatabaseError(format!("unexpected value in {column}: {value}"))
}
