//! Phone number value object
//!
//! Numbers are stored in E.164-like form so that "(555) 123-4567" and
//! "555.123.4567" map to the same unique key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Normalize a user-entered phone number
///
/// Non-digits are stripped. Ten digits are treated as a North American
/// number and get `+1`; eleven digits with a leading `1` get `+`; anything
/// else is prefixed with `+` as-is.
pub fn normalize_phone(raw: &str) -> Result<String, DomainError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return Err(DomainError::InvalidPhone(raw.to_string()));
    }

    Ok(match digits.len() {
        10 => format!("+1{digits}"),
        11 if digits.starts_with('1') => format!("+{digits}"),
        _ => format!("+{digits}"),
    })
}

/// A normalized phone number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse and normalize raw input
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        normalize_phone(raw).map(Self)
    }

    /// Wrap a value that was normalized before it was stored
    pub fn from_normalized(value: String) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
