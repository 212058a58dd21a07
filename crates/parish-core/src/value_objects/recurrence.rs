//! Recurrence rules for events

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::DomainError;

/// How often an event repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    #[default]
    None,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl RecurrenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }

    #[inline]
    pub fn is_recurring(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Date of the `n`-th occurrence counted from `start` (occurrence 0)
    ///
    /// Monthly occurrences are anchored to the start date and clamped to the
    /// last day of shorter months, so a series starting Jan 31 continues
    /// Feb 28, Mar 31, Apr 30. Returns `None` for `RecurrenceType::None`
    /// when `n > 0`, or when the date leaves chrono's range.
    pub fn occurrence(self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            Self::None => (n == 0).then_some(start),
            Self::Daily => calendar::add_days(start, i64::from(n)),
            Self::Weekly => calendar::add_weeks(start, i64::from(n)),
            Self::Biweekly => calendar::add_weeks(start, 2 * i64::from(n)),
            Self::Monthly => calendar::add_months(start, n),
        }
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(DomainError::ValidationError(format!(
                "Unknown recurrence type: {other}"
            ))),
        }
    }
}

/// Recurrence type plus the inclusive date the series stops at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecurrenceRule {
    pub kind: RecurrenceType,
    pub until: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn new(kind: RecurrenceType, until: Option<NaiveDate>) -> Self {
        Self { kind, until }
    }

    /// A one-off event
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_recurring(&self) -> bool {
        self.kind.is_recurring()
    }
}
