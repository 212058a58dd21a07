//! Reminder offsets and the per-assignment record of which were delivered

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How many days before an event a reminder targets
///
/// Scheduled reminders use non-negative day counts. Admin-triggered reminders
/// use [`ReminderOffset::MANUAL`], which can never collide with a real offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderOffset(i32);

impl ReminderOffset {
    /// Sentinel for manual, out-of-schedule reminders
    pub const MANUAL: Self = Self(-1);

    /// Offset for a reminder sent `days` before the event
    #[inline]
    pub const fn days_before(days: u16) -> Self {
        Self(days as i32)
    }

    /// Rebuild from the stored integer
    #[inline]
    pub const fn from_raw(value: i32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_manual(self) -> bool {
        self.0 < 0
    }

    /// Days ahead of the event, `None` for the manual sentinel
    pub fn days(self) -> Option<i64> {
        (!self.is_manual()).then_some(i64::from(self.0))
    }
}

impl fmt::Display for ReminderOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_manual() {
            f.write_str("manual")
        } else {
            write!(f, "{}d", self.0)
        }
    }
}

/// Set of offsets already delivered for one assignment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemindersSent(BTreeSet<ReminderOffset>);

impl RemindersSent {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, offset: ReminderOffset) -> bool {
        self.0.contains(&offset)
    }

    /// Record an offset; returns `false` if it was already recorded
    pub fn insert(&mut self, offset: ReminderOffset) -> bool {
        self.0.insert(offset)
    }

    /// Drop an offset; returns `false` if it was not recorded
    pub fn remove(&mut self, offset: ReminderOffset) -> bool {
        self.0.remove(&offset)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ReminderOffset> + '_ {
        self.0.iter().copied()
    }

    /// Sorted raw values, as persisted
    pub fn to_raw(&self) -> Vec<i32> {
        self.0.iter().map(|o| o.raw()).collect()
    }

    pub fn from_raw(values: impl IntoIterator<Item = i32>) -> Self {
        Self(values.into_iter().map(ReminderOffset::from_raw).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_never_equals_a_day_offset() {
        for days in [0u16, 1, 7, 30] {
            assert_ne!(ReminderOffset::days_before(days), ReminderOffset::MANUAL);
        }
        assert!(ReminderOffset::MANUAL.is_manual());
        assert_eq!(ReminderOffset::MANUAL.days(), None);
        assert_eq!(ReminderOffset::days_before(7).days(), Some(7));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut sent = RemindersSent::new();
        assert!(sent.insert(ReminderOffset::days_before(1)));
        assert!(!sent.insert(ReminderOffset::days_before(1)));
        assert!(sent.contains(ReminderOffset::days_before(1)));
        assert!(!sent.contains(ReminderOffset::days_before(7)));

        assert!(sent.remove(ReminderOffset::days_before(1)));
        assert!(!sent.remove(ReminderOffset::days_before(1)));
        assert!(sent.is_empty());
    }

    #[test]
    fn test_manual_does_not_suppress_scheduled() {
        let mut sent = RemindersSent::new();
        sent.insert(ReminderOffset::MANUAL);
        assert!(!sent.contains(ReminderOffset::days_before(1)));
    }

    #[test]
    fn test_raw_values_are_sorted() {
        let sent = RemindersSent::from_raw([7, -1, 1]);
        assert_eq!(sent.to_raw(), vec![-1, 1, 7]);
    }

    #[test]
    fn test_display() {
        assert_eq!(ReminderOffset::MANUAL.to_string(), "manual");
        assert_eq!(ReminderOffset::days_before(2).to_string(), "2d");
    }
}
