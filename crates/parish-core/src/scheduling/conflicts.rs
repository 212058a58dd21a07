//! Double-booking detection
//!
//! Holding two assignments at the same date and start time is reported but
//! never blocked. Several slots of the same event are expected to overlap.

use crate::entities::Event;

/// Warning attached to an assignment result when the volunteer overlaps
pub const DOUBLE_BOOKING_WARNING: &str = "User may be double-booked at this time";

/// Whether holding `existing` overlaps with a new assignment at `target`
#[inline]
pub fn is_double_booked(existing: &Event, target: &Event) -> bool {
    existing.id != target.id && existing.starts_with(target)
}

/// Warnings for assigning a volunteer, who already works `held`, to `target`
pub fn booking_warnings<'a, I>(held: I, target: &Event) -> Vec<String>
where
    I: IntoIterator<Item = &'a Event>,
{
    if held.into_iter().any(|event| is_double_booked(event, target)) {
        vec![DOUBLE_BOOKING_WARNING.to_string()]
    } else {
        Vec::new()
    }
}
