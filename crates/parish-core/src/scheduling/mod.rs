//! Scheduling rules: recurrence expansion and booking conflicts

mod conflicts;
mod expander;

pub use conflicts::{booking_warnings, is_double_booked, DOUBLE_BOOKING_WARNING};
pub use expander::{expand, EventSeries};
