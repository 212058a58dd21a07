//! Slot entity - a named, capacity-bounded role within one event

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{EventId, SlotId};

/// Name, capacity and notes of a slot, before it belongs to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTemplate {
    pub name: String,
    pub capacity: u32,
    pub notes: Option<String>,
}

impl SlotTemplate {
    pub fn new(name: String, capacity: i64, notes: Option<String>) -> Result<Self, DomainError> {
        Ok(Self {
            name,
            capacity: validate_capacity(capacity)?,
            notes,
        })
    }
}

/// Slot entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: SlotId,
    pub event_id: EventId,
    pub name: String,
    pub capacity: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    /// Create a slot owned by `event_id`
    pub fn from_template(event_id: EventId, template: &SlotTemplate) -> Self {
        Self {
            id: SlotId::new(),
            event_id,
            name: template.name.clone(),
            capacity: template.capacity,
            notes: template.notes.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Update capacity; must stay at least 1
    pub fn set_capacity(&mut self, capacity: i64) -> Result<(), DomainError> {
        self.capacity = validate_capacity(capacity)?;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    /// Occupancy given the number of current assignments
    pub fn occupancy(&self, assigned: usize) -> SlotOccupancy {
        SlotOccupancy {
            capacity: self.capacity,
            assigned,
        }
    }
}

/// Largest capacity a slot may have; the store keeps it in a 32-bit column
pub const MAX_SLOT_CAPACITY: u32 = i32::MAX as u32;

fn validate_capacity(capacity: i64) -> Result<u32, DomainError> {
    u32::try_from(capacity)
        .ok()
        .filter(|c| (1..=MAX_SLOT_CAPACITY).contains(c))
        .ok_or(DomainError::InvalidCapacity(capacity))
}

/// Assigned count against capacity
///
/// Capacity is advisory: nothing prevents `assigned` from exceeding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotOccupancy {
    pub capacity: u32,
    pub assigned: usize,
}

impl SlotOccupancy {
    #[inline]
    pub fn is_full(&self) -> bool {
        self.assigned >= self.capacity as usize
    }

    #[inline]
    pub fn is_overbooked(&self) -> bool {
        self.assigned > self.capacity as usize
    }

    #[inline]
    pub fn open_spots(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.assigned)
    }
}
