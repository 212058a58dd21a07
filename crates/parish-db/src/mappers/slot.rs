//! Slot model -> entity mapper

use parish_core::{DomainError, EventId, Slot, SlotId};

use super::corrupt_column;
use crate::models::SlotModel;

impl TryFrom<SlotModel> for Slot {
    type Error = DomainError;

    fn try_from(model: SlotModel) -> Result<Self, Self::Error> {
        let capacity =
            u32::try_from(model.capacity).map_err(|_| corrupt_column("slots.capacity", model.capacity))?;
        Ok(Slot {
            id: SlotId::from_uuid(model.id),
            event_id: EventId::from_uuid(model.event_id),
            name: model.name,
            capacity,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}
