//! Slot service
//!
//! Adds, edits and removes the volunteer slots of a single event.

use parish_core::{Capabilities, Slot, SlotId, SlotTemplate, UserId};
use tracing::{info, instrument};

use crate::dto::{CreateSlotRequest, SlotResponse, UpdateSlotRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Slot service
pub struct SlotService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SlotService<'a> {
    /// Create a new SlotService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a slot to an existing event
    #[instrument(skip(self, request))]
    pub async fn create_slot(
        &self,
        actor_id: UserId,
        request: CreateSlotRequest,
    ) -> ServiceResult<SlotResponse> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::MANAGE_SCHEDULE)
            .await?;

        self.ctx
            .event_repo()
            .find_by_id(request.event_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Event", request.event_id.to_string()))?;

        let template = SlotTemplate::new(request.name, request.capacity, request.notes)?;
        let slot = Slot::from_template(request.event_id, &template);
        self.ctx.slot_repo().create(&slot).await?;

        info!(slot_id = %slot.id, event_id = %slot.event_id, "Slot created");

        Ok(SlotResponse::with_count(&slot, 0))
    }

    /// Rename a slot, change its capacity or its notes
    ///
    /// Lowering capacity below the current number of assignments is allowed;
    /// the slot then reports as overbooked.
    #[instrument(skip(self, request))]
    pub async fn update_slot(
        &self,
        actor_id: UserId,
        slot_id: SlotId,
        request: UpdateSlotRequest,
    ) -> ServiceResult<SlotResponse> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::MANAGE_SCHEDULE)
            .await?;

        let mut slot = self.get_slot_entity(slot_id).await?;

        if let Some(name) = request.name {
            slot.set_name(name);
        }
        if let Some(capacity) = request.capacity {
            slot.set_capacity(capacity)?;
        }
        if let Some(notes) = request.notes {
            slot.set_notes(notes);
        }

        self.ctx.slot_repo().update(&slot).await?;

        let assigned = self
            .ctx
            .assignment_repo()
            .find_by_slots(&[slot_id])
            .await?
            .len();

        info!(slot_id = %slot_id, "Slot updated");

        Ok(SlotResponse::with_count(&slot, assigned))
    }

    /// Delete a slot together with its assignments
    #[instrument(skip(self))]
    pub async fn delete_slot(&self, actor_id: UserId, slot_id: SlotId) -> ServiceResult<()> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::MANAGE_SCHEDULE)
            .await?;

        self.get_slot_entity(slot_id).await?;
        self.ctx.slot_repo().delete(slot_id).await?;

        info!(slot_id = %slot_id, "Slot deleted");

        Ok(())
    }

    /// Get slot entity by ID
    #[instrument(skip(self))]
    pub async fn get_slot_entity(&self, slot_id: SlotId) -> ServiceResult<Slot> {
        self.ctx
            .slot_repo()
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Slot", slot_id.to_string()))
    }
}
