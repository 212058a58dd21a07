//! Assignment service
//!
//! Places volunteers into slots, removes them, and lists who serves when.

use parish_core::{
    booking_warnings, Assignment, AssignmentDetails, AssignmentId, AssignmentQuery, Capabilities,
    DomainError, ReminderOffset, UserId,
};
use tracing::{info, instrument, warn};

use crate::dto::{
    AssignmentResponse, AssignmentResult, CreateAssignmentRequest, ListAssignmentsQuery,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::event::parse_optional_date;
use super::permission::PermissionService;

/// Assignment service
pub struct AssignmentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AssignmentService<'a> {
    /// Create a new AssignmentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Assign a volunteer to a slot
    ///
    /// A volunteer can hold a slot once. Capacity is advisory, and overlapping
    /// with another event at the same date and time only yields a warning.
    #[instrument(skip(self, request))]
    pub async fn assign(
        &self,
        actor_id: UserId,
        request: CreateAssignmentRequest,
    ) -> ServiceResult<AssignmentResult> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::MANAGE_SCHEDULE)
            .await?;

        let slot = self
            .ctx
            .slot_repo()
            .find_by_id(request.slot_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Slot", request.slot_id.to_string()))?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", request.user_id.to_string()))?;

        let existing = self.ctx.assignment_repo().find_by_slots(&[slot.id]).await?;
        if existing.iter().any(|a| a.user_id == user.id) {
            return Err(DomainError::AlreadyAssigned.into());
        }

        let event = self
            .ctx
            .event_repo()
            .find_by_id(slot.event_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Event", slot.event_id.to_string()))?;

        let held = self
            .ctx
            .assignment_repo()
            .find_user_events_on(user.id, event.event_date)
            .await?;
        let warnings = booking_warnings(&held, &event);
        if !warnings.is_empty() {
            warn!(user_id = %user.id, event_id = %event.id, "Volunteer may be double-booked");
        }

        let assignment = Assignment::new(slot.id, user.id, request.notes, actor_id);
        self.ctx.assignment_repo().create(&assignment).await?;

        info!(
            assignment_id = %assignment.id,
            slot_id = %slot.id,
            user_id = %user.id,
            "Assignment created"
        );

        Ok(AssignmentResult {
            assignment: AssignmentResponse::from(&AssignmentDetails {
                assignment,
                slot,
                event,
                user,
            }),
            warnings,
        })
    }

    /// Remove an assignment
    #[instrument(skip(self))]
    pub async fn unassign(
        &self,
        actor_id: UserId,
        assignment_id: AssignmentId,
    ) -> ServiceResult<()> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::MANAGE_SCHEDULE)
            .await?;

        self.ctx
            .assignment_repo()
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Assignment", assignment_id.to_string()))?;

        self.ctx.assignment_repo().delete(assignment_id).await?;

        info!(assignment_id = %assignment_id, "Assignment removed");

        Ok(())
    }

    /// List assignments in date order
    ///
    /// Schedulers see everyone's; anyone else only ever sees their own.
    #[instrument(skip(self, query))]
    pub async fn list_assignments(
        &self,
        actor_id: UserId,
        query: ListAssignmentsQuery,
    ) -> ServiceResult<Vec<AssignmentResponse>> {
        let actor = PermissionService::new(self.ctx).actor(actor_id).await?;

        let user_id = if actor.role.can(Capabilities::MANAGE_SCHEDULE) {
            query.user_id
        } else {
            Some(actor.id)
        };

        let details = self
            .ctx
            .assignment_repo()
            .find_details_by_query(&AssignmentQuery {
                user_id,
                event_id: query.event_id,
                from: parse_optional_date(query.start_date.as_deref())?,
                to: parse_optional_date(query.end_date.as_deref())?,
            })
            .await?;

        Ok(details.iter().map(AssignmentResponse::from).collect())
    }

    /// Whether `offset` has already been sent for an assignment
    pub async fn has_reminder_been_sent(
        &self,
        assignment_id: AssignmentId,
        offset: ReminderOffset,
    ) -> ServiceResult<bool> {
        let assignment = self
            .ctx
            .assignment_repo()
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Assignment", assignment_id.to_string()))?;
        Ok(assignment.reminder_sent(offset))
    }

    /// Record `offset` as sent; `false` when it already was
    #[instrument(skip(self))]
    pub async fn mark_reminder_sent(
        &self,
        assignment_id: AssignmentId,
        offset: ReminderOffset,
    ) -> ServiceResult<bool> {
        Ok(self
            .ctx
            .assignment_repo()
            .mark_reminder_sent(assignment_id, offset)
            .await?)
    }
}
