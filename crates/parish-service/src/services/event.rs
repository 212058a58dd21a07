//! Event service
//!
//! Creates recurring series, lists and reads events, and cascades updates
//! and deletions through a series.

use std::collections::HashMap;

use parish_core::calendar::{parse_date, parse_time};
use parish_core::{
    AssignmentQuery, Capabilities, DomainError, Event, EventChanges, EventId, EventQuery,
    EventSeries, EventTemplate, RecurrenceRule, SlotId, SlotTemplate, UserId,
};
use tracing::{info, instrument, warn};

use crate::dto::{
    ChildEventResponse, CreateEventRequest, EventDeleteResponse, EventDetailResponse,
    EventListItem, EventResponse, EventSeriesResponse, EventUpdateResponse, ListEventsQuery,
    SlotAssigneeResponse, SlotDetailResponse, SlotResponse, UpdateEventRequest, UserSummary,
};

use super::context::ServiceContext;
use super::error::{CascadeFailure, ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Parse an optional `YYYY-MM-DD` string
pub(crate) fn parse_optional_date(
    value: Option<&str>,
) -> Result<Option<chrono::NaiveDate>, DomainError> {
    value.map(parse_date).transpose()
}

/// Event service
pub struct EventService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventService<'a> {
    /// Create a new EventService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an event, expanding its recurrence into one row per occurrence
    ///
    /// Every occurrence receives its own copy of the requested slots. The
    /// whole series is written in one store transaction.
    #[instrument(skip(self, request))]
    pub async fn create_event(
        &self,
        actor_id: UserId,
        request: CreateEventRequest,
    ) -> ServiceResult<EventSeriesResponse> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::MANAGE_SCHEDULE)
            .await?;

        let template = EventTemplate {
            title: request.title,
            description: request.description,
            event_type: request.event_type,
            start_time: parse_time(&request.start_time)?,
            end_time: request.end_time.as_deref().map(parse_time).transpose()?,
            location: request.location,
        };
        let start = parse_date(&request.event_date)?;
        let rule = RecurrenceRule::new(
            request.recurrence_type,
            parse_optional_date(request.recurrence_end_date.as_deref())?,
        );
        let slot_templates = request
            .slots
            .into_iter()
            .map(|slot| SlotTemplate::new(slot.name, slot.capacity, slot.notes))
            .collect::<Result<Vec<_>, _>>()?;

        let series = EventSeries::materialize(&template, start, rule, &slot_templates, actor_id)?;
        self.ctx.event_repo().create_series(&series).await?;

        info!(
            event_id = %series.parent.id,
            instances = series.event_count(),
            slots = series.slots.len(),
            "Event series created"
        );

        Ok(EventSeriesResponse {
            event: EventResponse::from(&series.parent),
            instances_created: series.event_count(),
            slots_created: series.slots.len(),
        })
    }

    /// List events in date order with their slots' occupancy
    #[instrument(skip(self, query))]
    pub async fn list_events(
        &self,
        actor_id: UserId,
        query: ListEventsQuery,
    ) -> ServiceResult<Vec<EventListItem>> {
        PermissionService::new(self.ctx).actor(actor_id).await?;

        let events = self
            .ctx
            .event_repo()
            .find(&EventQuery {
                from: parse_optional_date(query.start_date.as_deref())?,
                to: parse_optional_date(query.end_date.as_deref())?,
                event_type: query.event_type,
                limit: None,
            })
            .await?;

        let event_ids: Vec<EventId> = events.iter().map(|e| e.id).collect();
        let slots = self.ctx.slot_repo().find_by_events(&event_ids).await?;
        let slot_ids: Vec<SlotId> = slots.iter().map(|s| s.id).collect();
        let assignments = self.ctx.assignment_repo().find_by_slots(&slot_ids).await?;

        let mut counts: HashMap<SlotId, usize> = HashMap::new();
        for assignment in &assignments {
            *counts.entry(assignment.slot_id).or_default() += 1;
        }

        let mut slots_by_event: HashMap<EventId, Vec<SlotResponse>> = HashMap::new();
        for slot in &slots {
            let assigned = counts.get(&slot.id).copied().unwrap_or(0);
            slots_by_event
                .entry(slot.event_id)
                .or_default()
                .push(SlotResponse::with_count(slot, assigned));
        }

        Ok(events
            .iter()
            .map(|event| EventListItem {
                event: EventResponse::from(event),
                slots: slots_by_event.remove(&event.id).unwrap_or_default(),
            })
            .collect())
    }

    /// Get one event with its slots, who fills them, and its occurrences
    #[instrument(skip(self))]
    pub async fn get_event(
        &self,
        actor_id: UserId,
        event_id: EventId,
    ) -> ServiceResult<EventDetailResponse> {
        PermissionService::new(self.ctx).actor(actor_id).await?;

        let event = self.get_event_entity(event_id).await?;
        let slots = self.ctx.slot_repo().find_by_event(event_id).await?;
        let details = self
            .ctx
            .assignment_repo()
            .find_details_by_query(&AssignmentQuery {
                event_id: Some(event_id),
                ..Default::default()
            })
            .await?;

        let mut by_slot: HashMap<SlotId, Vec<SlotAssigneeResponse>> = HashMap::new();
        for detail in &details {
            by_slot
                .entry(detail.slot.id)
                .or_default()
                .push(SlotAssigneeResponse {
                    assignment_id: detail.assignment.id,
                    user: UserSummary::from(&detail.user),
                    notes: detail.assignment.notes.clone(),
                });
        }

        let slots = slots
            .iter()
            .map(|slot| {
                let assignments = by_slot.remove(&slot.id).unwrap_or_default();
                SlotDetailResponse {
                    slot: SlotResponse::with_count(slot, assignments.len()),
                    assignments,
                }
            })
            .collect();

        let children: Vec<ChildEventResponse> = if event.is_series_parent() {
            self.ctx
                .event_repo()
                .find_children(event_id)
                .await?
                .iter()
                .map(Into::into)
                .collect()
        } else {
            Vec::new()
        };

        Ok(EventDetailResponse {
            event: EventResponse::from(&event),
            slots,
            children,
        })
    }

    /// Update an event, and optionally every occurrence generated from it
    ///
    /// Occurrences receive the template fields only, never the new date.
    /// Each occurrence is written on its own; if any write fails the error
    /// lists which occurrences were updated and which were not.
    #[instrument(skip(self, request))]
    pub async fn update_event(
        &self,
        actor_id: UserId,
        event_id: EventId,
        request: UpdateEventRequest,
    ) -> ServiceResult<EventUpdateResponse> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::MANAGE_SCHEDULE)
            .await?;

        let mut event = self.get_event_entity(event_id).await?;
        let apply_to_future = request.apply_to_future;
        let changes = changes_from_request(request)?;

        event.apply(&changes);
        self.ctx.event_repo().update(&event).await?;

        let mut children_updated = 0;
        if apply_to_future && event.recurrence.is_recurring() {
            let template = changes.template_only();
            let mut succeeded = Vec::new();
            let mut failed = Vec::new();

            for mut child in self.ctx.event_repo().find_children(event_id).await? {
                child.apply(&template);
                match self.ctx.event_repo().update(&child).await {
                    Ok(()) => succeeded.push(child.id),
                    Err(e) => {
                        warn!(event_id = %child.id, error = %e, "Failed to update occurrence");
                        failed.push(CascadeFailure {
                            event_id: child.id,
                            reason: e.to_string(),
                        });
                    }
                }
            }

            if !failed.is_empty() {
                return Err(ServiceError::PartialCascade { succeeded, failed });
            }
            children_updated = succeeded.len();
        }

        info!(event_id = %event_id, children_updated, "Event updated");

        Ok(EventUpdateResponse {
            event: EventResponse::from(&event),
            children_updated,
        })
    }

    /// Delete an event, and optionally every occurrence generated from it
    ///
    /// Assignments, slots and events are removed bottom-up in one store
    /// transaction. Deleting an occurrence never touches its siblings.
    #[instrument(skip(self))]
    pub async fn delete_event(
        &self,
        actor_id: UserId,
        event_id: EventId,
        delete_future_instances: bool,
    ) -> ServiceResult<EventDeleteResponse> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::MANAGE_SCHEDULE)
            .await?;

        let event = self.get_event_entity(event_id).await?;

        let mut ids = Vec::new();
        if delete_future_instances && event.is_series_parent() {
            ids.extend(
                self.ctx
                    .event_repo()
                    .find_children(event_id)
                    .await?
                    .iter()
                    .map(|child| child.id),
            );
        }
        ids.push(event_id);

        let events_deleted = self.ctx.event_repo().delete_events(&ids).await?;

        info!(event_id = %event_id, events_deleted, "Event deleted");

        Ok(EventDeleteResponse { events_deleted })
    }

    /// Get event entity by ID
    #[instrument(skip(self))]
    pub async fn get_event_entity(&self, event_id: EventId) -> ServiceResult<Event> {
        self.ctx
            .event_repo()
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Event", event_id.to_string()))
    }
}

fn changes_from_request(request: UpdateEventRequest) -> Result<EventChanges, DomainError> {
    Ok(EventChanges {
        title: request.title,
        description: request.description,
        event_type: request.event_type,
        event_date: request.event_date.as_deref().map(parse_date).transpose()?,
        start_time: request.start_time.as_deref().map(parse_time).transpose()?,
        end_time: request
            .end_time
            .map(|end| end.as_deref().map(parse_time).transpose())
            .transpose()?,
        location: request.location,
    })
}
