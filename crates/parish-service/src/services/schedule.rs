//! Public schedule service
//!
//! Read-only view of upcoming events for anonymous visitors. Volunteers
//! appear by name only.

use std::collections::HashMap;

use chrono::NaiveDate;
use parish_core::calendar::format_time;
use parish_core::{EventId, EventQuery, SlotId, UserId};
use tracing::instrument;

use crate::dto::{
    PublicAssigneeResponse, PublicEventResponse, PublicScheduleQuery, PublicSlotResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Public schedule service
pub struct ScheduleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ScheduleService<'a> {
    /// Create a new ScheduleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Events on or after `today`, soonest first
    #[instrument(skip(self, query))]
    pub async fn upcoming(
        &self,
        today: NaiveDate,
        query: PublicScheduleQuery,
    ) -> ServiceResult<Vec<PublicEventResponse>> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let events = self
            .ctx
            .event_repo()
            .find(&EventQuery {
                from: Some(today),
                to: None,
                event_type: query.event_type,
                limit: Some(limit),
            })
            .await?;

        let event_ids: Vec<EventId> = events.iter().map(|e| e.id).collect();
        let slots = self.ctx.slot_repo().find_by_events(&event_ids).await?;
        let slot_ids: Vec<SlotId> = slots.iter().map(|s| s.id).collect();
        let assignments = self.ctx.assignment_repo().find_by_slots(&slot_ids).await?;

        let mut names: HashMap<UserId, String> = HashMap::new();
        for assignment in &assignments {
            if names.contains_key(&assignment.user_id) {
                continue;
            }
            if let Some(user) = self.ctx.user_repo().find_by_id(assignment.user_id).await? {
                names.insert(user.id, user.name);
            }
        }

        let mut assignees: HashMap<SlotId, Vec<PublicAssigneeResponse>> = HashMap::new();
        for assignment in &assignments {
            if let Some(name) = names.get(&assignment.user_id) {
                assignees
                    .entry(assignment.slot_id)
                    .or_default()
                    .push(PublicAssigneeResponse { name: name.clone() });
            }
        }

        let mut slots_by_event: HashMap<EventId, Vec<PublicSlotResponse>> = HashMap::new();
        for slot in &slots {
            let assignees = assignees.remove(&slot.id).unwrap_or_default();
            slots_by_event
                .entry(slot.event_id)
                .or_default()
                .push(PublicSlotResponse {
                    id: slot.id,
                    name: slot.name.clone(),
                    capacity: slot.capacity,
                    assigned_count: assignees.len(),
                    assignees,
                });
        }

        Ok(events
            .into_iter()
            .map(|event| PublicEventResponse {
                slots: slots_by_event.remove(&event.id).unwrap_or_default(),
                id: event.id,
                title: event.title,
                description: event.description,
                event_type: event.event_type,
                event_date: event.event_date,
                start_time: format_time(event.start_time),
                end_time: event.end_time.map(format_time),
                location: event.location,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{context, seed_user};
    use chrono::NaiveTime;
    use parish_core::{
        Assignment, AssignmentRepository, EventRepository, EventSeries, EventTemplate, EventType,
        RecurrenceRule, RecurrenceType, Role, SlotTemplate,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_upcoming_lists_future_events_with_names_only() {
        let (ctx, store) = context();
        let admin = seed_user(&store, "Ruth", "5550000001", Role::Admin).await;
        let ann = seed_user(&store, "Ann", "5550000002", Role::PeerMinister).await;

        let template = EventTemplate {
            title: "Sunday Mass".to_string(),
            description: None,
            event_type: EventType::Mass,
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            end_time: None,
            location: None,
        };
        let series = EventSeries::materialize(
            &template,
            date(2025, 1, 5),
            RecurrenceRule::new(RecurrenceType::Weekly, Some(date(2025, 1, 26))),
            &[SlotTemplate::new("Lector".to_string(), 2, None).unwrap()],
            admin.id,
        )
        .unwrap();
        store.create_series(&series).await.unwrap();

        // Third occurrence, 2025-01-19
        let slot = &series.slots[2];
        AssignmentRepository::create(&store, &Assignment::new(slot.id, ann.id, None, admin.id))
            .await
            .unwrap();

        let schedule = ScheduleService::new(&ctx)
            .upcoming(date(2025, 1, 12), PublicScheduleQuery::default())
            .await
            .unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].event_date, date(2025, 1, 12));
        assert_eq!(schedule[1].slots[0].assigned_count, 1);
        assert_eq!(schedule[1].slots[0].assignees[0].name, "Ann");

        let json = serde_json::to_value(&schedule[1]).unwrap();
        assert!(json["slots"][0]["assignees"][0].get("phone").is_none());
    }

    #[tokio::test]
    async fn test_upcoming_respects_limit_and_type() {
        let (ctx, store) = context();
        let admin = seed_user(&store, "Ruth", "5550000001", Role::Admin).await;
        let template = EventTemplate {
            title: "Adoration".to_string(),
            description: None,
            event_type: EventType::Other,
            start_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            end_time: None,
            location: None,
        };
        let series = EventSeries::materialize(
            &template,
            date(2025, 1, 1),
            RecurrenceRule::new(RecurrenceType::Daily, Some(date(2025, 1, 10))),
            &[],
            admin.id,
        )
        .unwrap();
        store.create_series(&series).await.unwrap();
        let service = ScheduleService::new(&ctx);

        let limited = service
            .upcoming(
                date(2025, 1, 1),
                PublicScheduleQuery {
                    event_type: None,
                    limit: Some(3),
                },
            )
            .await
            .unwrap();
        assert_eq!(limited.len(), 3);

        let masses = service
            .upcoming(
                date(2025, 1, 1),
                PublicScheduleQuery {
                    event_type: Some(EventType::Mass),
                    limit: None,
                },
            )
            .await
            .unwrap();
        assert!(masses.is_empty());
    }
}
