//! Event model -> entity mapper

use parish_core::{DomainError, Event, EventId, RecurrenceRule, UserId};

use super::parse_column;
use crate::models::EventModel;

impl TryFrom<EventModel> for Event {
    type Error = DomainError;

    fn try_from(model: EventModel) -> Result<Self, Self::Error> {
        Ok(Event {
            id: EventId::from_uuid(model.id),
            title: model.title,
            description: model.description,
            event_type: parse_column("events.event_type", &model.event_type)?,
            event_date: model.event_date,
            start_time: model.start_time,
            end_time: model.end_time,
            location: model.location,
            recurrence: RecurrenceRule::new(
                parse_column("events.recurrence_type", &model.recurrence_type)?,
                model.recurrence_end_date,
            ),
            parent_event_id: model.parent_event_id.map(EventId::from_uuid),
            created_by: UserId::from_uuid(model.created_by),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
