//! Event entity - a dated occurrence that volunteers staff through slots

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{EventId, RecurrenceRule, RecurrenceType, UserId};

/// Kind of parish event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Mass,
    /// Children's Liturgy of the Word
    Clow,
    Volunteer,
    Ministry,
    #[default]
    Other,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mass => "mass",
            Self::Clow => "clow",
            Self::Volunteer => "volunteer",
            Self::Ministry => "ministry",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mass" => Ok(Self::Mass),
            "clow" => Ok(Self::Clow),
            "volunteer" => Ok(Self::Volunteer),
            "ministry" => Ok(Self::Ministry),
            "other" => Ok(Self::Other),
            other => Err(DomainError::ValidationError(format!("Unknown event type: {other}"))),
        }
    }
}

/// Descriptive fields shared by every occurrence of a series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTemplate {
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
}

/// Event entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub recurrence: RecurrenceRule,
    pub parent_event_id: Option<EventId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Create a standalone or parent event from a template
    pub fn new(
        template: &EventTemplate,
        event_date: NaiveDate,
        recurrence: RecurrenceRule,
        created_by: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            title: template.title.clone(),
            description: template.description.clone(),
            event_type: template.event_type,
            event_date,
            start_time: template.start_time,
            end_time: template.end_time,
            location: template.location.clone(),
            recurrence,
            parent_event_id: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Materialize a generated occurrence of this (parent) event
    ///
    /// Children copy every descriptive field, never carry a recurrence of
    /// their own, and point back at the parent.
    pub fn child_on(&self, event_date: NaiveDate) -> Self {
        Self {
            id: EventId::new(),
            event_date,
            recurrence: RecurrenceRule::none(),
            parent_event_id: Some(self.id),
            ..self.clone()
        }
    }

    /// Template fields of this event
    pub fn template(&self) -> EventTemplate {
        EventTemplate {
            title: self.title.clone(),
            description: self.description.clone(),
            event_type: self.event_type,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location.clone(),
        }
    }

    /// Whether this event was generated from a recurring parent
    #[inline]
    pub fn is_child(&self) -> bool {
        self.parent_event_id.is_some()
    }

    /// Whether this event heads a recurring series
    #[inline]
    pub fn is_series_parent(&self) -> bool {
        self.parent_event_id.is_none() && self.recurrence.kind != RecurrenceType::None
    }

    /// Same calendar date and same start time as `other`
    #[inline]
    pub fn starts_with(&self, other: &Event) -> bool {
        self.event_date == other.event_date && self.start_time == other.start_time
    }

    /// Apply a set of changes and bump `updated_at`
    pub fn apply(&mut self, changes: &EventChanges) {
        if let Some(title) = &changes.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &changes.description {
            self.description.clone_from(description);
        }
        if let Some(event_type) = changes.event_type {
            self.event_type = event_type;
        }
        if let Some(event_date) = changes.event_date {
            self.event_date = event_date;
        }
        if let Some(start_time) = changes.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = changes.end_time {
            self.end_time = end_time;
        }
        if let Some(location) = &changes.location {
            self.location.clone_from(location);
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update of an event
///
/// Outer `None` leaves a field untouched; for nullable fields an inner
/// `None` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub event_type: Option<EventType>,
    pub event_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<Option<NaiveTime>>,
    pub location: Option<Option<String>>,
}

impl EventChanges {
    /// The subset of changes that may propagate to generated occurrences
    ///
    /// Each occurrence's date is what distinguishes it, so the date is
    /// always dropped.
    pub fn template_only(&self) -> Self {
        Self {
            event_date: None,
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
