//! Recurrence expansion - turns one recurring submission into dated rows

use chrono::NaiveDate;

use crate::entities::{Event, EventTemplate, Slot, SlotTemplate};
use crate::error::DomainError;
use crate::value_objects::{RecurrenceRule, UserId};

/// Expand a start date and a recurrence rule into the ordered occurrence dates
///
/// The start date is always the first element. For a recurring rule the end
/// date is required, must not precede the start, and is inclusive. A
/// non-recurring rule yields only the start date and ignores any end date.
pub fn expand(start: NaiveDate, rule: &RecurrenceRule) -> Result<Vec<NaiveDate>, DomainError> {
    if !rule.is_recurring() {
        return Ok(vec![start]);
    }

    let until = rule.until.ok_or(DomainError::MissingRecurrenceEnd)?;
    if until < start {
        return Err(DomainError::RecurrenceEndBeforeStart { start, end: until });
    }

    let mut dates = vec![start];
    for n in 1u32.. {
        let next = rule
            .kind
            .occurrence(start, n)
            .ok_or(DomainError::RecurrenceOutOfRange)?;
        if next > until {
            break;
        }
        dates.push(next);
    }
    Ok(dates)
}

/// A parent event, its generated children and every instance's slots
///
/// This is the unit written in a single store transaction.
#[derive(Debug, Clone)]
pub struct EventSeries {
    pub parent: Event,
    pub children: Vec<Event>,
    pub slots: Vec<Slot>,
}

impl EventSeries {
    /// Build the parent, one child per further occurrence, and an
    /// independent copy of `slot_templates` for each instance
    pub fn materialize(
        template: &EventTemplate,
        start: NaiveDate,
        rule: RecurrenceRule,
        slot_templates: &[SlotTemplate],
        created_by: UserId,
    ) -> Result<Self, DomainError> {
        let dates = expand(start, &rule)?;

        // A one-off event keeps no end date around
        let rule = if rule.is_recurring() {
            rule
        } else {
            RecurrenceRule::none()
        };
        let parent = Event::new(template, start, rule, created_by);
        let children: Vec<Event> = dates
            .iter()
            .skip(1)
            .map(|date| parent.child_on(*date))
            .collect();

        let slots = std::iter::once(&parent)
            .chain(children.iter())
            .flat_map(|event| {
                slot_templates
                    .iter()
                    .map(move |slot| Slot::from_template(event.id, slot))
            })
            .collect();

        Ok(Self {
            parent,
            children,
            slots,
        })
    }

    /// Number of event rows in the series
    pub fn event_count(&self) -> usize {
        1 + self.children.len()
    }

    /// Parent first, then children in date order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        std::iter::once(&self.parent).chain(self.children.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::RecurrenceType;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(kind: RecurrenceType, until: NaiveDate) -> RecurrenceRule {
        RecurrenceRule::new(kind, Some(until))
    }

    fn template() -> EventTemplate {
        EventTemplate {
            title: "Sunday Mass".to_string(),
            description: Some("10am Mass".to_string()),
            event_type: crate::entities::EventType::Mass,
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: None,
            location: Some("Main Church".to_string()),
        }
    }

    #[test]
    fn test_daily_inclusive_end() {
        let dates = expand(
            date(2025, 1, 1),
            &rule(RecurrenceType::Daily, date(2025, 1, 5)),
        )
        .unwrap();
        assert_eq!(
            dates,
            vec![
                date(2025, 1, 1),
                date(2025, 1, 2),
                date(2025, 1, 3),
                date(2025, 1, 4),
                date(2025, 1, 5),
            ]
        );
    }

    #[test]
    fn test_weekly() {
        let dates = expand(
            date(2025, 1, 1),
            &rule(RecurrenceType::Weekly, date(2025, 1, 22)),
        )
        .unwrap();
        assert_eq!(
            dates,
            vec![
                date(2025, 1, 1),
                date(2025, 1, 8),
                date(2025, 1, 15),
                date(2025, 1, 22),
            ]
        );
    }

    #[test]
    fn test_biweekly_stops_before_end() {
        let dates = expand(
            date(2025, 1, 1),
            &rule(RecurrenceType::Biweekly, date(2025, 2, 11)),
        )
        .unwrap();
        assert_eq!(dates, vec![date(2025, 1, 1), date(2025, 1, 15), date(2025, 1, 29)]);
    }

    #[test]
    fn test_none_ignores_end_date() {
        let dates = expand(
            date(2025, 1, 1),
            &rule(RecurrenceType::None, date(2024, 6, 1)),
        )
        .unwrap();
        assert_eq!(dates, vec![date(2025, 1, 1)]);

        let dates = expand(date(2025, 1, 1), &RecurrenceRule::none()).unwrap();
        assert_eq!(dates, vec![date(2025, 1, 1)]);
    }

    #[test]
    fn test_start_equal_to_end() {
        let dates = expand(
            date(2025, 3, 9),
            &rule(RecurrenceType::Monthly, date(2025, 3, 9)),
        )
        .unwrap();
        assert_eq!(dates, vec![date(2025, 3, 9)]);
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let dates = expand(
            date(2025, 1, 31),
            &rule(RecurrenceType::Monthly, date(2025, 5, 31)),
        )
        .unwrap();
        assert_eq!(
            dates,
            vec![
                date(2025, 1, 31),
                date(2025, 2, 28),
                date(2025, 3, 31),
                date(2025, 4, 30),
                date(2025, 5, 31),
            ]
        );
    }

    #[test]
    fn test_missing_end_is_rejected() {
        let result = expand(
            date(2025, 1, 1),
            &RecurrenceRule::new(RecurrenceType::Weekly, None),
        );
        assert!(matches!(result, Err(DomainError::MissingRecurrenceEnd)));
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let result = expand(
            date(2025, 1, 10),
            &rule(RecurrenceType::Daily, date(2025, 1, 9)),
        );
        assert!(matches!(
            result,
            Err(DomainError::RecurrenceEndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_sequence_properties_hold_for_every_type() {
        let start = date(2024, 11, 30);
        let until = date(2025, 9, 14);
        for kind in [
            RecurrenceType::Daily,
            RecurrenceType::Weekly,
            RecurrenceType::Biweekly,
            RecurrenceType::Monthly,
        ] {
            let dates = expand(start, &rule(kind, until)).unwrap();
            assert_eq!(dates[0], start, "{kind}");
            assert!(dates.windows(2).all(|w| w[0] < w[1]), "{kind}");

            let last = *dates.last().unwrap();
            assert!(last <= until, "{kind}");
            let next = kind.occurrence(start, dates.len() as u32).unwrap();
            assert!(next > until, "{kind}");
        }
    }

    #[test]
    fn test_materialize_series() {
        let slots = vec![
            SlotTemplate::new("Greeter".to_string(), 2, None).unwrap(),
            SlotTemplate::new("Lector".to_string(), 1, Some("First reading".to_string())).unwrap(),
        ];
        let series = EventSeries::materialize(
            &template(),
            date(2025, 1, 1),
            rule(RecurrenceType::Weekly, date(2025, 1, 22)),
            &slots,
            UserId::new(),
        )
        .unwrap();

        assert_eq!(series.event_count(), 4);
        assert_eq!(series.children.len(), 3);
        assert_eq!(series.slots.len(), 8);
        assert_eq!(series.parent.recurrence.kind, RecurrenceType::Weekly);

        for child in &series.children {
            assert_eq!(child.recurrence.kind, RecurrenceType::None);
            assert_eq!(child.parent_event_id, Some(series.parent.id));
            assert_eq!(child.template(), series.parent.template());
        }

        for event in series.events() {
            let own: Vec<_> = series.slots.iter().filter(|s| s.event_id == event.id).collect();
            assert_eq!(own.len(), 2);
            assert_eq!(own[0].name, "Greeter");
            assert_eq!(own[0].capacity, 2);
            assert_eq!(own[1].name, "Lector");
        }

        let mut ids: Vec<_> = series.slots.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_materialize_one_off() {
        let series = EventSeries::materialize(
            &template(),
            date(2025, 1, 1),
            rule(RecurrenceType::None, date(2025, 6, 1)),
            &[],
            UserId::new(),
        )
        .unwrap();
        assert_eq!(series.event_count(), 1);
        assert!(series.slots.is_empty());
        assert_eq!(series.parent.recurrence, RecurrenceRule::none());
    }

    #[test]
    fn test_materialize_rejects_bad_rule() {
        let result = EventSeries::materialize(
            &template(),
            date(2025, 1, 1),
            RecurrenceRule::new(RecurrenceType::Daily, None),
            &[],
            UserId::new(),
        );
        assert!(result.is_err());
    }
}
