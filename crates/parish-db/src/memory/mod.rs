//! In-memory Entity Store
//!
//! Implements every repository trait over plain maps behind a single
//! `parking_lot::RwLock`. Each operation takes the lock once, so multi-row
//! writes are atomic exactly like their PostgreSQL counterparts. The
//! `(slot, user)` uniqueness and bottom-up deletion rules are enforced here
//! the same way the schema enforces them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use parish_core::traits::{
    AssignmentQuery, AssignmentRepository, EventQuery, EventRepository, RepoResult,
    SlotRepository, SmsLogRepository, UserRepository,
};
use parish_core::{
    Assignment, AssignmentDetails, AssignmentId, DomainError, Event, EventId, EventSeries,
    PhoneNumber, ReminderOffset, Role, Slot, SlotId, SmsLogEntry, User, UserId,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    events: HashMap<EventId, Event>,
    slots: HashMap<SlotId, Slot>,
    assignments: HashMap<AssignmentId, Assignment>,
    sms_log: Vec<SmsLogEntry>,
}

impl Tables {
    fn details(&self, assignment: &Assignment) -> Option<AssignmentDetails> {
        let slot = self.slots.get(&assignment.slot_id)?;
        let event = self.events.get(&slot.event_id)?;
        let user = self.users.get(&assignment.user_id)?;
        Some(AssignmentDetails {
            assignment: assignment.clone(),
            slot: slot.clone(),
            event: event.clone(),
            user: user.clone(),
        })
    }

    fn details_where<F>(&self, keep: F) -> Vec<AssignmentDetails>
    where
        F: Fn(&AssignmentDetails) -> bool,
    {
        let mut rows: Vec<AssignmentDetails> = self
            .assignments
            .values()
            .filter_map(|a| self.details(a))
            .filter(|d| keep(d))
            .collect();
        rows.sort_by(|a, b| {
            (a.event.event_date, a.event.start_time, &a.slot.name, &a.user.name, a.assignment.id)
                .cmp(&(
                    b.event.event_date,
                    b.event.start_time,
                    &b.slot.name,
                    &b.user.name,
                    b.assignment.id,
                ))
        });
        rows
    }

    fn check_user_unique(&self, user: &User) -> RepoResult<()> {
        for other in self.users.values().filter(|u| u.id != user.id) {
            if other.phone == user.phone {
                return Err(DomainError::PhoneAlreadyExists);
            }
            if user.email.is_some() && other.email == user.email {
                return Err(DomainError::EmailAlreadyExists);
            }
        }
        Ok(())
    }

    fn remove_slot_cascade(&mut self, slot_id: SlotId) -> bool {
        self.assignments.retain(|_, a| a.slot_id != slot_id);
        self.slots.remove(&slot_id).is_some()
    }
}

/// Entity Store kept entirely in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> RepoResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| &u.phone == phone)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn list(&self, role: Option<Role>) -> RepoResult<Vec<User>> {
        let mut users: Vec<User> = self
            .tables
            .read()
            .users
            .values()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect();
        users.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(users)
    }

    async fn count_active_super_admins(&self) -> RepoResult<i64> {
        let count = self
            .tables
            .read()
            .users
            .values()
            .filter(|u| u.is_active_super_admin())
            .count();
        Ok(count as i64)
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        let mut tables = self.tables.write();
        tables.check_user_unique(user)?;
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&user.id) {
            return Err(DomainError::UserNotFound(user.id));
        }
        tables.check_user_unique(user)?;
        tables.users.insert(user.id, user.clone());
        Ok(())
    }
}

// ============================================================================
// Events
// ============================================================================

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn find_by_id(&self, id: EventId) -> RepoResult<Option<Event>> {
        Ok(self.tables.read().events.get(&id).cloned())
    }

    async fn find(&self, query: &EventQuery) -> RepoResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .tables
            .read()
            .events
            .values()
            .filter(|e| query.from.map_or(true, |from| e.event_date >= from))
            .filter(|e| query.to.map_or(true, |to| e.event_date <= to))
            .filter(|e| query.event_type.map_or(true, |t| e.event_type == t))
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.event_date, e.start_time, e.id));
        if let Some(limit) = query.limit {
            events.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(events)
    }

    async fn find_children(&self, parent_id: EventId) -> RepoResult<Vec<Event>> {
        let mut children: Vec<Event> = self
            .tables
            .read()
            .events
            .values()
            .filter(|e| e.parent_event_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by_key(|e| (e.event_date, e.id));
        Ok(children)
    }

    async fn create_series(&self, series: &EventSeries) -> RepoResult<()> {
        let mut tables = self.tables.write();

        // Nothing is written unless every slot has an owning event
        let orphan = series.slots.iter().find(|slot| {
            !tables.events.contains_key(&slot.event_id)
                && !series.events().any(|e| e.id == slot.event_id)
        });
        if let Some(slot) = orphan {
            return Err(DomainError::EventNotFound(slot.event_id));
        }

        for event in series.events() {
            tables.events.insert(event.id, event.clone());
        }
        for slot in &series.slots {
            tables.slots.insert(slot.id, slot.clone());
        }
        Ok(())
    }

    async fn update(&self, event: &Event) -> RepoResult<()> {
        let mut tables = self.tables.write();
        match tables.events.get_mut(&event.id) {
            Some(stored) => {
                *stored = Event {
                    parent_event_id: stored.parent_event_id,
                    created_by: stored.created_by,
                    created_at: stored.created_at,
                    ..event.clone()
                };
                Ok(())
            }
            None => Err(DomainError::EventNotFound(event.id)),
        }
    }

    async fn delete_events(&self, ids: &[EventId]) -> RepoResult<u64> {
        let mut tables = self.tables.write();

        let slot_ids: Vec<SlotId> = tables
            .slots
            .values()
            .filter(|s| ids.contains(&s.event_id))
            .map(|s| s.id)
            .collect();
        for slot_id in slot_ids {
            tables.remove_slot_cascade(slot_id);
        }

        let mut removed = 0;
        for id in ids {
            if tables.events.remove(id).is_some() {
                removed += 1;
            }
        }

        // Surviving children of a removed parent become standalone
        for event in tables.events.values_mut() {
            if event.parent_event_id.is_some_and(|p| ids.contains(&p)) {
                event.parent_event_id = None;
            }
        }

        Ok(removed)
    }
}

// ============================================================================
// Slots
// ============================================================================

#[async_trait]
impl SlotRepository for InMemoryStore {
    async fn find_by_id(&self, id: SlotId) -> RepoResult<Option<Slot>> {
        Ok(self.tables.read().slots.get(&id).cloned())
    }

    async fn find_by_event(&self, event_id: EventId) -> RepoResult<Vec<Slot>> {
        SlotRepository::find_by_events(self, &[event_id]).await
    }

    async fn find_by_events(&self, event_ids: &[EventId]) -> RepoResult<Vec<Slot>> {
        let mut slots: Vec<Slot> = self
            .tables
            .read()
            .slots
            .values()
            .filter(|s| event_ids.contains(&s.event_id))
            .cloned()
            .collect();
        slots.sort_by(|a, b| (a.created_at, &a.name, a.id).cmp(&(b.created_at, &b.name, b.id)));
        Ok(slots)
    }

    async fn create(&self, slot: &Slot) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.events.contains_key(&slot.event_id) {
            return Err(DomainError::EventNotFound(slot.event_id));
        }
        tables.slots.insert(slot.id, slot.clone());
        Ok(())
    }

    async fn update(&self, slot: &Slot) -> RepoResult<()> {
        let mut tables = self.tables.write();
        match tables.slots.get_mut(&slot.id) {
            Some(stored) => {
                stored.name.clone_from(&slot.name);
                stored.capacity = slot.capacity;
                stored.notes.clone_from(&slot.notes);
                Ok(())
            }
            None => Err(DomainError::SlotNotFound(slot.id)),
        }
    }

    async fn delete(&self, id: SlotId) -> RepoResult<()> {
        if self.tables.write().remove_slot_cascade(id) {
            Ok(())
        } else {
            Err(DomainError::SlotNotFound(id))
        }
    }
}

// ============================================================================
// Assignments
// ============================================================================

#[async_trait]
impl AssignmentRepository for InMemoryStore {
    async fn find_by_id(&self, id: AssignmentId) -> RepoResult<Option<Assignment>> {
        Ok(self.tables.read().assignments.get(&id).cloned())
    }

    async fn find_by_slots(&self, slot_ids: &[SlotId]) -> RepoResult<Vec<Assignment>> {
        let mut rows: Vec<Assignment> = self
            .tables
            .read()
            .assignments
            .values()
            .filter(|a| slot_ids.contains(&a.slot_id))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.created_at, a.id));
        Ok(rows)
    }

    async fn find_details(&self, id: AssignmentId) -> RepoResult<Option<AssignmentDetails>> {
        let tables = self.tables.read();
        Ok(tables.assignments.get(&id).and_then(|a| tables.details(a)))
    }

    async fn find_details_by_query(
        &self,
        query: &AssignmentQuery,
    ) -> RepoResult<Vec<AssignmentDetails>> {
        Ok(self.tables.read().details_where(|d| {
            query.user_id.map_or(true, |id| d.user.id == id)
                && query.event_id.map_or(true, |id| d.event.id == id)
                && query.from.map_or(true, |from| d.event.event_date >= from)
                && query.to.map_or(true, |to| d.event.event_date <= to)
        }))
    }

    async fn find_user_events_on(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> RepoResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .tables
            .read()
            .details_where(|d| d.user.id == user_id && d.event.event_date == date)
            .into_iter()
            .map(|d| d.event)
            .collect();
        events.sort_by_key(|e| e.id);
        events.dedup_by_key(|e| e.id);
        Ok(events)
    }

    async fn find_due(
        &self,
        date: NaiveDate,
        offset: ReminderOffset,
    ) -> RepoResult<Vec<AssignmentDetails>> {
        Ok(self.tables.read().details_where(|d| {
            d.event.event_date == date && !d.assignment.reminder_sent(offset)
        }))
    }

    async fn create(&self, assignment: &Assignment) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let duplicate = tables
            .assignments
            .values()
            .any(|a| a.slot_id == assignment.slot_id && a.user_id == assignment.user_id);
        if duplicate {
            return Err(DomainError::AlreadyAssigned);
        }
        if !tables.slots.contains_key(&assignment.slot_id) {
            return Err(DomainError::SlotNotFound(assignment.slot_id));
        }
        if !tables.users.contains_key(&assignment.user_id) {
            return Err(DomainError::UserNotFound(assignment.user_id));
        }
        tables.assignments.insert(assignment.id, assignment.clone());
        Ok(())
    }

    async fn delete(&self, id: AssignmentId) -> RepoResult<()> {
        match self.tables.write().assignments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::AssignmentNotFound(id)),
        }
    }

    async fn mark_reminder_sent(
        &self,
        id: AssignmentId,
        offset: ReminderOffset,
    ) -> RepoResult<bool> {
        match self.tables.write().assignments.get_mut(&id) {
            Some(assignment) => Ok(assignment.reminders_sent.insert(offset)),
            None => Err(DomainError::AssignmentNotFound(id)),
        }
    }

    async fn clear_reminder_sent(
        &self,
        id: AssignmentId,
        offset: ReminderOffset,
    ) -> RepoResult<()> {
        match self.tables.write().assignments.get_mut(&id) {
            Some(assignment) => {
                assignment.reminders_sent.remove(offset);
                Ok(())
            }
            None => Err(DomainError::AssignmentNotFound(id)),
        }
    }
}

// ============================================================================
// SMS log
// ============================================================================

#[async_trait]
impl SmsLogRepository for InMemoryStore {
    async fn create(&self, entry: &SmsLogEntry) -> RepoResult<()> {
        self.tables.write().sms_log.push(entry.clone());
        Ok(())
    }

    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<SmsLogEntry>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .tables
            .read()
            .sms_log
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}
