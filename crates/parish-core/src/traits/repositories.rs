//! Repository traits (ports) - the Entity Store the domain relies on
//!
//! The domain layer defines what it needs and the infrastructure layer
//! provides the implementation. Operations that write several rows
//! (`create_series`, `delete_events`, `SlotRepository::delete`) are a single
//! unit of work: they either fully apply or leave the store unchanged.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::{
    Assignment, AssignmentDetails, Event, EventType, Slot, SmsLogEntry, User,
};
use crate::error::DomainError;
use crate::scheduling::EventSeries;
use crate::value_objects::{AssignmentId, EventId, PhoneNumber, ReminderOffset, Role, SlotId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by normalized phone number
    async fn find_by_phone(&self, phone: &PhoneNumber) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// List users ordered by name, optionally restricted to one role
    async fn list(&self, role: Option<Role>) -> RepoResult<Vec<User>>;

    /// Number of active super admins
    async fn count_active_super_admins(&self) -> RepoResult<i64>;

    /// Create a new user
    ///
    /// Fails with `PhoneAlreadyExists` / `EmailAlreadyExists` on duplicates.
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Update an existing user
    async fn update(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Event Repository
// ============================================================================

/// Filters for event listings
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// Inclusive lower bound on the event date
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the event date
    pub to: Option<NaiveDate>,
    pub event_type: Option<EventType>,
    pub limit: Option<i64>,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find event by ID
    async fn find_by_id(&self, id: EventId) -> RepoResult<Option<Event>>;

    /// List events ordered by date then start time
    async fn find(&self, query: &EventQuery) -> RepoResult<Vec<Event>>;

    /// Children generated from a parent, ordered by date
    async fn find_children(&self, parent_id: EventId) -> RepoResult<Vec<Event>>;

    /// Insert a parent, its children and all their slots atomically
    async fn create_series(&self, series: &EventSeries) -> RepoResult<()>;

    /// Update an existing event
    async fn update(&self, event: &Event) -> RepoResult<()>;

    /// Delete events bottom-up (assignments, slots, events) atomically
    ///
    /// Returns the number of event rows removed.
    async fn delete_events(&self, ids: &[EventId]) -> RepoResult<u64>;
}

// ============================================================================
// Slot Repository
// ============================================================================

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Find slot by ID
    async fn find_by_id(&self, id: SlotId) -> RepoResult<Option<Slot>>;

    /// Slots of one event in creation order
    async fn find_by_event(&self, event_id: EventId) -> RepoResult<Vec<Slot>>;

    /// Slots of several events in creation order
    async fn find_by_events(&self, event_ids: &[EventId]) -> RepoResult<Vec<Slot>>;

    /// Create a slot on an existing event
    async fn create(&self, slot: &Slot) -> RepoResult<()>;

    /// Update name, capacity and notes
    async fn update(&self, slot: &Slot) -> RepoResult<()>;

    /// Delete a slot together with its assignments
    async fn delete(&self, id: SlotId) -> RepoResult<()>;
}

// ============================================================================
// Assignment Repository
// ============================================================================

/// Filters for assignment listings
#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
    pub user_id: Option<UserId>,
    pub event_id: Option<EventId>,
    /// Inclusive lower bound on the event date
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the event date
    pub to: Option<NaiveDate>,
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Find assignment by ID
    async fn find_by_id(&self, id: AssignmentId) -> RepoResult<Option<Assignment>>;

    /// Assignments on any of the given slots
    async fn find_by_slots(&self, slot_ids: &[SlotId]) -> RepoResult<Vec<Assignment>>;

    /// Assignment joined with its slot, event and volunteer
    async fn find_details(&self, id: AssignmentId) -> RepoResult<Option<AssignmentDetails>>;

    /// Joined assignments matching the filters, ordered by event date and time
    async fn find_details_by_query(
        &self,
        query: &AssignmentQuery,
    ) -> RepoResult<Vec<AssignmentDetails>>;

    /// Events on `date` where the user already holds an assignment
    async fn find_user_events_on(&self, user_id: UserId, date: NaiveDate)
        -> RepoResult<Vec<Event>>;

    /// Assignments for events on `date` that have not yet had `offset` sent
    async fn find_due(
        &self,
        date: NaiveDate,
        offset: ReminderOffset,
    ) -> RepoResult<Vec<AssignmentDetails>>;

    /// Create an assignment
    ///
    /// Fails with `AlreadyAssigned` when the (slot, user) pair exists.
    async fn create(&self, assignment: &Assignment) -> RepoResult<()>;

    /// Hard delete an assignment
    async fn delete(&self, id: AssignmentId) -> RepoResult<()>;

    /// Record `offset` as sent; returns `false` if it already was
    async fn mark_reminder_sent(&self, id: AssignmentId, offset: ReminderOffset)
        -> RepoResult<bool>;

    /// Forget `offset` so a later sweep tries it again
    async fn clear_reminder_sent(&self, id: AssignmentId, offset: ReminderOffset)
        -> RepoResult<()>;
}

// ============================================================================
// SMS Log Repository
// ============================================================================

#[async_trait]
pub trait SmsLogRepository: Send + Sync {
    /// Append a delivery attempt
    async fn create(&self, entry: &SmsLogEntry) -> RepoResult<()>;

    /// Most recent attempts first
    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<SmsLogEntry>>;
}
