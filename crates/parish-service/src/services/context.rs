//! Service context - dependency container for services
//!
//! Holds the Entity Store repositories, the SMS sender and the settings the
//! services need. The store is either PostgreSQL or the in-memory store.

use std::sync::Arc;

use parish_common::{JwtService, ReminderConfig};
use parish_core::traits::{
    AssignmentRepository, EventRepository, SlotRepository, SmsLogRepository, SmsSender,
    UserRepository,
};
use parish_core::ReminderOffset;
use parish_db::{
    InMemoryStore, PgAssignmentRepository, PgEventRepository, PgPool, PgSlotRepository,
    PgSmsLogRepository, PgUserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Entity Store repositories
/// - The outbound SMS sender
/// - JWT verification
/// - Reminder settings
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool, absent when running on the in-memory store
    pool: Option<PgPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    event_repo: Arc<dyn EventRepository>,
    slot_repo: Arc<dyn SlotRepository>,
    assignment_repo: Arc<dyn AssignmentRepository>,
    sms_log_repo: Arc<dyn SmsLogRepository>,

    // Outbound messaging
    sms_sender: Arc<dyn SmsSender>,

    // Services
    jwt_service: Arc<JwtService>,

    // Settings
    reminders: ReminderConfig,
}

impl ServiceContext {
    // === Database Pool ===

    /// Get the PostgreSQL connection pool, if the context is backed by one
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the event repository
    pub fn event_repo(&self) -> &dyn EventRepository {
        self.event_repo.as_ref()
    }

    /// Get the slot repository
    pub fn slot_repo(&self) -> &dyn SlotRepository {
        self.slot_repo.as_ref()
    }

    /// Get the assignment repository
    pub fn assignment_repo(&self) -> &dyn AssignmentRepository {
        self.assignment_repo.as_ref()
    }

    /// Get the SMS log repository
    pub fn sms_log_repo(&self) -> &dyn SmsLogRepository {
        self.sms_log_repo.as_ref()
    }

    // === Messaging ===

    /// Get the outbound SMS sender
    pub fn sms_sender(&self) -> &dyn SmsSender {
        self.sms_sender.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    // === Settings ===

    /// Offsets the reminder sweep runs for, in configured order
    pub fn reminder_offsets(&self) -> Vec<ReminderOffset> {
        self.reminders
            .days
            .iter()
            .map(|d| ReminderOffset::days_before(*d))
            .collect()
    }

    /// Sign-off appended to reminder texts
    pub fn reminder_signature(&self) -> &str {
        &self.reminders.signature
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("reminders", &self.reminders)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    event_repo: Option<Arc<dyn EventRepository>>,
    slot_repo: Option<Arc<dyn SlotRepository>>,
    assignment_repo: Option<Arc<dyn AssignmentRepository>>,
    sms_log_repo: Option<Arc<dyn SmsLogRepository>>,
    sms_sender: Option<Arc<dyn SmsSender>>,
    jwt_service: Option<Arc<JwtService>>,
    reminders: Option<ReminderConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back every repository with PostgreSQL
    pub fn postgres(mut self, pool: PgPool) -> Self {
        self.user_repo = Some(Arc::new(PgUserRepository::new(pool.clone())));
        self.event_repo = Some(Arc::new(PgEventRepository::new(pool.clone())));
        self.slot_repo = Some(Arc::new(PgSlotRepository::new(pool.clone())));
        self.assignment_repo = Some(Arc::new(PgAssignmentRepository::new(pool.clone())));
        self.sms_log_repo = Some(Arc::new(PgSmsLogRepository::new(pool.clone())));
        self.pool = Some(pool);
        self
    }

    /// Back every repository with one shared in-memory store
    pub fn in_memory(mut self, store: InMemoryStore) -> Self {
        self.user_repo = Some(Arc::new(store.clone()));
        self.event_repo = Some(Arc::new(store.clone()));
        self.slot_repo = Some(Arc::new(store.clone()));
        self.assignment_repo = Some(Arc::new(store.clone()));
        self.sms_log_repo = Some(Arc::new(store));
        self.pool = None;
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn event_repo(mut self, repo: Arc<dyn EventRepository>) -> Self {
        self.event_repo = Some(repo);
        self
    }

    pub fn slot_repo(mut self, repo: Arc<dyn SlotRepository>) -> Self {
        self.slot_repo = Some(repo);
        self
    }

    pub fn assignment_repo(mut self, repo: Arc<dyn AssignmentRepository>) -> Self {
        self.assignment_repo = Some(repo);
        self
    }

    pub fn sms_log_repo(mut self, repo: Arc<dyn SmsLogRepository>) -> Self {
        self.sms_log_repo = Some(repo);
        self
    }

    pub fn sms_sender(mut self, sender: Arc<dyn SmsSender>) -> Self {
        self.sms_sender = Some(sender);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn reminders(mut self, reminders: ReminderConfig) -> Self {
        self.reminders = Some(reminders);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            pool: self.pool,
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            event_repo: self
                .event_repo
                .ok_or_else(|| ServiceError::validation("event_repo is required"))?,
            slot_repo: self
                .slot_repo
                .ok_or_else(|| ServiceError::validation("slot_repo is required"))?,
            assignment_repo: self
                .assignment_repo
                .ok_or_else(|| ServiceError::validation("assignment_repo is required"))?,
            sms_log_repo: self
                .sms_log_repo
                .ok_or_else(|| ServiceError::validation("sms_log_repo is required"))?,
            sms_sender: self
                .sms_sender
                .ok_or_else(|| ServiceError::validation("sms_sender is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            reminders: self.reminders.unwrap_or_default(),
        })
    }
}
