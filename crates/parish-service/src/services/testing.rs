//! Fixtures shared by the service tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parish_common::{JwtService, ReminderConfig};
use parish_core::{
    DomainError, PhoneNumber, RepoResult, Role, SmsError, SmsLogEntry, SmsLogRepository,
    SmsSender, User, UserRepository,
};
use parish_db::InMemoryStore;
use parking_lot::Mutex;

use crate::sms::LoggingSmsSender;

use super::context::{ServiceContext, ServiceContextBuilder};

pub fn builder(store: &InMemoryStore) -> ServiceContextBuilder {
    ServiceContextBuilder::new()
        .in_memory(store.clone())
        .jwt_service(Arc::new(JwtService::new("test-secret", 3600)))
        .reminders(ReminderConfig {
            days: vec![1, 7],
            signature: "St. Anne Parish".to_string(),
        })
}

/// Context over a fresh in-memory store with the log-only sender
pub fn context() -> (ServiceContext, InMemoryStore) {
    let store = InMemoryStore::new();
    let ctx = builder(&store)
        .sms_sender(Arc::new(LoggingSmsSender))
        .build()
        .unwrap();
    (ctx, store)
}

pub async fn seed_user(store: &InMemoryStore, name: &str, phone: &str, role: Role) -> User {
    let user = User::new(name.to_string(), PhoneNumber::parse(phone).unwrap(), role);
    UserRepository::create(store, &user).await.unwrap();
    user
}

/// Sender that records every message and rejects numbers it is told to
#[derive(Default)]
pub struct RecordingSmsSender {
    pub sent: Mutex<Vec<(String, String)>>,
    pub reject: Vec<String>,
}

impl RecordingSmsSender {
    pub fn rejecting(phones: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject: phones
                .iter()
                .map(|p| PhoneNumber::parse(p).unwrap().as_str().to_string())
                .collect(),
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl SmsSender for RecordingSmsSender {
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<String, SmsError> {
        if self.reject.iter().any(|p| p == to.as_str()) {
            return Err(SmsError::Rejected("unreachable handset".to_string()));
        }
        let mut sent = self.sent.lock();
        sent.push((to.as_str().to_string(), body.to_string()));
        Ok(format!("SM{}", sent.len()))
    }
}

/// SMS log that rejects its first `failures` writes, then defers to the store
pub struct FlakySmsLog {
    store: InMemoryStore,
    failures: AtomicUsize,
}

impl FlakySmsLog {
    pub fn new(store: InMemoryStore, failures: usize) -> Self {
        Self {
            store,
            failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl SmsLogRepository for FlakySmsLog {
    async fn create(&self, entry: &SmsLogEntry) -> RepoResult<()> {
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DomainError::DatabaseError("log down".to_string()));
        }
        SmsLogRepository::create(&self.store, entry).await
    }

    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<SmsLogEntry>> {
        SmsLogRepository::find_recent(&self.store, limit).await
    }
}
