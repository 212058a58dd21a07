//! Reminder service
//!
//! Sends SMS reminders for upcoming assignments, either as a sweep over the
//! configured day offsets or on demand for a single assignment. Every
//! attempt is written to the SMS log.

use chrono::NaiveDate;
use parish_core::calendar::{add_days, format_12h, format_long_date};
use parish_core::{
    AssignmentDetails, Capabilities, ReminderOffset, SmsLogEntry, SmsMessageType, UserId,
};
use tracing::{debug, info, instrument, warn};

use crate::dto::responses::DispatchOutcome;
use crate::dto::{
    ManualReminderResponse, SendReminderRequest, SmsLogQuery, SmsLogResponse, SweepReport,
};

use super::assignment::AssignmentService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

const DEFAULT_LOG_LIMIT: i64 = 50;
const MAX_LOG_LIMIT: i64 = 200;

/// Standard reminder text for an assignment
pub fn reminder_text(details: &AssignmentDetails, signature: &str) -> String {
    let event = &details.event;
    format!(
        "Hi {}! Reminder: You're scheduled for \"{}\" at {} on {} at {} at {}. \
         Thank you for serving! - {}",
        details.user.name,
        details.slot.name,
        event.title,
        format_long_date(event.event_date),
        format_12h(event.start_time),
        event.location.as_deref().unwrap_or("TBD"),
        signature,
    )
}

/// Reminder service
pub struct ReminderService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReminderService<'a> {
    /// Create a new ReminderService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Remind everyone serving `d` days after `today`, for each configured `d`
    ///
    /// An assignment is reminded at most once per offset. Volunteers who are
    /// inactive or have notifications off are skipped. A failed send is
    /// logged and counted and the sweep carries on.
    #[instrument(skip(self))]
    pub async fn sweep(&self, today: NaiveDate) -> ServiceResult<SweepReport> {
        let mut report = SweepReport {
            date: Some(today),
            ..Default::default()
        };

        for offset in self.ctx.reminder_offsets() {
            let Some(days) = offset.days() else {
                continue;
            };
            report.by_offset.entry(offset.raw()).or_default();

            let target = add_days(today, days)
                .ok_or_else(|| ServiceError::validation("Reminder date out of range"))?;
            let due = self.ctx.assignment_repo().find_due(target, offset).await?;

            debug!(offset = %offset, target = %target, due = due.len(), "Sweeping reminders");

            for details in &due {
                let outcome = self.dispatch(details, offset).await;
                report.record(offset.raw(), outcome);
            }
        }

        info!(
            date = %today,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            "Reminder sweep finished"
        );

        Ok(report)
    }

    /// Claim, send and log one reminder
    ///
    /// The offset is claimed before sending and released if the send fails.
    /// Store errors count as a failure for this assignment only.
    async fn dispatch(
        &self,
        details: &AssignmentDetails,
        offset: ReminderOffset,
    ) -> DispatchOutcome {
        let assignment_id = details.assignment.id;
        let user = &details.user;
        if !user.accepts_reminders() {
            debug!(assignment_id = %assignment_id, "Volunteer does not accept reminders");
            return DispatchOutcome::Skipped;
        }

        let assignments = AssignmentService::new(self.ctx);
        match assignments.mark_reminder_sent(assignment_id, offset).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(
                    assignment_id = %assignment_id,
                    offset = %offset,
                    "Reminder already claimed"
                );
                return DispatchOutcome::Skipped;
            }
            Err(e) => {
                warn!(
                    assignment_id = %assignment_id,
                    offset = %offset,
                    error = %e,
                    "Failed to claim reminder"
                );
                return DispatchOutcome::Failed;
            }
        }

        let body = reminder_text(details, self.ctx.reminder_signature());
        let sent = self.ctx.sms_sender().send(&user.phone, &body).await;

        if let Err(e) = &sent {
            warn!(
                assignment_id = %assignment_id,
                offset = %offset,
                error = %e,
                "Failed to send reminder"
            );
            if let Err(e) = self
                .ctx
                .assignment_repo()
                .clear_reminder_sent(assignment_id, offset)
                .await
            {
                warn!(
                    assignment_id = %assignment_id,
                    error = %e,
                    "Failed to release reminder claim"
                );
            }
        }

        let outcome = if sent.is_ok() {
            DispatchOutcome::Sent
        } else {
            DispatchOutcome::Failed
        };

        let entry = SmsLogEntry::record(
            Some(user.id),
            user.phone.clone(),
            SmsMessageType::Reminder,
            body,
            sent.ok(),
        );
        if let Err(e) = self.ctx.sms_log_repo().create(&entry).await {
            warn!(assignment_id = %assignment_id, error = %e, "Failed to record SMS log entry");
        }

        outcome
    }

    /// Send a reminder for one assignment right now
    ///
    /// Recorded under the manual offset, so it never stands in for a
    /// scheduled reminder.
    #[instrument(skip(self, request))]
    pub async fn send_manual(
        &self,
        actor_id: UserId,
        request: SendReminderRequest,
    ) -> ServiceResult<ManualReminderResponse> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::SEND_REMINDERS)
            .await?;

        let details = self
            .ctx
            .assignment_repo()
            .find_details(request.assignment_id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found("Assignment", request.assignment_id.to_string())
            })?;

        let body = request
            .custom_message
            .unwrap_or_else(|| reminder_text(&details, self.ctx.reminder_signature()));
        let user = &details.user;

        let sent = self.ctx.sms_sender().send(&user.phone, &body).await;
        let entry = SmsLogEntry::record(
            Some(user.id),
            user.phone.clone(),
            SmsMessageType::Reminder,
            body.clone(),
            sent.as_ref().ok().cloned(),
        );
        if let Err(e) = self.ctx.sms_log_repo().create(&entry).await {
            warn!(
                assignment_id = %request.assignment_id,
                error = %e,
                "Failed to record SMS log entry"
            );
        }

        let provider_id = sent.map_err(|e| {
            warn!(assignment_id = %request.assignment_id, error = %e, "Manual reminder failed");
            ServiceError::external(e.to_string())
        })?;

        AssignmentService::new(self.ctx)
            .mark_reminder_sent(request.assignment_id, ReminderOffset::MANUAL)
            .await?;

        info!(assignment_id = %request.assignment_id, "Manual reminder sent");

        Ok(ManualReminderResponse {
            assignment_id: request.assignment_id,
            provider_id,
            message: body,
        })
    }

    /// Most recent SMS log entries, newest first
    #[instrument(skip(self))]
    pub async fn recent_log(
        &self,
        actor_id: UserId,
        query: SmsLogQuery,
    ) -> ServiceResult<Vec<SmsLogResponse>> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::SEND_REMINDERS)
            .await?;

        let limit = query
            .limit
            .unwrap_or(DEFAULT_LOG_LIMIT)
            .clamp(1, MAX_LOG_LIMIT);
        let entries = self.ctx.sms_log_repo().find_recent(limit).await?;

        Ok(entries.into_iter().map(SmsLogResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{builder, seed_user, FlakySmsLog, RecordingSmsSender};
    use chrono::NaiveTime;
    use parish_core::{
        Assignment, AssignmentId, AssignmentRepository, EventRepository, EventSeries,
        EventTemplate, EventType, RecurrenceRule, Role, SlotTemplate, SmsLogRepository,
        SmsStatus, User, UserRepository,
    };
    use parish_db::InMemoryStore;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context_with(sender: Arc<RecordingSmsSender>) -> (ServiceContext, InMemoryStore) {
        let store = InMemoryStore::new();
        let ctx = builder(&store).sms_sender(sender).build().unwrap();
        (ctx, store)
    }

    /// Assign `user` to a fresh event on `on` and return the assignment
    async fn seed_assignment(
        store: &InMemoryStore,
        admin: &User,
        user: &User,
        on: NaiveDate,
    ) -> AssignmentId {
        let template = EventTemplate {
            title: "Sunday Mass".to_string(),
            description: None,
            event_type: EventType::Mass,
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            end_time: None,
            location: Some("Main Church".to_string()),
        };
        let slot = SlotTemplate::new("Lector".to_string(), 1, None).unwrap();
        let series =
            EventSeries::materialize(&template, on, RecurrenceRule::none(), &[slot], admin.id)
                .unwrap();
        store.create_series(&series).await.unwrap();

        let assignment = Assignment::new(series.slots[0].id, user.id, None, admin.id);
        AssignmentRepository::create(store, &assignment)
            .await
            .unwrap();
        assignment.id
    }

    #[test]
    fn test_reminder_text() {
        let template = EventTemplate {
            title: "Sunday Mass".to_string(),
            description: None,
            event_type: EventType::Mass,
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            end_time: None,
            location: None,
        };
        let admin_id = UserId::new();
        let series = EventSeries::materialize(
            &template,
            date(2025, 3, 5),
            RecurrenceRule::none(),
            &[SlotTemplate::new("Lector".to_string(), 1, None).unwrap()],
            admin_id,
        )
        .unwrap();
        let user = User::new(
            "Ann".to_string(),
            parish_core::PhoneNumber::parse("5550000002").unwrap(),
            Role::PeerMinister,
        );
        let details = AssignmentDetails {
            assignment: Assignment::new(series.slots[0].id, user.id, None, admin_id),
            slot: series.slots[0].clone(),
            event: series.parent.clone(),
            user,
        };

        assert_eq!(
            reminder_text(&details, "St. Anne Parish"),
            "Hi Ann! Reminder: You're scheduled for \"Lector\" at Sunday Mass on March 5, 2025 \
             at 9:30 AM at TBD. Thank you for serving! - St. Anne Parish"
        );
    }

    #[tokio::test]
    async fn test_sweep_sends_once_per_offset() {
        let sender = Arc::new(RecordingSmsSender::default());
        let (ctx, store) = context_with(sender.clone());
        let admin = seed_user(&store, "Ruth", "5550000001", Role::Admin).await;
        let ann = seed_user(&store, "Ann", "5550000002", Role::PeerMinister).await;
        let assignment_id = seed_assignment(&store, &admin, &ann, date(2025, 3, 8)).await;
        let service = ReminderService::new(&ctx);

        // Offsets 1 and 7: 2025-03-01 is seven days ahead of the event
        let report = service.sweep(date(2025, 3, 1)).await.unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(report.by_offset[&7].sent, 1);
        assert_eq!(report.by_offset[&1].sent, 0);

        let again = service.sweep(date(2025, 3, 1)).await.unwrap();
        assert_eq!(again.sent, 0);

        let day_before = service.sweep(date(2025, 3, 7)).await.unwrap();
        assert_eq!(day_before.by_offset[&1].sent, 1);

        let stored = AssignmentRepository::find_by_id(&store, assignment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.reminders_sent.to_raw(), vec![1, 7]);
        assert_eq!(sender.messages().len(), 2);
        assert!(sender.messages()[0].1.contains("March 8, 2025 at 9:30 AM at Main Church"));
    }

    #[tokio::test]
    async fn test_sweep_skips_volunteers_without_notifications() {
        let sender = Arc::new(RecordingSmsSender::default());
        let (ctx, store) = context_with(sender.clone());
        let admin = seed_user(&store, "Ruth", "5550000001", Role::Admin).await;
        let mut ann = seed_user(&store, "Ann", "5550000002", Role::PeerMinister).await;
        ann.set_notifications_enabled(false);
        UserRepository::update(&store, &ann).await.unwrap();
        seed_assignment(&store, &admin, &ann, date(2025, 3, 2)).await;

        let report = ReminderService::new(&ctx)
            .sweep(date(2025, 3, 1))
            .await
            .unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.sent, 0);
        assert!(sender.messages().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_survives_send_failures() {
        let sender = Arc::new(RecordingSmsSender::rejecting(&["5550000002"]));
        let (ctx, store) = context_with(sender.clone());
        let admin = seed_user(&store, "Ruth", "5550000001", Role::Admin).await;
        let ann = seed_user(&store, "Ann", "5550000002", Role::PeerMinister).await;
        let ben = seed_user(&store, "Ben", "5550000003", Role::PeerMinister).await;
        let failed_id = seed_assignment(&store, &admin, &ann, date(2025, 3, 2)).await;
        seed_assignment(&store, &admin, &ben, date(2025, 3, 2)).await;
        let service = ReminderService::new(&ctx);

        let report = service.sweep(date(2025, 3, 1)).await.unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 1);

        let stored = AssignmentRepository::find_by_id(&store, failed_id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.reminders_sent.is_empty());

        let log = service
            .recent_log(admin.id, SmsLogQuery::default())
            .await
            .unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(
            log.iter().filter(|e| e.status == SmsStatus::Failed).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_sweep_survives_log_failures_without_resending() {
        let store = InMemoryStore::new();
        let sender = Arc::new(RecordingSmsSender::default());
        let ctx = builder(&store)
            .sms_log_repo(Arc::new(FlakySmsLog::new(store.clone(), 1)))
            .sms_sender(sender.clone())
            .build()
            .unwrap();
        let admin = seed_user(&store, "Ruth", "5550000001", Role::Admin).await;
        let ann = seed_user(&store, "Ann", "5550000002", Role::PeerMinister).await;
        let ben = seed_user(&store, "Ben", "5550000003", Role::PeerMinister).await;
        seed_assignment(&store, &admin, &ann, date(2025, 3, 2)).await;
        seed_assignment(&store, &admin, &ben, date(2025, 3, 2)).await;
        let service = ReminderService::new(&ctx);

        let report = service.sweep(date(2025, 3, 1)).await.unwrap();
        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 0);

        let again = service.sweep(date(2025, 3, 1)).await.unwrap();
        assert_eq!(again.sent, 0);

        let mut phones: Vec<String> = sender.messages().into_iter().map(|(p, _)| p).collect();
        phones.sort();
        assert_eq!(phones, vec!["+15550000002", "+15550000003"]);

        let log = SmsLogRepository::find_recent(&store, 50).await.unwrap();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_manual_reminder_uses_sentinel_offset() {
        let sender = Arc::new(RecordingSmsSender::default());
        let (ctx, store) = context_with(sender.clone());
        let admin = seed_user(&store, "Ruth", "5550000001", Role::Admin).await;
        let ann = seed_user(&store, "Ann", "5550000002", Role::PeerMinister).await;
        let assignment_id = seed_assignment(&store, &admin, &ann, date(2025, 3, 2)).await;
        let service = ReminderService::new(&ctx);

        let response = service
            .send_manual(
                admin.id,
                SendReminderRequest {
                    assignment_id,
                    custom_message: Some("Choir practice moved to 8".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(response.message, "Choir practice moved to 8");

        let stored = AssignmentRepository::find_by_id(&store, assignment_id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.reminder_sent(ReminderOffset::MANUAL));
        assert!(!stored.reminder_sent(ReminderOffset::days_before(1)));

        // The scheduled reminder still goes out
        let report = service.sweep(date(2025, 3, 1)).await.unwrap();
        assert_eq!(report.sent, 1);
    }

    #[tokio::test]
    async fn test_manual_reminder_failures() {
        let sender = Arc::new(RecordingSmsSender::rejecting(&["5550000002"]));
        let (ctx, store) = context_with(sender);
        let admin = seed_user(&store, "Ruth", "5550000001", Role::Admin).await;
        let ann = seed_user(&store, "Ann", "5550000002", Role::PeerMinister).await;
        let assignment_id = seed_assignment(&store, &admin, &ann, date(2025, 3, 2)).await;
        let service = ReminderService::new(&ctx);

        let err = service
            .send_manual(
                admin.id,
                SendReminderRequest {
                    assignment_id,
                    custom_message: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 502);

        let err = service
            .send_manual(
                admin.id,
                SendReminderRequest {
                    assignment_id: AssignmentId::new(),
                    custom_message: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = service
            .send_manual(
                ann.id,
                SendReminderRequest {
                    assignment_id,
                    custom_message: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
