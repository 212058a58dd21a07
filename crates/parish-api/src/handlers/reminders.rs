//! Reminder handlers
//!
//! Manual sends by staff, the scheduled sweep and the SMS log.

use axum::{extract::State, Json};
use chrono::{Local, NaiveDate};
use parish_core::calendar::parse_date;
use parish_service::{
    ManualReminderResponse, ReminderService, SendReminderRequest, SmsLogQuery, SmsLogResponse,
    SweepQuery, SweepReport,
};

use crate::extractors::{AuthUser, CronAuth, QueryParams, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Send a reminder for one assignment right now
///
/// POST /reminders/send
pub async fn send_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<SendReminderRequest>,
) -> ApiResult<Json<ManualReminderResponse>> {
    let service = ReminderService::new(state.service_context());
    let response = service.send_manual(auth.user_id, request).await?;
    Ok(Json(response))
}

/// Run the reminder sweep for today, or for `?date=YYYY-MM-DD`
///
/// POST /reminders/sweep
pub async fn run_sweep(
    State(state): State<AppState>,
    _cron: CronAuth,
    QueryParams(query): QueryParams<SweepQuery>,
) -> ApiResult<Json<SweepReport>> {
    let today = sweep_date(&query)?;
    let service = ReminderService::new(state.service_context());
    let report = service.sweep(today).await?;
    Ok(Json(report))
}

/// Date the sweep runs as, defaulting to the server's local today
fn sweep_date(query: &SweepQuery) -> Result<NaiveDate, ApiError> {
    match query.date.as_deref() {
        Some(raw) => {
            parse_date(raw).map_err(|_| ApiError::invalid_query(format!("Invalid date: {raw}")))
        }
        None => Ok(Local::now().date_naive()),
    }
}

/// Most recent outbound messages
///
/// GET /reminders/log?limit=
pub async fn sms_log(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<SmsLogQuery>,
) -> ApiResult<Json<Vec<SmsLogResponse>>> {
    let service = ReminderService::new(state.service_context());
    let response = service.recent_log(auth.user_id, query).await?;
    Ok(Json(response))
}
