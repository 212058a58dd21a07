//! Public schedule handler

use axum::{extract::State, Json};
use chrono::Local;
use parish_service::{PublicEventResponse, PublicScheduleQuery, ScheduleService};

use crate::extractors::QueryParams;
use crate::response::ApiResult;
use crate::state::AppState;

/// Upcoming events for anonymous visitors
///
/// GET /public/schedule?eventType=&limit=
pub async fn upcoming_schedule(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PublicScheduleQuery>,
) -> ApiResult<Json<Vec<PublicEventResponse>>> {
    let today = Local::now().date_naive();
    let service = ScheduleService::new(state.service_context());
    let response = service.upcoming(today, query).await?;
    Ok(Json(response))
}
