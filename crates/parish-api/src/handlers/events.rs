//! Event handlers
//!
//! Endpoints for events and recurring series.

use axum::{extract::State, Json};
use parish_core::EventId;
use parish_service::{
    CreateEventRequest, DeleteEventQuery, EventDeleteResponse, EventDetailResponse,
    EventListItem, EventSeriesResponse, EventService, EventUpdateResponse, ListEventsQuery,
    UpdateEventRequest,
};

use crate::extractors::{AuthUser, IdPath, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List events with their slots
///
/// GET /events?startDate=&endDate=&type=
pub async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListEventsQuery>,
) -> ApiResult<Json<Vec<EventListItem>>> {
    let service = EventService::new(state.service_context());
    let response = service.list_events(auth.user_id, query).await?;
    Ok(Json(response))
}

/// Create an event, expanding it into a series when it recurs
///
/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> ApiResult<Created<Json<EventSeriesResponse>>> {
    let service = EventService::new(state.service_context());
    let response = service.create_event(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Get an event with slots, assignees and series children
///
/// GET /events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(event_id): IdPath<EventId>,
) -> ApiResult<Json<EventDetailResponse>> {
    let service = EventService::new(state.service_context());
    let response = service.get_event(auth.user_id, event_id).await?;
    Ok(Json(response))
}

/// Update an event, optionally cascading to later occurrences
///
/// PUT /events/{event_id}
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(event_id): IdPath<EventId>,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> ApiResult<Json<EventUpdateResponse>> {
    let service = EventService::new(state.service_context());
    let response = service.update_event(auth.user_id, event_id, request).await?;
    Ok(Json(response))
}

/// Delete an event, or a whole series
///
/// DELETE /events/{event_id}?deleteFutureInstances=true
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(event_id): IdPath<EventId>,
    QueryParams(query): QueryParams<DeleteEventQuery>,
) -> ApiResult<Json<EventDeleteResponse>> {
    let service = EventService::new(state.service_context());
    let response = service
        .delete_event(auth.user_id, event_id, query.delete_future_instances)
        .await?;
    Ok(Json(response))
}
