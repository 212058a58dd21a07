//! Assignment handlers

use axum::{extract::State, Json};
use parish_core::AssignmentId;
use parish_service::{
    AssignmentResponse, AssignmentResult, AssignmentService, CreateAssignmentRequest,
    ListAssignmentsQuery,
};

use crate::extractors::{AuthUser, IdPath, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List assignments. Peer ministers only ever see their own.
///
/// GET /assignments?userId=&eventId=&startDate=&endDate=
pub async fn list_assignments(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListAssignmentsQuery>,
) -> ApiResult<Json<Vec<AssignmentResponse>>> {
    let service = AssignmentService::new(state.service_context());
    let response = service.list_assignments(auth.user_id, query).await?;
    Ok(Json(response))
}

/// Assign a person to a slot
///
/// POST /assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateAssignmentRequest>,
) -> ApiResult<Created<Json<AssignmentResult>>> {
    let service = AssignmentService::new(state.service_context());
    let response = service.assign(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Remove an assignment
///
/// DELETE /assignments/{assignment_id}
pub async fn delete_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(assignment_id): IdPath<AssignmentId>,
) -> ApiResult<NoContent> {
    let service = AssignmentService::new(state.service_context());
    service.unassign(auth.user_id, assignment_id).await?;
    Ok(NoContent)
}
