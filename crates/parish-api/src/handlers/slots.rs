//! Slot handlers

use axum::{extract::State, Json};
use parish_core::SlotId;
use parish_service::{CreateSlotRequest, SlotResponse, SlotService, UpdateSlotRequest};

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Add a slot to an event
///
/// POST /slots
pub async fn create_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateSlotRequest>,
) -> ApiResult<Created<Json<SlotResponse>>> {
    let service = SlotService::new(state.service_context());
    let response = service.create_slot(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Update a slot's name, capacity or notes
///
/// PUT /slots/{slot_id}
pub async fn update_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(slot_id): IdPath<SlotId>,
    ValidatedJson(request): ValidatedJson<UpdateSlotRequest>,
) -> ApiResult<Json<SlotResponse>> {
    let service = SlotService::new(state.service_context());
    let response = service.update_slot(auth.user_id, slot_id, request).await?;
    Ok(Json(response))
}

/// Delete a slot and its assignments
///
/// DELETE /slots/{slot_id}
pub async fn delete_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(slot_id): IdPath<SlotId>,
) -> ApiResult<NoContent> {
    let service = SlotService::new(state.service_context());
    service.delete_slot(auth.user_id, slot_id).await?;
    Ok(NoContent)
}
