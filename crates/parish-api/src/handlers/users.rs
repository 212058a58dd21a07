//! User handlers
//!
//! Staff management of volunteers and administrators.

use axum::{extract::State, Json};
use parish_core::UserId;
use parish_service::{
    ChangeRoleRequest, CreateUserRequest, ListUsersQuery, SetActiveRequest, UpdateUserRequest,
    UserResponse, UserService,
};

use crate::extractors::{AuthUser, IdPath, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List users
///
/// GET /users?role=&active=&search=
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListUsersQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.list_users(auth.user_id, query).await?;
    Ok(Json(response))
}

/// Create a user
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.create_user(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// The calling user
///
/// GET /users/me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.me(auth.user_id).await?;
    Ok(Json(response))
}

/// Update profile fields
///
/// PATCH /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath<UserId>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_user(auth.user_id, user_id, request).await?;
    Ok(Json(response))
}

/// Change a user's role
///
/// PATCH /users/{user_id}/role
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath<UserId>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.change_role(auth.user_id, user_id, request).await?;
    Ok(Json(response))
}

/// Activate or deactivate a user
///
/// PATCH /users/{user_id}/active
pub async fn set_active(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath<UserId>,
    ValidatedJson(request): ValidatedJson<SetActiveRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.set_active(auth.user_id, user_id, request).await?;
    Ok(Json(response))
}
