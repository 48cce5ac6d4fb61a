//! User API handlers

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{PromoteUserInput, StringUuid, UpdateUserInput};
use crate::error::Result;
use crate::middleware::Caller;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// The caller's own user row
pub async fn me<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
) -> Result<impl IntoResponse> {
    let user = state.user_service().me(&caller).await?;
    Ok(Json(SuccessResponse::new(user)))
}

/// List users visible to the caller
pub async fn list<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (users, total) = state
        .user_service()
        .list(&caller, pagination.offset(), pagination.per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(
        users,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get user by ID
pub async fn get<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.user_service().get(&caller, StringUuid::from(id)).await?;
    Ok(Json(SuccessResponse::new(user)))
}

/// Update own profile
pub async fn update<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service()
        .update(&caller, StringUuid::from(id), input)
        .await?;
    Ok(Json(SuccessResponse::new(user)))
}

/// Change a user's role
pub async fn promote<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(input): Json<PromoteUserInput>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service()
        .promote(&caller, StringUuid::from(id), input)
        .await?;
    Ok(Json(SuccessResponse::new(user)))
}

/// Delete user
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state
        .user_service()
        .delete(&caller, StringUuid::from(id))
        .await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
