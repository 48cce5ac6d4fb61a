//! Class and class assignment API handlers

use crate::api::{MessageResponse, SuccessResponse};
use crate::domain::{CreateClassInput, StringUuid, UpdateClassInput};
use crate::error::Result;
use crate::middleware::Caller;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

pub async fn list<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
) -> Result<impl IntoResponse> {
    let classes = state.class_service().list(&caller).await?;
    Ok(Json(SuccessResponse::new(classes)))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let class = state.class_service().get(&caller, StringUuid::from(id)).await?;
    Ok(Json(SuccessResponse::new(class)))
}

pub async fn create<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Json(input): Json<CreateClassInput>,
) -> Result<impl IntoResponse> {
    let class = state.class_service().create(&caller, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(class))))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateClassInput>,
) -> Result<impl IntoResponse> {
    let class = state
        .class_service()
        .update(&caller, StringUuid::from(id), input)
        .await?;
    Ok(Json(SuccessResponse::new(class)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state
        .class_service()
        .delete(&caller, StringUuid::from(id))
        .await?;
    Ok(Json(MessageResponse::new("Class deleted successfully")))
}

/// Every assignment the caller may see
pub async fn list_assignments<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
) -> Result<impl IntoResponse> {
    let assignments = state.class_service().list_assignments(&caller).await?;
    Ok(Json(SuccessResponse::new(assignments)))
}

/// Assignments of one class
pub async fn class_assignments<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let assignments = state
        .class_service()
        .class_assignments(&caller, StringUuid::from(class_id))
        .await?;
    Ok(Json(SuccessResponse::new(assignments)))
}

/// Assign a user to a class (idempotent)
pub async fn assign<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path((class_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let assignment = state
        .class_service()
        .assign(&caller, StringUuid::from(class_id), StringUuid::from(user_id))
        .await?;
    Ok(Json(SuccessResponse::new(assignment)))
}

pub async fn unassign<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path((class_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    state
        .class_service()
        .unassign(&caller, StringUuid::from(class_id), StringUuid::from(user_id))
        .await?;
    Ok(Json(MessageResponse::new("User removed from class")))
}
