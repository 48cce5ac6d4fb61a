//! Syllabus entry API handlers

use crate::api::{ClassFilter, MessageResponse, SuccessResponse};
use crate::domain::{CreateSyllabusEntryInput, StringUuid, UpdateSyllabusEntryInput};
use crate::error::Result;
use crate::middleware::Caller;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// List entries visible to the caller, optionally for one class
pub async fn list<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Query(filter): Query<ClassFilter>,
) -> Result<impl IntoResponse> {
    let entries = state
        .syllabus_service()
        .list(&caller, filter.class_id())
        .await?;
    Ok(Json(SuccessResponse::new(entries)))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let entry = state
        .syllabus_service()
        .get(&caller, StringUuid::from(id))
        .await?;
    Ok(Json(SuccessResponse::new(entry)))
}

pub async fn create<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Json(input): Json<CreateSyllabusEntryInput>,
) -> Result<impl IntoResponse> {
    let entry = state.syllabus_service().create(&caller, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(entry))))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSyllabusEntryInput>,
) -> Result<impl IntoResponse> {
    let entry = state
        .syllabus_service()
        .update(&caller, StringUuid::from(id), input)
        .await?;
    Ok(Json(SuccessResponse::new(entry)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state
        .syllabus_service()
        .delete(&caller, StringUuid::from(id))
        .await?;
    Ok(Json(MessageResponse::new("Syllabus entry deleted successfully")))
}
