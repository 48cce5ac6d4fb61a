//! Announcement API handlers

use crate::api::{ClassFilter, MessageResponse, SuccessResponse};
use crate::domain::{CreateAnnouncementInput, StringUuid, UpdateAnnouncementInput};
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

/// Active announcements, pinned first
pub async fn list<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Query(filter): Query<ClassFilter>,
) -> Result<impl IntoResponse> {
    let announcements = state
        .announcement_service()
        .list_active(&caller, filter.class_id())
        .await?;
    Ok(Json(SuccessResponse::new(announcements)))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let announcement = state
        .announcement_service()
        .get(&caller, StringUuid::from(id))
        .await?;
    Ok(Json(SuccessResponse::new(announcement)))
}

pub async fn create<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Json(input): Json<CreateAnnouncementInput>,
) -> Result<impl IntoResponse> {
    let announcement = state.announcement_service().create(&caller, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(announcement))))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateAnnouncementInput>,
) -> Result<impl IntoResponse> {
    let announcement = state
        .announcement_service()
        .update(&caller, StringUuid::from(id), input)
        .await?;
    Ok(Json(SuccessResponse::new(announcement)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state
        .announcement_service()
        .delete(&caller, StringUuid::from(id))
        .await?;
    Ok(Json(MessageResponse::new("Announcement deleted successfully")))
}
