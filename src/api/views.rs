//! Derived view endpoints

use crate::api::{ClassFilter, SuccessResponse};
use crate::error::Result;
use crate::middleware::Caller;
use crate::state::HasServices;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

/// Viewers awaiting promotion. Admin only.
pub async fn pending_volunteers<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
) -> Result<impl IntoResponse> {
    let rows = state.dashboard_service().pending_volunteers(&caller).await?;
    Ok(Json(SuccessResponse::new(rows)))
}

/// Syllabus entries joined with their volunteer and class
pub async fn volunteer_dashboard<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Query(filter): Query<ClassFilter>,
) -> Result<impl IntoResponse> {
    let rows = state
        .dashboard_service()
        .volunteer_dashboard(&caller, filter.class_id())
        .await?;
    Ok(Json(SuccessResponse::new(rows)))
}
