use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::dto::application_dto::{ApplicationPayload, ApplyResponse, SUBMITTED_MESSAGE};
use crate::error::{Error, Result};
use crate::AppState;

#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ApplicationPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected application body");
        Error::MissingFields
    })?;

    let submission = state.intake_service.submit(payload).await?;
    let body = ApplyResponse {
        message: SUBMITTED_MESSAGE.to_string(),
        id: submission.id,
        preview_url: submission.preview_url,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

#[axum::debug_handler]
pub async fn list_applications(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let applications = state.listing_service.list().await?;
    Ok(Json(applications))
}
