use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Match, MatchId, MatchInput, MatchUpdate};

/// Map body-parsing failures: well-formed JSON of the wrong shape is a
/// validation failure, anything else is a bad request.
fn body_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(e) => ApiError::Validation(e.body_text()),
        other => ApiError::BadRequest(other.body_text()),
    }
}

pub async fn list_matches(State(state): State<AppState>) -> Result<Json<Vec<Match>>, ApiError> {
    let matches = state.store.find_all().await?;
    Ok(Json(matches))
}

pub async fn create_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    let Json(input) = payload.map_err(body_error)?;
    let created = state.store.create(input).await?;

    info!(
        "Created match {} ({} vs {}, {})",
        created.id, created.team1, created.team2, created.date
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchUpdate>, JsonRejection>,
) -> Result<Json<Match>, ApiError> {
    let Json(update) = payload.map_err(body_error)?;
    let id = update
        .id
        .filter(|id| !id.as_str().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Match ID is required".to_string()))?;

    let updated = state.store.update(&id, update.input).await?;

    info!("Updated match {}", updated.id);
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: MatchId,
}

pub async fn delete_match(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .map(MatchId::from)
        .ok_or_else(|| ApiError::BadRequest("Match ID is required".to_string()))?;

    let removed = state.store.delete(&id).await?;

    info!("Deleted match {}", removed.id);
    Ok(Json(DeleteResponse {
        message: "Match deleted successfully".to_string(),
        id: removed.id,
    }))
}
