use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::MatchResponse;
use crate::domain::MatchSubmission;

use super::{AppState, error_status};

pub async fn post_match(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<MatchSubmission>,
) -> impl IntoResponse {
    match state.ladder().record_match(&submission) {
        Ok(record) => (StatusCode::CREATED, Json(MatchResponse::from(record))).into_response(),
        Err(e) => (error_status(&e), format!("{e}")).into_response(),
    }
}
