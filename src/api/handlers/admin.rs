use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::models::TieSettingResponse;
use crate::ranking::TieHandling;

use super::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieSettingBody {
    pub tie_handling: String,
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = std::env::var("ADMIN_TOKEN").unwrap_or_else(|_| "secret".to_string());
    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok());
    auth_header == Some(format!("Bearer {expected}").as_str())
}

pub async fn get_tie_setting(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match state.ladder().tie_handling() {
        Ok(ties) => Json(TieSettingResponse { tie_handling: ties.as_str() }).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{e}")).into_response(),
    }
}

pub async fn put_tie_setting(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<TieSettingBody>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let ties = match body.tie_handling.as_str() {
        "exclude" => TieHandling::Exclude,
        "points_only" => TieHandling::PointsOnly,
        other => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Unknown tie handling: {other}"),
            )
                .into_response();
        }
    };
    match state.ladder().set_tie_handling(ties) {
        Ok(()) => {
            log::info!("Tie handling set to {}", ties.as_str());
            Json(TieSettingResponse { tie_handling: ties.as_str() }).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{e}")).into_response(),
    }
}
