use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::models::TeamResponse;
use crate::domain::{PlayerId, TeamId};
use crate::ranking::EntityId;

use super::players::entity_trend;
use super::{AppState, TrendParams, error_status};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameTeamBody {
    pub player_id: PlayerId,
    pub display_name: String,
}

pub async fn get_team_detail(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> impl IntoResponse {
    match state.ladder().team_detail(team_id) {
        Ok(detail) => Json(TeamResponse::from(detail)).into_response(),
        Err(e) => (error_status(&e), format!("{e}")).into_response(),
    }
}

pub async fn get_team_trend(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
    Query(params): Query<TrendParams>,
) -> impl IntoResponse {
    entity_trend(state, EntityId::Team(team_id), params).await
}

pub async fn post_team_name(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
    Json(body): Json<RenameTeamBody>,
) -> impl IntoResponse {
    let ladder = state.ladder();
    match ladder.rename_team(team_id, body.player_id, &body.display_name) {
        Ok(_) => match ladder.team_detail(team_id) {
            Ok(detail) => Json(TeamResponse::from(detail)).into_response(),
            Err(e) => (error_status(&e), format!("{e}")).into_response(),
        },
        Err(e) => (error_status(&e), format!("{e}")).into_response(),
    }
}
