use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{LeaderboardEntryItem, LeaderboardResponse};
use crate::domain::GroupId;
use crate::ranking::Granularity;

use super::{AppState, LeaderboardParams, error_status};

pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> impl IntoResponse {
    build(state, None, params).await
}

pub async fn get_group_leaderboard(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<GroupId>,
    Query(params): Query<LeaderboardParams>,
) -> impl IntoResponse {
    build(state, Some(group_id), params).await
}

async fn build(
    state: Arc<AppState>,
    group: Option<GroupId>,
    params: LeaderboardParams,
) -> axum::response::Response {
    let min_games = params
        .min_games
        .unwrap_or(state.config.ranking.min_ranked_games);
    let granularity = match params.granularity.as_deref() {
        Some("teams") => Granularity::Teams,
        Some("all") => Granularity::PlayersAndTeams,
        _ => Granularity::Players,
    };

    let ladder = state.ladder();
    let entries = match ladder.build_leaderboard(group, min_games, granularity) {
        Ok(entries) => entries,
        Err(e) => return (error_status(&e), format!("{e}")).into_response(),
    };
    let ties = match ladder.tie_handling() {
        Ok(ties) => ties,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, format!("{e}")).into_response(),
    };

    let threshold = state.config.ranking.hot_streak_threshold;
    Json(LeaderboardResponse {
        entries: entries
            .into_iter()
            .map(|entry| LeaderboardEntryItem::from_entry(entry, threshold))
            .collect(),
        min_games,
        tie_handling: ties.as_str(),
    })
    .into_response()
}
