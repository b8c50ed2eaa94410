use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::api::handlers::{
    AppState,
    admin::{get_tie_setting, put_tie_setting},
    leaderboard::{get_group_leaderboard, get_leaderboard},
    matches::post_match,
    players::{get_player_summary, get_player_trend},
    teams::{get_team_detail, get_team_trend, post_team_name},
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/groups/:group_id/leaderboard", get(get_group_leaderboard))
        .route("/api/matches", post(post_match))
        .route("/api/player/:id", get(get_player_summary))
        .route("/api/player/:id/trend", get(get_player_trend))
        .route("/api/team/:id", get(get_team_detail))
        .route("/api/team/:id/trend", get(get_team_trend))
        .route("/api/team/:id/name", post(post_team_name))
        .route(
            "/api/admin/settings/ties",
            get(get_tie_setting).put(put_tie_setting),
        )
        .with_state(state)
}
