use axum::http::StatusCode;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde::Deserialize;

use crate::config::settings::AppConfig;
use crate::errors::RankingError;
use crate::services::ladder::LadderService;

pub mod admin;
pub mod leaderboard;
pub mod matches;
pub mod players;
pub mod teams;

pub struct AppState {
    pub pool: Pool<SqliteConnectionManager>,
    pub config: AppConfig,
}

impl AppState {
    pub fn ladder(&self) -> LadderService {
        LadderService::new(self.pool.clone(), self.config.clone())
    }
}

#[derive(Deserialize)]
pub struct LeaderboardParams {
    pub min_games: Option<u32>,
    pub granularity: Option<String>,
}

#[derive(Deserialize)]
pub struct TrendParams {
    pub metric: Option<String>,
    pub bucket: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub group: Option<i64>,
}

/// Maps domain errors onto HTTP statuses; anything unrecognized is a 500.
pub fn error_status(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<RankingError>() {
        Some(RankingError::InvalidRecord { .. }) | Some(RankingError::InvalidSubmission(_)) => {
            StatusCode::BAD_REQUEST
        }
        Some(RankingError::PlayerNotFound(_))
        | Some(RankingError::TeamNotFound(_))
        | Some(RankingError::GroupNotFound(_)) => StatusCode::NOT_FOUND,
        Some(RankingError::NotTeamMember { .. }) => StatusCode::FORBIDDEN,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
