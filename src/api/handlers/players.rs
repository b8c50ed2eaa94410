use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::api::models::{PlayerSummaryResponse, TrendResponse};
use crate::domain::PlayerId;
use crate::ranking::{EntityId, TrendBucket, TrendMetric};

use super::{AppState, TrendParams, error_status};

pub async fn get_player_summary(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<PlayerId>,
) -> impl IntoResponse {
    match state.ladder().player_summary(player_id) {
        Ok(summary) => Json(PlayerSummaryResponse::from(summary)).into_response(),
        Err(e) => (error_status(&e), format!("{e}")).into_response(),
    }
}

pub async fn get_player_trend(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<PlayerId>,
    Query(params): Query<TrendParams>,
) -> impl IntoResponse {
    entity_trend(state, EntityId::Player(player_id), params).await
}

/// Shared by the player and team trend endpoints.
pub async fn entity_trend(
    state: Arc<AppState>,
    entity: EntityId,
    params: TrendParams,
) -> axum::response::Response {
    let metric = match params.metric.as_deref() {
        Some("rank") => TrendMetric::Rank,
        _ => TrendMetric::WinPercentage,
    };
    let bucket = match params.bucket.as_deref() {
        Some("daily") => TrendBucket::Daily,
        Some("monthly") => TrendBucket::Monthly,
        _ => TrendBucket::Weekly,
    };

    let range = match parse_range(params.from.as_deref(), params.to.as_deref()) {
        Ok(range) => range,
        Err(msg) => return (StatusCode::BAD_REQUEST, msg).into_response(),
    };

    match state
        .ladder()
        .build_trend(entity, metric, bucket, range, params.group)
    {
        Ok(points) => {
            Json(TrendResponse::new(entity, metric.as_str(), bucket.as_str(), points))
                .into_response()
        }
        Err(e) => (error_status(&e), format!("{e}")).into_response(),
    }
}

fn parse_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Option<(NaiveDateTime, NaiveDateTime)>, String> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => Ok(Some((parse_bound(from)?, parse_bound(to)?))),
        _ => Err("Both 'from' and 'to' are required for a date range".to_string()),
    }
}

/// Accepts a full timestamp or a bare date (midnight).
fn parse_bound(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(parsed) = raw.parse::<NaiveDateTime>() {
        return Ok(parsed);
    }
    raw.parse::<chrono::NaiveDate>()
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("Unparseable date: {raw}"))
}
