use serde::Serialize;

use crate::domain::MatchRecord;
use crate::ranking::{EntityId, LeaderboardEntry, TrendPoint};
use crate::services::ladder::{PlayerSummary, TeamDetail};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryItem {
    pub rank: usize,
    pub entity_type: &'static str,
    pub entity_id: i64,
    pub display_name: String,
    pub wins: u32,
    pub losses: u32,
    pub win_pct: f64,
    pub points_for: i64,
    pub points_against: i64,
    pub point_diff: i64,
    pub streak: i32,
    pub on_fire: bool,
}

impl LeaderboardEntryItem {
    pub fn from_entry(entry: LeaderboardEntry, hot_streak_threshold: u32) -> Self {
        Self {
            rank: entry.rank,
            entity_type: entry.entity_id.kind(),
            entity_id: entry.entity_id.raw(),
            display_name: entry.display_name,
            wins: entry.record.wins,
            losses: entry.record.losses,
            win_pct: entry.record.win_pct(),
            points_for: entry.record.points_for,
            points_against: entry.record.points_against,
            point_diff: entry.record.point_diff(),
            streak: entry.record.streak,
            on_fire: crate::ranking::streak::is_on_fire(entry.record.streak, hot_streak_threshold),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntryItem>,
    pub min_games: u32,
    pub tie_handling: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummaryResponse {
    pub player_id: i64,
    pub display_name: String,
    pub wins: u32,
    pub losses: u32,
    pub win_pct: f64,
    pub point_diff: i64,
    pub streak: i32,
    pub on_fire: bool,
    pub matches_played: usize,
    pub last_played: Option<String>,
}

impl From<PlayerSummary> for PlayerSummaryResponse {
    fn from(summary: PlayerSummary) -> Self {
        Self {
            player_id: summary.player.id,
            display_name: summary.player.display_name,
            wins: summary.record.wins,
            losses: summary.record.losses,
            win_pct: summary.record.win_pct(),
            point_diff: summary.record.point_diff(),
            streak: summary.record.streak,
            on_fire: summary.on_fire,
            matches_played: summary.matches_played,
            last_played: summary.last_played.map(|t| t.to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub team_id: i64,
    pub display_name: String,
    pub members: [i64; 2],
    pub wins: u32,
    pub losses: u32,
    pub win_pct: f64,
    pub point_diff: i64,
    pub streak: i32,
    pub rating: f64,
}

impl From<TeamDetail> for TeamResponse {
    fn from(detail: TeamDetail) -> Self {
        Self {
            team_id: detail.team.id,
            members: detail.team.members(),
            display_name: detail.team.display_name,
            wins: detail.record.wins,
            losses: detail.record.losses,
            win_pct: detail.record.win_pct(),
            point_diff: detail.record.point_diff(),
            streak: detail.record.streak,
            rating: detail.rating,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub match_id: i64,
    pub side_a: Vec<i64>,
    pub side_b: Vec<i64>,
    pub score_a: i32,
    pub score_b: i32,
    pub played_at: String,
    pub team_a: Option<i64>,
    pub team_b: Option<i64>,
    pub group_id: Option<i64>,
}

impl From<MatchRecord> for MatchResponse {
    fn from(record: MatchRecord) -> Self {
        Self {
            match_id: record.id,
            side_a: record.side_a.players(),
            side_b: record.side_b.players(),
            score_a: record.score_a,
            score_b: record.score_b,
            played_at: record.played_at.to_string(),
            team_a: record.team_a,
            team_b: record.team_b,
            group_id: record.group_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPointItem {
    pub bucket_start: String,
    pub value: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse {
    pub entity_type: &'static str,
    pub entity_id: i64,
    pub metric: &'static str,
    pub bucket: &'static str,
    pub points: Vec<TrendPointItem>,
}

impl TrendResponse {
    pub fn new(
        entity: EntityId,
        metric: &'static str,
        bucket: &'static str,
        points: Vec<TrendPoint>,
    ) -> Self {
        Self {
            entity_type: entity.kind(),
            entity_id: entity.raw(),
            metric,
            bucket,
            points: points
                .into_iter()
                .map(|p| TrendPointItem {
                    bucket_start: p.bucket_start.to_string(),
                    value: p.value,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TieSettingResponse {
    pub tie_handling: &'static str,
}
