use chrono::NaiveDateTime;

use crate::domain::{GroupId, MatchRecord, PlayerId, Side, TeamId};

#[derive(Debug, Clone)]
pub struct PlayerRow {
    pub id: PlayerId,
    pub display_name: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct TeamRow {
    pub id: TeamId,
    /// Member pair in canonical ascending order.
    pub member_low: PlayerId,
    pub member_high: PlayerId,
    pub display_name: String,
    /// Advisory cache, always recomputable from match history.
    pub cached_wins: i32,
    pub cached_losses: i32,
    pub cached_rating: f64,
    pub created_at: Option<NaiveDateTime>,
}

impl TeamRow {
    pub fn members(&self) -> [PlayerId; 2] {
        [self.member_low, self.member_high]
    }

    pub fn has_member(&self, player: PlayerId) -> bool {
        self.member_low == player || self.member_high == player
    }
}

#[derive(Debug, Clone)]
pub struct GroupRow {
    pub id: GroupId,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}

/// Raw matches row; converts into the domain record.
#[derive(Debug, Clone)]
pub struct MatchRow {
    pub id: i64,
    pub side_a_first: PlayerId,
    pub side_a_second: Option<PlayerId>,
    pub side_b_first: PlayerId,
    pub side_b_second: Option<PlayerId>,
    pub score_a: i32,
    pub score_b: i32,
    pub played_at: NaiveDateTime,
    pub team_a: Option<TeamId>,
    pub team_b: Option<TeamId>,
    pub group_id: Option<GroupId>,
}

impl MatchRow {
    pub fn into_record(self) -> MatchRecord {
        MatchRecord {
            id: self.id,
            side_a: side_from_columns(self.side_a_first, self.side_a_second),
            side_b: side_from_columns(self.side_b_first, self.side_b_second),
            score_a: self.score_a,
            score_b: self.score_b,
            played_at: self.played_at,
            team_a: self.team_a,
            team_b: self.team_b,
            group_id: self.group_id,
        }
    }
}

fn side_from_columns(first: PlayerId, second: Option<PlayerId>) -> Side {
    match second {
        Some(partner) => Side::doubles(first, partner),
        None => Side::Singles(first),
    }
}
