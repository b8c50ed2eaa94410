use std::fmt;

use serde::Serialize;

use crate::domain::{PlayerId, TeamId};

/// An entity that can appear on a leaderboard.
///
/// The derived `Ord` (variant order, then id) is the final deterministic
/// tie-break in leaderboard sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Player(PlayerId),
    Team(TeamId),
}

impl EntityId {
    pub fn kind(&self) -> &'static str {
        match self {
            EntityId::Player(_) => "player",
            EntityId::Team(_) => "team",
        }
    }

    pub fn raw(&self) -> i64 {
        match *self {
            EntityId::Player(id) => id,
            EntityId::Team(id) => id,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.raw())
    }
}

/// Win/loss/points tally for one entity, computed per query. Never persisted
/// as a source of truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedRecord {
    pub wins: u32,
    pub losses: u32,
    pub points_for: i64,
    pub points_against: i64,
    /// Positive N: N consecutive wins ending at the most recent match.
    /// Negative N: N consecutive losses. Zero: no matches, or a tie last.
    pub streak: i32,
}

impl AggregatedRecord {
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(games)
        }
    }

    pub fn point_diff(&self) -> i64 {
        self.points_for - self.points_against
    }
}

/// How tied scores participate in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieHandling {
    /// Ties contribute nothing to the tallies.
    #[default]
    Exclude,
    /// Ties count into points for/against but never into wins/losses.
    PointsOnly,
}

impl TieHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            TieHandling::Exclude => "exclude",
            TieHandling::PointsOnly => "points_only",
        }
    }
}

/// Which entities a doubles side resolves to during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Each member individually; a player's record combines singles and
    /// doubles play.
    Players,
    /// Only the team identity; singles matches are ignored.
    Teams,
    PlayersAndTeams,
}

impl Granularity {
    pub fn includes_players(&self) -> bool {
        matches!(self, Granularity::Players | Granularity::PlayersAndTeams)
    }

    pub fn includes_teams(&self) -> bool {
        matches!(self, Granularity::Teams | Granularity::PlayersAndTeams)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub entity_id: EntityId,
    /// 1-based; tied (win_pct, point_diff, wins) tuples share a rank.
    pub rank: usize,
    pub record: AggregatedRecord,
    pub display_name: String,
}
