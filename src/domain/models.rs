use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::errors::{InvalidReason, RankingError};

pub type PlayerId = i64;
pub type TeamId = i64;
pub type GroupId = i64;

/// One side of a match: a single player, or a doubles pair.
///
/// Doubles pairs are always held in ascending id order, so {P1, P2} and
/// {P2, P1} are the same side identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Singles(PlayerId),
    Doubles(PlayerId, PlayerId),
}

impl Side {
    /// Build a doubles side with members in canonical order.
    pub fn doubles(a: PlayerId, b: PlayerId) -> Self {
        if a <= b {
            Side::Doubles(a, b)
        } else {
            Side::Doubles(b, a)
        }
    }

    pub fn players(&self) -> Vec<PlayerId> {
        match *self {
            Side::Singles(p) => vec![p],
            Side::Doubles(a, b) => vec![a, b],
        }
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        match *self {
            Side::Singles(p) => p == player,
            Side::Doubles(a, b) => a == player || b == player,
        }
    }

    pub fn is_doubles(&self) -> bool {
        matches!(self, Side::Doubles(_, _))
    }

    fn check(&self) -> Result<(), InvalidReason> {
        match *self {
            Side::Singles(_) => Ok(()),
            Side::Doubles(a, b) if a == b => Err(InvalidReason::DuplicatePartner(a)),
            Side::Doubles(_, _) => Ok(()),
        }
    }

    /// First player shared with the other side, if any.
    fn overlap(&self, other: &Side) -> Option<PlayerId> {
        self.players().into_iter().find(|p| other.contains(*p))
    }
}

/// Result of a match from one participant's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

/// An immutable match result. Created once when a match is submitted and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub id: i64,
    pub side_a: Side,
    pub side_b: Side,
    pub score_a: i32,
    pub score_b: i32,
    pub played_at: NaiveDateTime,
    /// Resolved team identity for doubles side A, set at creation time.
    pub team_a: Option<TeamId>,
    pub team_b: Option<TeamId>,
    pub group_id: Option<GroupId>,
}

impl MatchRecord {
    /// Structural invariants: non-negative scores, well-formed sides, and no
    /// player on both sides.
    pub fn check(&self) -> Result<(), InvalidReason> {
        if self.score_a < 0 || self.score_b < 0 {
            return Err(InvalidReason::NegativeScore);
        }
        self.side_a.check()?;
        self.side_b.check()?;
        if let Some(player) = self.side_a.overlap(&self.side_b) {
            return Err(InvalidReason::SelfPlay(player));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RankingError> {
        self.check()
            .map_err(|reason| RankingError::InvalidRecord { id: self.id, reason })
    }

    pub fn is_tie(&self) -> bool {
        self.score_a == self.score_b
    }

    pub fn outcome_for_a(&self) -> Outcome {
        if self.score_a > self.score_b {
            Outcome::Win
        } else if self.score_a < self.score_b {
            Outcome::Loss
        } else {
            Outcome::Tie
        }
    }

    pub fn outcome_for_b(&self) -> Outcome {
        match self.outcome_for_a() {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }

    pub fn involves_player(&self, player: PlayerId) -> bool {
        self.side_a.contains(player) || self.side_b.contains(player)
    }

    pub fn involves_team(&self, team: TeamId) -> bool {
        self.team_a == Some(team) || self.team_b == Some(team)
    }
}

/// A match submitted through the API, before validation and team resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSubmission {
    /// One player id for singles, two for doubles.
    pub side_a: Vec<PlayerId>,
    pub side_b: Vec<PlayerId>,
    pub score_a: i32,
    pub score_b: i32,
    pub played_at: Option<NaiveDateTime>,
    pub group_id: Option<GroupId>,
}

impl MatchSubmission {
    pub fn sides(&self) -> Result<(Side, Side), RankingError> {
        let side_a = side_from_ids(&self.side_a)?;
        let side_b = side_from_ids(&self.side_b)?;
        if self.score_a < 0 || self.score_b < 0 {
            return Err(RankingError::InvalidSubmission(InvalidReason::NegativeScore));
        }
        if let Some(player) = side_a.overlap(&side_b) {
            return Err(RankingError::InvalidSubmission(InvalidReason::SelfPlay(player)));
        }
        Ok((side_a, side_b))
    }
}

fn side_from_ids(ids: &[PlayerId]) -> Result<Side, RankingError> {
    match ids {
        [] => Err(RankingError::InvalidSubmission(InvalidReason::EmptySide)),
        [p] => Ok(Side::Singles(*p)),
        [a, b] if a == b => Err(RankingError::InvalidSubmission(
            InvalidReason::DuplicatePartner(*a),
        )),
        [a, b] => Ok(Side::doubles(*a, *b)),
        _ => Err(RankingError::InvalidSubmission(InvalidReason::OversizedSide)),
    }
}
