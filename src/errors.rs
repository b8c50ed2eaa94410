use std::fmt;

use thiserror::Error;

use crate::domain::{GroupId, PlayerId, TeamId};

/// Why a match record or submission failed structural validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    NegativeScore,
    SelfPlay(PlayerId),
    DuplicatePartner(PlayerId),
    EmptySide,
    OversizedSide,
    MissingTeamRef,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NegativeScore => write!(f, "negative score"),
            InvalidReason::SelfPlay(player) => {
                write!(f, "player {player} appears on both sides")
            }
            InvalidReason::DuplicatePartner(player) => {
                write!(f, "player {player} listed twice on one side")
            }
            InvalidReason::EmptySide => write!(f, "a side has no players"),
            InvalidReason::OversizedSide => write!(f, "a side has more than two players"),
            InvalidReason::MissingTeamRef => {
                write!(f, "doubles side has no resolved team reference")
            }
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RankingError {
    /// A stored match record violates a structural invariant. Raised at
    /// aggregation input time, never silently skipped.
    #[error("match {id}: {reason}")]
    InvalidRecord { id: i64, reason: InvalidReason },

    /// A match submission failed validation before it reached the store.
    #[error("invalid match submission: {0}")]
    InvalidSubmission(InvalidReason),

    #[error("team {0} not found")]
    TeamNotFound(TeamId),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("player {player} is not a member of team {team}")]
    NotTeamMember { team: TeamId, player: PlayerId },
}
