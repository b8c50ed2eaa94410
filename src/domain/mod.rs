pub mod models;

pub use models::{
    GroupId, MatchRecord, MatchSubmission, Outcome, PlayerId, Side, TeamId,
};
