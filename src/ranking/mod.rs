pub mod aggregate;
pub mod leaderboard;
pub mod scope;
pub mod streak;
pub mod trend;
pub mod types;

pub use aggregate::aggregate;
pub use leaderboard::build_leaderboard;
pub use scope::GroupScope;
pub use streak::current_streak;
pub use trend::{TrendBucket, TrendMetric, TrendPoint, TrendSeries};
pub use types::{AggregatedRecord, EntityId, Granularity, LeaderboardEntry, TieHandling};
