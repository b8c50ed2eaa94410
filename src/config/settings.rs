use crate::ranking::TieHandling;

#[derive(Debug, Clone)]
pub struct RankingSettings {
    /// Applies when no persisted tie-handling flag exists.
    pub default_tie_handling: TieHandling,
    /// Default minimum games before an entity is ranked; callers may
    /// override per query.
    pub min_ranked_games: u32,
    /// Consecutive wins before a player counts as "on fire".
    pub hot_streak_threshold: u32,
    pub base_team_rating: f64,
    /// Rating points per net win in the cached team rating.
    pub rating_step: f64,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            default_tie_handling: TieHandling::Exclude,
            min_ranked_games: 0,
            hot_streak_threshold: 3,
            base_team_rating: 1200.0,
            rating_step: 8.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub ranking: RankingSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

// Passed explicitly (dependency injection) rather than read from globals.
