use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::domain::{MatchRecord, Outcome};
use crate::errors::RankingError;
use crate::ranking::aggregate::{self, aggregate};
use crate::ranking::leaderboard::build_leaderboard;
use crate::ranking::types::{EntityId, Granularity, TieHandling};

/// Time bucket for trend sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendBucket {
    Daily,
    Weekly,
    Monthly,
}

impl TrendBucket {
    /// Start date of the bucket containing `at`. Weeks are Monday-anchored.
    pub fn bucket_start(&self, at: NaiveDateTime) -> NaiveDate {
        let date = at.date();
        match self {
            TrendBucket::Daily => date,
            TrendBucket::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            TrendBucket::Monthly => date.with_day(1).unwrap_or(date),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendBucket::Daily => "daily",
            TrendBucket::Weekly => "weekly",
            TrendBucket::Monthly => "monthly",
        }
    }
}

/// Metric sampled at each bucket boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMetric {
    /// Cumulative win percentage over the entity's own matches so far.
    WinPercentage,
    /// The entity's leaderboard rank after replaying every scope match so far.
    Rank,
}

impl TrendMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendMetric::WinPercentage => "win_pct",
            TrendMetric::Rank => "rank",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub bucket_start: NaiveDate,
    pub value: f64,
}

/// Lazy, time-ordered samples of one entity's metric.
///
/// Replays matches chronologically and emits one point per bucket that
/// contains at least one match; empty buckets are omitted, not zero-filled.
/// The series is a plain iterator over owned, pre-sorted input: regenerating
/// it from the same inputs yields the same sequence.
pub struct TrendSeries {
    entity: EntityId,
    metric: TrendMetric,
    bucket: TrendBucket,
    ties: TieHandling,
    matches: Vec<MatchRecord>,
    pos: usize,
    wins: u32,
    losses: u32,
}

impl TrendSeries {
    /// `matches` may arrive in any order; the series sorts them itself.
    /// For [`TrendMetric::WinPercentage`] only the entity's own matches are
    /// replayed; for [`TrendMetric::Rank`] the full set forms the ranking
    /// population at each step.
    pub fn new(
        entity: EntityId,
        metric: TrendMetric,
        bucket: TrendBucket,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
        matches: &[MatchRecord],
        ties: TieHandling,
    ) -> Result<Self, RankingError> {
        for m in matches {
            m.validate()?;
        }

        let mut selected: Vec<MatchRecord> = matches
            .iter()
            .filter(|m| match range {
                Some((from, to)) => m.played_at >= from && m.played_at <= to,
                None => true,
            })
            .filter(|m| match metric {
                TrendMetric::WinPercentage => involves(m, entity),
                TrendMetric::Rank => true,
            })
            .cloned()
            .collect();
        selected.sort_by_key(|m| (m.played_at, m.id));

        if metric == TrendMetric::Rank {
            // Surfaces dangling team refs before iteration starts.
            aggregate(&selected, &[entity], granularity_for(entity), ties)?;
        }

        Ok(Self {
            entity,
            metric,
            bucket,
            ties,
            matches: selected,
            pos: 0,
            wins: 0,
            losses: 0,
        })
    }

    fn absorb(&mut self, m: &MatchRecord) {
        match aggregate::outcomes_for(std::slice::from_ref(m), self.entity).first() {
            Some(Outcome::Win) => self.wins += 1,
            Some(Outcome::Loss) => self.losses += 1,
            Some(Outcome::Tie) | None => {}
        }
    }

    fn win_pct(&self) -> f64 {
        let games = self.wins + self.losses;
        if games == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(games)
        }
    }

    fn rank_so_far(&self) -> Option<f64> {
        let replayed = &self.matches[..self.pos];
        let records =
            aggregate(replayed, &[self.entity], granularity_for(self.entity), self.ties).ok()?;
        let entries = build_leaderboard(&records, &Default::default(), 0);
        entries
            .iter()
            .find(|e| e.entity_id == self.entity)
            .map(|e| e.rank as f64)
    }
}

impl Iterator for TrendSeries {
    type Item = TrendPoint;

    fn next(&mut self) -> Option<TrendPoint> {
        if self.pos >= self.matches.len() {
            return None;
        }

        let bucket_start = self.bucket.bucket_start(self.matches[self.pos].played_at);
        while self.pos < self.matches.len()
            && self.bucket.bucket_start(self.matches[self.pos].played_at) == bucket_start
        {
            let m = self.matches[self.pos].clone();
            self.absorb(&m);
            self.pos += 1;
        }

        let value = match self.metric {
            TrendMetric::WinPercentage => self.win_pct(),
            TrendMetric::Rank => self.rank_so_far()?,
        };
        Some(TrendPoint { bucket_start, value })
    }
}

fn involves(m: &MatchRecord, entity: EntityId) -> bool {
    match entity {
        EntityId::Player(p) => m.involves_player(p),
        EntityId::Team(t) => m.involves_team(t),
    }
}

fn granularity_for(entity: EntityId) -> Granularity {
    match entity {
        EntityId::Player(_) => Granularity::Players,
        EntityId::Team(_) => Granularity::Teams,
    }
}
