use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::ranking::types::{AggregatedRecord, EntityId, LeaderboardEntry};

/// Rank aggregated records into an ordered leaderboard.
///
/// Sort key, in descending priority: win percentage (zero eligible games
/// sorts last regardless of other stats), point differential, total wins,
/// then entity id ascending. Entities below `min_games` are excluded.
///
/// Rank numbers follow standard competition ranking: identical
/// (win_pct, point_diff, wins) tuples share a rank and the next distinct
/// tuple gets `previous_rank + tied_count`.
pub fn build_leaderboard(
    records: &BTreeMap<EntityId, AggregatedRecord>,
    names: &HashMap<EntityId, String>,
    min_games: u32,
) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<(EntityId, AggregatedRecord)> = records
        .iter()
        .filter(|(_, record)| record.games() >= min_games)
        .map(|(entity, record)| (*entity, *record))
        .collect();

    ranked.sort_by(|(entity_a, record_a), (entity_b, record_b)| {
        compare_records(record_a, record_b)
            .reverse()
            .then_with(|| entity_a.cmp(entity_b))
    });

    let mut entries = Vec::with_capacity(ranked.len());
    let mut rank = 0;
    for (i, (entity, record)) in ranked.iter().enumerate() {
        let tied_with_previous =
            i > 0 && compare_records(record, &ranked[i - 1].1) == Ordering::Equal;
        if !tied_with_previous {
            rank = i + 1;
        }
        entries.push(LeaderboardEntry {
            entity_id: *entity,
            rank,
            record: *record,
            display_name: names
                .get(entity)
                .cloned()
                .unwrap_or_else(|| entity.to_string()),
        });
    }
    entries
}

/// Total order on records, `Greater` meaning better. Win percentage is
/// compared by integer cross-multiplication to keep floats out of ordering.
fn compare_records(a: &AggregatedRecord, b: &AggregatedRecord) -> Ordering {
    compare_win_pct(a, b)
        .then_with(|| a.point_diff().cmp(&b.point_diff()))
        .then_with(|| a.wins.cmp(&b.wins))
}

fn compare_win_pct(a: &AggregatedRecord, b: &AggregatedRecord) -> Ordering {
    match (a.games(), b.games()) {
        (0, 0) => Ordering::Equal,
        (0, _) => Ordering::Less,
        (_, 0) => Ordering::Greater,
        (games_a, games_b) => {
            // wins_a / games_a  vs  wins_b / games_b
            let lhs = u64::from(a.wins) * u64::from(games_b);
            let rhs = u64::from(b.wins) * u64::from(games_a);
            lhs.cmp(&rhs)
        }
    }
}
