use std::collections::BTreeMap;

use crate::domain::{MatchRecord, Outcome};
use crate::errors::{InvalidReason, RankingError};
use crate::ranking::streak;
use crate::ranking::types::{AggregatedRecord, EntityId, Granularity, TieHandling};

/// Fold match records into one [`AggregatedRecord`] per entity.
///
/// `matches` must be sorted by `played_at` ascending; streaks are derived
/// from that ordering. Entities in `roster` are seeded with all-zero records
/// so a player with no matches shows up as 0-0 rather than being absent.
///
/// Every record is validated before any tallying; a malformed record fails
/// the whole computation rather than being silently skipped.
pub fn aggregate(
    matches: &[MatchRecord],
    roster: &[EntityId],
    granularity: Granularity,
    ties: TieHandling,
) -> Result<BTreeMap<EntityId, AggregatedRecord>, RankingError> {
    for m in matches {
        m.validate()?;
        if granularity.includes_teams() {
            check_team_refs(m)?;
        }
    }

    let mut records: BTreeMap<EntityId, AggregatedRecord> = BTreeMap::new();
    let mut outcomes: BTreeMap<EntityId, Vec<Outcome>> = BTreeMap::new();
    for entity in roster {
        records.entry(*entity).or_default();
    }

    for m in matches {
        if m.is_tie() && ties == TieHandling::Exclude {
            // Excluded from tallies, but a tie still interrupts streaks.
            for entity in match_entities(m, granularity) {
                outcomes.entry(entity).or_default().push(Outcome::Tie);
            }
            continue;
        }

        tally_side(&mut records, &mut outcomes, m, SideRef::A, granularity);
        tally_side(&mut records, &mut outcomes, m, SideRef::B, granularity);
    }

    for (entity, record) in records.iter_mut() {
        if let Some(seq) = outcomes.get(entity) {
            record.streak = streak::current_streak(seq);
        }
    }

    Ok(records)
}

#[derive(Clone, Copy)]
enum SideRef {
    A,
    B,
}

fn tally_side(
    records: &mut BTreeMap<EntityId, AggregatedRecord>,
    outcomes: &mut BTreeMap<EntityId, Vec<Outcome>>,
    m: &MatchRecord,
    side: SideRef,
    granularity: Granularity,
) {
    let (outcome, own_score, other_score) = match side {
        SideRef::A => (m.outcome_for_a(), m.score_a, m.score_b),
        SideRef::B => (m.outcome_for_b(), m.score_b, m.score_a),
    };

    for entity in side_entities(m, side, granularity) {
        let record = records.entry(entity).or_default();
        match outcome {
            Outcome::Win => record.wins += 1,
            Outcome::Loss => record.losses += 1,
            Outcome::Tie => {}
        }
        record.points_for += i64::from(own_score);
        record.points_against += i64::from(other_score);
        outcomes.entry(entity).or_default().push(outcome);
    }
}

/// Entities a single side resolves to at the requested granularity.
fn side_entities(m: &MatchRecord, side: SideRef, granularity: Granularity) -> Vec<EntityId> {
    let (side_ref, team_ref) = match side {
        SideRef::A => (&m.side_a, m.team_a),
        SideRef::B => (&m.side_b, m.team_b),
    };

    let mut entities = Vec::new();
    if granularity.includes_players() {
        entities.extend(side_ref.players().into_iter().map(EntityId::Player));
    }
    if granularity.includes_teams() && side_ref.is_doubles() {
        if let Some(team) = team_ref {
            entities.push(EntityId::Team(team));
        }
    }
    entities
}

fn match_entities(m: &MatchRecord, granularity: Granularity) -> Vec<EntityId> {
    let mut entities = side_entities(m, SideRef::A, granularity);
    entities.extend(side_entities(m, SideRef::B, granularity));
    entities
}

fn check_team_refs(m: &MatchRecord) -> Result<(), RankingError> {
    let dangling = (m.side_a.is_doubles() && m.team_a.is_none())
        || (m.side_b.is_doubles() && m.team_b.is_none());
    if dangling {
        return Err(RankingError::InvalidRecord {
            id: m.id,
            reason: InvalidReason::MissingTeamRef,
        });
    }
    Ok(())
}

/// Chronological outcome sequence for one entity, used by trend replay.
pub fn outcomes_for(matches: &[MatchRecord], entity: EntityId) -> Vec<Outcome> {
    matches
        .iter()
        .filter_map(|m| outcome_for(m, entity))
        .collect()
}

fn outcome_for(m: &MatchRecord, entity: EntityId) -> Option<Outcome> {
    let on_a = match entity {
        EntityId::Player(p) => {
            if m.side_a.contains(p) {
                true
            } else if m.side_b.contains(p) {
                false
            } else {
                return None;
            }
        }
        EntityId::Team(t) => {
            if m.team_a == Some(t) && m.side_a.is_doubles() {
                true
            } else if m.team_b == Some(t) && m.side_b.is_doubles() {
                false
            } else {
                return None;
            }
        }
    };
    Some(if on_a { m.outcome_for_a() } else { m.outcome_for_b() })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::{Side, TeamId};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap()
    }

    fn singles(id: i64, a: i64, b: i64, score_a: i32, score_b: i32, d: u32) -> MatchRecord {
        MatchRecord {
            id,
            side_a: Side::Singles(a),
            side_b: Side::Singles(b),
            score_a,
            score_b,
            played_at: day(d),
            team_a: None,
            team_b: None,
            group_id: None,
        }
    }

    fn doubles(
        id: i64,
        a: (i64, i64, TeamId),
        b: (i64, i64, TeamId),
        score_a: i32,
        score_b: i32,
        d: u32,
    ) -> MatchRecord {
        MatchRecord {
            id,
            side_a: Side::doubles(a.0, a.1),
            side_b: Side::doubles(b.0, b.1),
            score_a,
            score_b,
            played_at: day(d),
            team_a: Some(a.2),
            team_b: Some(b.2),
            group_id: None,
        }
    }

    #[test]
    fn roster_seeds_zero_records() {
        let records = aggregate(
            &[],
            &[EntityId::Player(9)],
            Granularity::Players,
            TieHandling::Exclude,
        )
        .unwrap();
        assert_eq!(records[&EntityId::Player(9)], AggregatedRecord::default());
    }

    #[test]
    fn singles_tallies_both_sides() {
        let matches = vec![singles(1, 1, 2, 11, 7, 1)];
        let records =
            aggregate(&matches, &[], Granularity::Players, TieHandling::Exclude).unwrap();

        let winner = records[&EntityId::Player(1)];
        assert_eq!((winner.wins, winner.losses), (1, 0));
        assert_eq!((winner.points_for, winner.points_against), (11, 7));
        assert_eq!(winner.streak, 1);

        let loser = records[&EntityId::Player(2)];
        assert_eq!((loser.wins, loser.losses), (0, 1));
        assert_eq!((loser.points_for, loser.points_against), (7, 11));
        assert_eq!(loser.streak, -1);
    }

    #[test]
    fn doubles_credits_team_and_members() {
        // {Alice=1, Bob=2} beat {Carol=3, Dave=4} 11-7.
        let matches = vec![doubles(1, (1, 2, 10), (3, 4, 11), 11, 7, 1)];
        let records = aggregate(
            &matches,
            &[],
            Granularity::PlayersAndTeams,
            TieHandling::Exclude,
        )
        .unwrap();

        assert_eq!(records[&EntityId::Team(10)].wins, 1);
        assert_eq!(records[&EntityId::Player(1)].wins, 1);
        assert_eq!(records[&EntityId::Player(2)].wins, 1);
        assert_eq!(records[&EntityId::Player(3)].losses, 1);
        assert_eq!(records[&EntityId::Player(4)].losses, 1);
        assert_eq!(records[&EntityId::Team(11)].losses, 1);
    }

    #[test]
    fn team_granularity_ignores_singles() {
        let matches = vec![
            singles(1, 1, 3, 11, 5, 1),
            doubles(2, (1, 2, 10), (3, 4, 11), 11, 9, 2),
        ];
        let records =
            aggregate(&matches, &[], Granularity::Teams, TieHandling::Exclude).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[&EntityId::Team(10)].wins, 1);
    }

    #[test]
    fn excluded_tie_still_breaks_streak() {
        let matches = vec![
            singles(1, 1, 2, 11, 7, 1),
            singles(2, 1, 2, 11, 9, 2),
            singles(3, 1, 2, 8, 8, 3),
        ];
        let records =
            aggregate(&matches, &[], Granularity::Players, TieHandling::Exclude).unwrap();
        let p1 = records[&EntityId::Player(1)];
        assert_eq!((p1.wins, p1.losses), (2, 0));
        // Tie is excluded from tallies but resets the current streak.
        assert_eq!(p1.streak, 0);
        assert_eq!((p1.points_for, p1.points_against), (22, 16));
    }

    #[test]
    fn points_only_ties_count_points_not_games() {
        let matches = vec![singles(1, 1, 2, 8, 8, 1)];
        let records =
            aggregate(&matches, &[], Granularity::Players, TieHandling::PointsOnly).unwrap();
        let p1 = records[&EntityId::Player(1)];
        assert_eq!((p1.wins, p1.losses), (0, 0));
        assert_eq!((p1.points_for, p1.points_against), (8, 8));
        assert_eq!(p1.streak, 0);
    }

    #[test]
    fn invalid_record_fails_the_computation() {
        let matches = vec![singles(7, 1, 1, 11, 7, 1)];
        let err =
            aggregate(&matches, &[], Granularity::Players, TieHandling::Exclude).unwrap_err();
        assert_eq!(
            err,
            RankingError::InvalidRecord { id: 7, reason: InvalidReason::SelfPlay(1) }
        );
    }

    #[test]
    fn dangling_team_ref_is_rejected_at_team_granularity() {
        let mut m = doubles(3, (1, 2, 10), (3, 4, 11), 11, 7, 1);
        m.team_b = None;
        let err = aggregate(
            &[m.clone()],
            &[],
            Granularity::PlayersAndTeams,
            TieHandling::Exclude,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RankingError::InvalidRecord { id: 3, reason: InvalidReason::MissingTeamRef }
        );

        // Player-level aggregation does not need team refs.
        assert!(aggregate(&[m], &[], Granularity::Players, TieHandling::Exclude).is_ok());
    }

    #[test]
    fn wins_plus_losses_match_non_tied_games() {
        let matches = vec![
            singles(1, 1, 2, 11, 7, 1),
            singles(2, 2, 1, 11, 3, 2),
            singles(3, 1, 2, 9, 9, 3),
            singles(4, 1, 2, 12, 10, 4),
        ];
        let records =
            aggregate(&matches, &[], Granularity::Players, TieHandling::Exclude).unwrap();
        let p1 = records[&EntityId::Player(1)];
        let non_tied = matches.iter().filter(|m| !m.is_tie()).count() as u32;
        assert_eq!(p1.wins + p1.losses, non_tied);
    }
}
