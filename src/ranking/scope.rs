use std::collections::BTreeSet;

use crate::domain::{MatchRecord, PlayerId};
use crate::ranking::types::EntityId;

/// A named set of players eligible for a scoped leaderboard. Membership is
/// external input; the engine only filters with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupScope {
    members: BTreeSet<PlayerId>,
}

impl GroupScope {
    pub fn new(members: impl IntoIterator<Item = PlayerId>) -> Self {
        Self { members: members.into_iter().collect() }
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.members.contains(&player)
    }

    /// A match counts for the scope only when both sides are fully inside
    /// it, so scoped percentages never reference outsiders.
    pub fn covers(&self, m: &MatchRecord) -> bool {
        m.side_a.players().iter().all(|p| self.contains(*p))
            && m.side_b.players().iter().all(|p| self.contains(*p))
    }

    pub fn filter(&self, matches: &[MatchRecord]) -> Vec<MatchRecord> {
        matches.iter().filter(|m| self.covers(m)).cloned().collect()
    }

    /// Scope members as a leaderboard roster, in id order.
    pub fn roster(&self) -> Vec<EntityId> {
        self.members.iter().copied().map(EntityId::Player).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::Side;

    fn singles(id: i64, a: PlayerId, b: PlayerId) -> MatchRecord {
        MatchRecord {
            id,
            side_a: Side::Singles(a),
            side_b: Side::Singles(b),
            score_a: 11,
            score_b: 7,
            played_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            team_a: None,
            team_b: None,
            group_id: None,
        }
    }

    #[test]
    fn covers_requires_both_sides_inside() {
        let scope = GroupScope::new([1, 2, 3]);
        assert!(scope.covers(&singles(1, 1, 2)));
        // Player 9 is outside the group.
        assert!(!scope.covers(&singles(2, 1, 9)));
    }

    #[test]
    fn filter_drops_outsider_matches() {
        let scope = GroupScope::new([1, 2]);
        let matches = vec![singles(1, 1, 2), singles(2, 1, 5), singles(3, 2, 1)];
        let kept: Vec<i64> = scope.filter(&matches).iter().map(|m| m.id).collect();
        assert_eq!(kept, vec![1, 3]);
    }

    #[test]
    fn roster_lists_members_in_id_order() {
        let scope = GroupScope::new([3, 1, 2]);
        assert_eq!(
            scope.roster(),
            vec![EntityId::Player(1), EntityId::Player(2), EntityId::Player(3)]
        );
    }
}
