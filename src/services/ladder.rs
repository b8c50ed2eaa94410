use std::collections::HashMap;

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use log::info;

use crate::config::settings::AppConfig;
use crate::database::{self, DbConn, DbPool, PlayerRow, TeamRow};
use crate::domain::{GroupId, MatchRecord, MatchSubmission, PlayerId, Side, TeamId};
use crate::errors::RankingError;
use crate::ranking::{
    self, AggregatedRecord, EntityId, Granularity, GroupScope, LeaderboardEntry, TieHandling,
    TrendBucket, TrendMetric, TrendPoint, TrendSeries, streak,
};

/// Profile stats for one player: record, streak, activity.
#[derive(Debug, Clone)]
pub struct PlayerSummary {
    pub player: PlayerRow,
    pub record: AggregatedRecord,
    pub matches_played: usize,
    pub last_played: Option<NaiveDateTime>,
    pub on_fire: bool,
}

/// A team with its freshly recomputed record.
#[derive(Debug, Clone)]
pub struct TeamDetail {
    pub team: TeamRow,
    pub record: AggregatedRecord,
    pub rating: f64,
}

/// Orchestrates the ranking engine over the match store. All computations
/// are read-only replays of the raw match history; the one concurrency-safe
/// write is team get-or-create.
pub struct LadderService {
    pool: DbPool,
    config: AppConfig,
}

impl LadderService {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self { pool, config }
    }

    fn conn(&self) -> Result<DbConn> {
        database::get_connection(&self.pool)
    }

    /// Validate a submission, resolve doubles teams, and persist the record.
    /// Team resolution completes before the insert so a stored match never
    /// holds a dangling team reference.
    pub fn record_match(&self, submission: &MatchSubmission) -> Result<MatchRecord> {
        let (side_a, side_b) = submission.sides()?;
        let mut conn = self.conn()?;

        for player in side_a.players().into_iter().chain(side_b.players()) {
            if database::players::find_by_id(&mut conn, player)?.is_none() {
                return Err(RankingError::PlayerNotFound(player).into());
            }
        }
        if let Some(group) = submission.group_id {
            if database::groups::find_by_id(&mut conn, group)?.is_none() {
                return Err(RankingError::GroupNotFound(group).into());
            }
        }

        let team_a = self.resolve_side_team(&mut conn, side_a)?;
        let team_b = self.resolve_side_team(&mut conn, side_b)?;
        let played_at = submission
            .played_at
            .unwrap_or_else(|| Utc::now().naive_utc());

        let record = database::matches::insert_match(
            &mut conn,
            side_a,
            side_b,
            submission.score_a,
            submission.score_b,
            played_at,
            team_a,
            team_b,
            submission.group_id,
        )?;

        info!(
            "Recorded match {} ({:?} {} - {} {:?})",
            record.id, record.side_a, record.score_a, record.score_b, record.side_b
        );
        Ok(record)
    }

    fn resolve_side_team(&self, conn: &mut DbConn, side: Side) -> Result<Option<TeamId>> {
        match side {
            Side::Singles(_) => Ok(None),
            Side::Doubles(a, b) => {
                let team = self.get_or_create_team_on(conn, a, b)?;
                Ok(Some(team.id))
            }
        }
    }

    pub fn get_or_create_team(&self, a: PlayerId, b: PlayerId) -> Result<TeamRow> {
        let mut conn = self.conn()?;
        self.get_or_create_team_on(&mut conn, a, b)
    }

    fn get_or_create_team_on(
        &self,
        conn: &mut DbConn,
        a: PlayerId,
        b: PlayerId,
    ) -> Result<TeamRow> {
        let default_name = self.default_team_name(conn, a, b)?;
        database::teams::get_or_create(conn, a, b, &default_name)
    }

    /// "Alice & Bob", members in canonical id order.
    fn default_team_name(&self, conn: &mut DbConn, a: PlayerId, b: PlayerId) -> Result<String> {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_name = self.player_name(conn, low)?;
        let high_name = self.player_name(conn, high)?;
        Ok(format!("{low_name} & {high_name}"))
    }

    fn player_name(&self, conn: &mut DbConn, player: PlayerId) -> Result<String> {
        database::players::find_by_id(conn, player)?
            .map(|row| row.display_name)
            .ok_or_else(|| RankingError::PlayerNotFound(player).into())
    }

    /// Build a ranked leaderboard. With a group, scope filtering happens
    /// BEFORE aggregation: only matches with both sides fully inside the
    /// group count, so scoped percentages are internally consistent.
    pub fn build_leaderboard(
        &self,
        group: Option<GroupId>,
        min_games: u32,
        granularity: Granularity,
    ) -> Result<Vec<LeaderboardEntry>> {
        let mut conn = self.conn()?;
        let ties = self.tie_handling_on(&mut conn)?;

        let mut matches = database::matches::list_all(&mut conn)?;
        let roster;
        match group {
            Some(group_id) => {
                if database::groups::find_by_id(&mut conn, group_id)?.is_none() {
                    return Err(RankingError::GroupNotFound(group_id).into());
                }
                let members = database::groups::list_members(&mut conn, group_id)?;
                let scope = GroupScope::new(members);
                if scope.is_empty() {
                    return Ok(Vec::new());
                }
                matches = scope.filter(&matches);
                roster = scope.roster();
            }
            None => {
                roster = self.full_roster(&mut conn, granularity)?;
            }
        }

        sort_chronologically(&mut matches);
        let records = ranking::aggregate(&matches, &roster, granularity, ties)?;
        let names = self.display_names(&mut conn)?;
        Ok(ranking::build_leaderboard(&records, &names, min_games))
    }

    fn full_roster(&self, conn: &mut DbConn, granularity: Granularity) -> Result<Vec<EntityId>> {
        let mut roster = Vec::new();
        if granularity.includes_players() {
            roster.extend(
                database::players::list_all(conn)?
                    .into_iter()
                    .map(|p| EntityId::Player(p.id)),
            );
        }
        if granularity.includes_teams() {
            roster.extend(
                database::teams::list_all(conn)?
                    .into_iter()
                    .map(|t| EntityId::Team(t.id)),
            );
        }
        Ok(roster)
    }

    fn display_names(&self, conn: &mut DbConn) -> Result<HashMap<EntityId, String>> {
        let mut names = HashMap::new();
        for player in database::players::list_all(conn)? {
            names.insert(EntityId::Player(player.id), player.display_name);
        }
        for team in database::teams::list_all(conn)? {
            names.insert(EntityId::Team(team.id), team.display_name);
        }
        Ok(names)
    }

    pub fn player_summary(&self, player: PlayerId) -> Result<PlayerSummary> {
        let mut conn = self.conn()?;
        let row = database::players::find_by_id(&mut conn, player)?
            .ok_or(RankingError::PlayerNotFound(player))?;

        let ties = self.tie_handling_on(&mut conn)?;
        let mut matches = database::matches::list_by_player(&mut conn, player)?;
        sort_chronologically(&mut matches);

        let entity = EntityId::Player(player);
        let records = ranking::aggregate(&matches, &[entity], Granularity::Players, ties)?;
        let record = records.get(&entity).copied().unwrap_or_default();

        Ok(PlayerSummary {
            player: row,
            record,
            matches_played: matches.len(),
            last_played: matches.last().map(|m| m.played_at),
            on_fire: streak::is_on_fire(record.streak, self.config.ranking.hot_streak_threshold),
        })
    }

    /// Team profile with stats recomputed from the raw match history. The
    /// cached columns on the team row are refreshed as a side effect but are
    /// never the source of the returned record.
    pub fn team_detail(&self, team: TeamId) -> Result<TeamDetail> {
        let mut conn = self.conn()?;
        let row = database::teams::find_by_id(&mut conn, team)?
            .ok_or(RankingError::TeamNotFound(team))?;

        let ties = self.tie_handling_on(&mut conn)?;
        let mut matches = database::matches::list_by_team(&mut conn, team)?;
        sort_chronologically(&mut matches);

        let entity = EntityId::Team(team);
        let records = ranking::aggregate(&matches, &[entity], Granularity::Teams, ties)?;
        let record = records.get(&entity).copied().unwrap_or_default();
        let rating = self.team_rating(&record);

        database::teams::update_cached_stats(
            &mut conn,
            team,
            record.wins as i32,
            record.losses as i32,
            rating,
        )?;

        Ok(TeamDetail { team: row, record, rating })
    }

    fn team_rating(&self, record: &AggregatedRecord) -> f64 {
        let net_wins = i64::from(record.wins) - i64::from(record.losses);
        self.config.ranking.base_team_rating + self.config.ranking.rating_step * net_wins as f64
    }

    /// Either member may override the team display name; anyone else is
    /// rejected.
    pub fn rename_team(&self, team: TeamId, by: PlayerId, display_name: &str) -> Result<TeamRow> {
        let mut conn = self.conn()?;
        let row = database::teams::find_by_id(&mut conn, team)?
            .ok_or(RankingError::TeamNotFound(team))?;
        if !row.has_member(by) {
            return Err(RankingError::NotTeamMember { team, player: by }.into());
        }
        database::teams::rename(&mut conn, team, display_name)
    }

    pub fn build_trend(
        &self,
        entity: EntityId,
        metric: TrendMetric,
        bucket: TrendBucket,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
        group: Option<GroupId>,
    ) -> Result<Vec<TrendPoint>> {
        let mut conn = self.conn()?;
        let ties = self.tie_handling_on(&mut conn)?;

        let matches = match group {
            Some(group_id) => {
                if database::groups::find_by_id(&mut conn, group_id)?.is_none() {
                    return Err(RankingError::GroupNotFound(group_id).into());
                }
                database::matches::list_by_group(&mut conn, group_id)?
            }
            None => match range {
                Some((from, to)) => database::matches::list_between(&mut conn, from, to)?,
                None => database::matches::list_all(&mut conn)?,
            },
        };

        let series = TrendSeries::new(entity, metric, bucket, range, &matches, ties)?;
        Ok(series.collect())
    }

    pub fn tie_handling(&self) -> Result<TieHandling> {
        let mut conn = self.conn()?;
        self.tie_handling_on(&mut conn)
    }

    fn tie_handling_on(&self, conn: &mut DbConn) -> Result<TieHandling> {
        database::settings::tie_handling(conn, self.config.ranking.default_tie_handling)
    }

    pub fn set_tie_handling(&self, ties: TieHandling) -> Result<()> {
        let mut conn = self.conn()?;
        database::settings::set_tie_handling(&mut conn, ties)
    }
}

/// The store returns matches in unspecified order; all replays sort here.
fn sort_chronologically(matches: &mut [MatchRecord]) {
    matches.sort_by_key(|m| (m.played_at, m.id));
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::database::{create_memory_pool, get_connection, setup};

    fn service() -> LadderService {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        setup::init_schema(&mut conn).unwrap();
        LadderService::new(pool, AppConfig::new())
    }

    fn add_players(service: &LadderService, names: &[&str]) -> Vec<PlayerId> {
        let mut conn = service.conn().unwrap();
        names
            .iter()
            .map(|name| database::players::insert_player(&mut conn, name).unwrap().id)
            .collect()
    }

    fn submit(
        service: &LadderService,
        side_a: Vec<PlayerId>,
        side_b: Vec<PlayerId>,
        score_a: i32,
        score_b: i32,
        day: u32,
    ) -> MatchRecord {
        service
            .record_match(&MatchSubmission {
                side_a,
                side_b,
                score_a,
                score_b,
                played_at: NaiveDate::from_ymd_opt(2024, 6, day)
                    .unwrap()
                    .and_hms_opt(18, 0, 0),
                group_id: None,
            })
            .unwrap()
    }

    #[test]
    fn doubles_submission_resolves_teams() {
        let service = service();
        let ids = add_players(&service, &["Alice", "Bob", "Carol", "Dave"]);

        let record = submit(
            &service,
            vec![ids[1], ids[0]],
            vec![ids[2], ids[3]],
            11,
            7,
            1,
        );
        let team_a = record.team_a.unwrap();

        // Same pair in either order resolves to the same team.
        let again = service.get_or_create_team(ids[0], ids[1]).unwrap();
        assert_eq!(again.id, team_a);
        assert_eq!(again.display_name, "Alice & Bob");

        // Team stats show one win; members' individual records reflect it.
        let detail = service.team_detail(team_a).unwrap();
        assert_eq!(detail.record.wins, 1);

        let alice = service.player_summary(ids[0]).unwrap();
        assert_eq!(alice.record.wins, 1);
        let carol = service.player_summary(ids[2]).unwrap();
        assert_eq!(carol.record.losses, 1);
    }

    #[test]
    fn leaderboard_applies_min_games() {
        let service = service();
        let ids = add_players(&service, &["P1", "P2", "P3"]);

        submit(&service, vec![ids[0]], vec![ids[1]], 11, 7, 1);
        submit(&service, vec![ids[0]], vec![ids[1]], 11, 9, 2);

        let entries = service
            .build_leaderboard(None, 1, Granularity::Players)
            .unwrap();
        let ranked: Vec<(EntityId, usize)> =
            entries.iter().map(|e| (e.entity_id, e.rank)).collect();
        // P3 has no games and is excluded at min_games=1.
        assert_eq!(
            ranked,
            vec![(EntityId::Player(ids[0]), 1), (EntityId::Player(ids[1]), 2)]
        );
    }

    #[test]
    fn group_leaderboard_excludes_outsider_matches() {
        let service = service();
        let ids = add_players(&service, &["In1", "In2", "Out"]);
        let group = {
            let mut conn = service.conn().unwrap();
            let group = database::groups::insert_group(&mut conn, "Club").unwrap();
            database::groups::add_member(&mut conn, group.id, ids[0]).unwrap();
            database::groups::add_member(&mut conn, group.id, ids[1]).unwrap();
            group
        };

        // In1 beats In2 inside the group; In2 beats the outsider heavily.
        submit(&service, vec![ids[0]], vec![ids[1]], 11, 5, 1);
        submit(&service, vec![ids[1]], vec![ids[2]], 11, 0, 2);

        let entries = service
            .build_leaderboard(Some(group.id), 0, Granularity::Players)
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entity_id, EntityId::Player(ids[0]));
        // In2's record only counts the in-group loss.
        assert_eq!(entries[1].record.wins, 0);
        assert_eq!(entries[1].record.losses, 1);
    }

    #[test]
    fn empty_group_ranks_members_tied_at_zero() {
        let service = service();
        let ids = add_players(&service, &["A", "B"]);
        let group = {
            let mut conn = service.conn().unwrap();
            let group = database::groups::insert_group(&mut conn, "Quiet").unwrap();
            for id in &ids {
                database::groups::add_member(&mut conn, group.id, *id).unwrap();
            }
            group
        };

        let entries = service
            .build_leaderboard(Some(group.id), 0, Granularity::Players)
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.rank == 1));
        assert!(entries.iter().all(|e| e.record.games() == 0));
    }

    #[test]
    fn summary_tracks_streak_and_activity() {
        let service = service();
        let ids = add_players(&service, &["P1", "P2"]);

        submit(&service, vec![ids[0]], vec![ids[1]], 11, 7, 1);
        submit(&service, vec![ids[0]], vec![ids[1]], 11, 9, 2);
        submit(&service, vec![ids[0]], vec![ids[1]], 11, 8, 3);

        let summary = service.player_summary(ids[0]).unwrap();
        assert_eq!(summary.record.streak, 3);
        assert!(summary.on_fire);
        assert_eq!(summary.matches_played, 3);
        assert_eq!(
            summary.last_played,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(18, 0, 0)
        );
    }

    #[test]
    fn trend_final_bucket_matches_summary() {
        let service = service();
        let ids = add_players(&service, &["P1", "P2"]);

        submit(&service, vec![ids[0]], vec![ids[1]], 11, 7, 3);
        submit(&service, vec![ids[0]], vec![ids[1]], 5, 11, 10);
        submit(&service, vec![ids[0]], vec![ids[1]], 11, 2, 17);

        let points = service
            .build_trend(
                EntityId::Player(ids[0]),
                TrendMetric::WinPercentage,
                TrendBucket::Weekly,
                None,
                None,
            )
            .unwrap();
        let summary = service.player_summary(ids[0]).unwrap();
        assert_eq!(points.last().unwrap().value, summary.record.win_pct());
    }

    #[test]
    fn rename_requires_membership() {
        let service = service();
        let ids = add_players(&service, &["A", "B", "C"]);
        let team = service.get_or_create_team(ids[0], ids[1]).unwrap();

        let err = service
            .rename_team(team.id, ids[2], "Impostors")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RankingError>(),
            Some(&RankingError::NotTeamMember { team: team.id, player: ids[2] })
        );

        let renamed = service.rename_team(team.id, ids[0], "Dream Team").unwrap();
        assert_eq!(renamed.display_name, "Dream Team");
    }

    #[test]
    fn unknown_player_is_rejected_before_insert() {
        let service = service();
        let ids = add_players(&service, &["A"]);
        let err = service
            .record_match(&MatchSubmission {
                side_a: vec![ids[0]],
                side_b: vec![999],
                score_a: 11,
                score_b: 7,
                played_at: None,
                group_id: None,
            })
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RankingError>(),
            Some(&RankingError::PlayerNotFound(999))
        );
    }

    #[test]
    fn tie_setting_flows_into_aggregation() {
        let service = service();
        let ids = add_players(&service, &["P1", "P2"]);
        submit(&service, vec![ids[0]], vec![ids[1]], 9, 9, 1);

        let summary = service.player_summary(ids[0]).unwrap();
        assert_eq!(summary.record.points_for, 0);

        service.set_tie_handling(TieHandling::PointsOnly).unwrap();
        let summary = service.player_summary(ids[0]).unwrap();
        assert_eq!(summary.record.points_for, 9);
        assert_eq!(summary.record.games(), 0);
    }
}
