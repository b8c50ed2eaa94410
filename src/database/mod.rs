pub mod connection;
pub mod groups;
pub mod matches;
pub mod models;
pub mod players;
pub mod settings;
pub mod setup;
pub mod teams;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use models::*;

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::Side;

    fn test_conn() -> (DbPool, DbConn) {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        setup::init_schema(&mut conn).unwrap();
        (pool, conn)
    }

    #[test]
    fn team_get_or_create_is_order_insensitive() {
        let (_pool, mut conn) = test_conn();
        let alice = players::insert_player(&mut conn, "Alice").unwrap();
        let bob = players::insert_player(&mut conn, "Bob").unwrap();

        let first = teams::get_or_create(&mut conn, alice.id, bob.id, "Alice & Bob").unwrap();
        let second = teams::get_or_create(&mut conn, bob.id, alice.id, "Bob & Alice").unwrap();

        assert_eq!(first.id, second.id);
        // The first creation wins the name.
        assert_eq!(second.display_name, "Alice & Bob");
        assert_eq!(second.members(), [alice.id, bob.id]);
    }

    #[test]
    fn team_requires_distinct_members() {
        let (_pool, mut conn) = test_conn();
        let alice = players::insert_player(&mut conn, "Alice").unwrap();
        assert!(teams::get_or_create(&mut conn, alice.id, alice.id, "Alice & Alice").is_err());
    }

    #[test]
    fn team_rename_and_cache_roundtrip() {
        let (_pool, mut conn) = test_conn();
        let a = players::insert_player(&mut conn, "A").unwrap();
        let b = players::insert_player(&mut conn, "B").unwrap();
        let team = teams::get_or_create(&mut conn, a.id, b.id, "A & B").unwrap();

        let renamed = teams::rename(&mut conn, team.id, "Smash Bros").unwrap();
        assert_eq!(renamed.display_name, "Smash Bros");

        teams::update_cached_stats(&mut conn, team.id, 3, 1, 1216.0).unwrap();
        let reloaded = teams::find_by_id(&mut conn, team.id).unwrap().unwrap();
        assert_eq!(reloaded.cached_wins, 3);
        assert_eq!(reloaded.cached_losses, 1);
        assert_eq!(reloaded.cached_rating, 1216.0);
    }

    #[test]
    fn match_roundtrips_sides_and_teams() {
        let (_pool, mut conn) = test_conn();
        for name in ["A", "B", "C", "D"] {
            players::insert_player(&mut conn, name).unwrap();
        }
        let team_ab = teams::get_or_create(&mut conn, 1, 2, "A & B").unwrap();
        let team_cd = teams::get_or_create(&mut conn, 3, 4, "C & D").unwrap();

        let played_at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        let record = matches::insert_match(
            &mut conn,
            Side::doubles(2, 1),
            Side::doubles(3, 4),
            11,
            7,
            played_at,
            Some(team_ab.id),
            Some(team_cd.id),
            None,
        )
        .unwrap();

        assert_eq!(record.side_a, Side::Doubles(1, 2));
        assert_eq!(record.team_a, Some(team_ab.id));
        assert_eq!(record.played_at, played_at);

        let by_player = matches::list_by_player(&mut conn, 2).unwrap();
        assert_eq!(by_player.len(), 1);
        let by_team = matches::list_by_team(&mut conn, team_cd.id).unwrap();
        assert_eq!(by_team[0].id, record.id);
    }

    #[test]
    fn group_membership_roundtrip() {
        let (_pool, mut conn) = test_conn();
        let p1 = players::insert_player(&mut conn, "P1").unwrap();
        let p2 = players::insert_player(&mut conn, "P2").unwrap();
        let group = groups::insert_group(&mut conn, "Tuesday Ladder").unwrap();

        groups::add_member(&mut conn, group.id, p1.id).unwrap();
        groups::add_member(&mut conn, group.id, p2.id).unwrap();
        groups::add_member(&mut conn, group.id, p2.id).unwrap();

        let mut members = groups::list_members(&mut conn, group.id).unwrap();
        members.sort_unstable();
        assert_eq!(members, vec![p1.id, p2.id]);
    }

    #[test]
    fn file_backed_pool_persists_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("ladder.db");
        let db_path = db_path.to_str().unwrap();

        {
            let pool = create_pool(db_path).unwrap();
            let mut conn = get_connection(&pool).unwrap();
            setup::init_schema(&mut conn).unwrap();
            players::insert_player(&mut conn, "Alice").unwrap();
        }

        let pool = create_pool(db_path).unwrap();
        let mut conn = get_connection(&pool).unwrap();
        // Schema init is idempotent on an existing database.
        setup::init_schema(&mut conn).unwrap();
        let all = players::list_all(&mut conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].display_name, "Alice");
    }

    #[test]
    fn list_between_bounds_are_inclusive() {
        let (_pool, mut conn) = test_conn();
        players::insert_player(&mut conn, "A").unwrap();
        players::insert_player(&mut conn, "B").unwrap();

        let day = |d: u32| {
            NaiveDate::from_ymd_opt(2024, 6, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        };
        for d in [1, 2, 3] {
            matches::insert_match(
                &mut conn,
                Side::Singles(1),
                Side::Singles(2),
                11,
                7,
                day(d),
                None,
                None,
                None,
            )
            .unwrap();
        }

        let within = matches::list_between(&mut conn, day(1), day(2)).unwrap();
        assert_eq!(within.len(), 2);
        let all = matches::list_between(&mut conn, day(1), day(3)).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn settings_tie_handling_roundtrip() {
        use crate::ranking::TieHandling;

        let (_pool, mut conn) = test_conn();
        assert_eq!(
            settings::tie_handling(&mut conn, TieHandling::Exclude).unwrap(),
            TieHandling::Exclude
        );

        settings::set_tie_handling(&mut conn, TieHandling::PointsOnly).unwrap();
        assert_eq!(
            settings::tie_handling(&mut conn, TieHandling::Exclude).unwrap(),
            TieHandling::PointsOnly
        );
    }
}
