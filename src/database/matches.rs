use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::params;

use super::connection::DbConn;
use super::models::MatchRow;
use crate::domain::{GroupId, MatchRecord, PlayerId, Side, TeamId};

const MATCH_COLUMNS: &str = "id, side_a_first, side_a_second, side_b_first, side_b_second, score_a, score_b, played_at, team_a, team_b, group_id";

#[allow(clippy::too_many_arguments)]
pub fn insert_match(
    conn: &mut DbConn,
    side_a: Side,
    side_b: Side,
    score_a: i32,
    score_b: i32,
    played_at: NaiveDateTime,
    team_a: Option<TeamId>,
    team_b: Option<TeamId>,
    group_id: Option<GroupId>,
) -> Result<MatchRecord> {
    let sql = format!(
        "INSERT INTO matches (side_a_first, side_a_second, side_b_first, side_b_second, score_a, score_b, played_at, team_a, team_b, group_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING {MATCH_COLUMNS}"
    );

    let (a_first, a_second) = side_columns(side_a);
    let (b_first, b_second) = side_columns(side_b);

    let row = conn
        .query_row(
            &sql,
            params![
                a_first, a_second, b_first, b_second, score_a, score_b, played_at, team_a,
                team_b, group_id
            ],
            parse_match_row,
        )
        .context("Failed to insert match")?;

    Ok(row.into_record())
}

fn side_columns(side: Side) -> (PlayerId, Option<PlayerId>) {
    match side {
        Side::Singles(p) => (p, None),
        Side::Doubles(low, high) => (low, Some(high)),
    }
}

/// Order is unspecified; callers sort chronologically themselves.
pub fn list_all(conn: &mut DbConn) -> Result<Vec<MatchRecord>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches");
    query_records(conn, &sql, params![])
}

pub fn list_by_player(conn: &mut DbConn, player: PlayerId) -> Result<Vec<MatchRecord>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE side_a_first = ?1 OR side_a_second = ?1 OR side_b_first = ?1 OR side_b_second = ?1"
    );
    query_records(conn, &sql, params![player])
}

pub fn list_by_team(conn: &mut DbConn, team: TeamId) -> Result<Vec<MatchRecord>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE team_a = ?1 OR team_b = ?1");
    query_records(conn, &sql, params![team])
}

pub fn list_by_group(conn: &mut DbConn, group: GroupId) -> Result<Vec<MatchRecord>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE group_id = ?1");
    query_records(conn, &sql, params![group])
}

pub fn list_between(
    conn: &mut DbConn,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<MatchRecord>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE played_at >= ?1 AND played_at <= ?2");
    query_records(conn, &sql, params![from, to])
}

fn query_records(
    conn: &mut DbConn,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<MatchRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query matches")?;

    Ok(rows.into_iter().map(MatchRow::into_record).collect())
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRow> {
    Ok(MatchRow {
        id: row.get(0)?,
        side_a_first: row.get(1)?,
        side_a_second: row.get(2)?,
        side_b_first: row.get(3)?,
        side_b_second: row.get(4)?,
        score_a: row.get(5)?,
        score_b: row.get(6)?,
        played_at: row.get(7)?,
        team_a: row.get(8)?,
        team_b: row.get(9)?,
        group_id: row.get(10)?,
    })
}
