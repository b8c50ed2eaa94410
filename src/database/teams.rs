use anyhow::{Context, Result};
use log::warn;
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use super::models::TeamRow;
use crate::domain::{PlayerId, TeamId};
use crate::errors::{InvalidReason, RankingError};

const TEAM_COLUMNS: &str = "id, member_low, member_high, display_name, cached_wins, cached_losses, cached_rating, created_at";

/// Resolve an unordered player pair to its one Team, creating it on first
/// use.
///
/// The sorted pair is covered by a UNIQUE index, and the insert is
/// `INSERT OR IGNORE` followed by a re-select, so two concurrent
/// submissions for the same new pair both observe a single Team.
pub fn get_or_create(
    conn: &mut DbConn,
    a: PlayerId,
    b: PlayerId,
    default_name: &str,
) -> Result<TeamRow> {
    if a == b {
        return Err(RankingError::InvalidSubmission(InvalidReason::DuplicatePartner(a)).into());
    }
    let (low, high) = if a <= b { (a, b) } else { (b, a) };

    if let Some(existing) = find_by_members(conn, low, high)? {
        return Ok(existing);
    }

    let sql = "INSERT OR IGNORE INTO teams (member_low, member_high, display_name) VALUES (?1, ?2, ?3)";
    conn.execute(sql, params![low, high, default_name])
        .context("Failed to insert team")?;

    find_by_members(conn, low, high)?
        .context("Team row missing after insert")
}

/// Earliest-created team for the pair. Duplicates should be impossible under
/// the unique index; legacy rows are tolerated by picking the oldest and
/// logging the anomaly.
fn find_by_members(conn: &mut DbConn, low: PlayerId, high: PlayerId) -> Result<Option<TeamRow>> {
    let sql = format!(
        "SELECT {TEAM_COLUMNS} FROM teams WHERE member_low = ?1 AND member_high = ?2 ORDER BY created_at ASC, id ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![low, high], parse_team_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query team by members")?;

    if rows.len() > 1 {
        warn!(
            "Found {} teams for pair ({low}, {high}); using earliest id {}",
            rows.len(),
            rows[0].id
        );
    }
    Ok(rows.into_iter().next())
}

pub fn find_by_id(conn: &mut DbConn, id: TeamId) -> Result<Option<TeamRow>> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_team_row)
        .optional()
        .context("Failed to query team by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<TeamRow>> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM teams");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_team_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn rename(conn: &mut DbConn, id: TeamId, display_name: &str) -> Result<TeamRow> {
    let sql = format!(
        "UPDATE teams SET display_name = ?1 WHERE id = ?2 RETURNING {TEAM_COLUMNS}"
    );

    conn.query_row(&sql, params![display_name, id], parse_team_row)
        .context("Failed to rename team")
}

/// Write back the advisory stats cache. Never read as ground truth for
/// ranking; leaderboards recompute from match history.
pub fn update_cached_stats(
    conn: &mut DbConn,
    id: TeamId,
    wins: i32,
    losses: i32,
    rating: f64,
) -> Result<()> {
    let sql = "UPDATE teams SET cached_wins = ?1, cached_losses = ?2, cached_rating = ?3 WHERE id = ?4";
    conn.execute(sql, params![wins, losses, rating, id])
        .context("Failed to update cached team stats")
        .map(|_| ())
}

fn parse_team_row(row: &rusqlite::Row) -> rusqlite::Result<TeamRow> {
    Ok(TeamRow {
        id: row.get(0)?,
        member_low: row.get(1)?,
        member_high: row.get(2)?,
        display_name: row.get(3)?,
        cached_wins: row.get(4)?,
        cached_losses: row.get(5)?,
        cached_rating: row.get(6)?,
        created_at: row.get(7)?,
    })
}
