use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use super::models::PlayerRow;
use crate::domain::PlayerId;

pub fn insert_player(conn: &mut DbConn, display_name: &str) -> Result<PlayerRow> {
    let sql = "INSERT INTO players (display_name) VALUES (?1) RETURNING id, display_name, created_at";

    conn.query_row(sql, params![display_name], parse_player_row)
        .context("Failed to insert player")
}

pub fn find_by_id(conn: &mut DbConn, id: PlayerId) -> Result<Option<PlayerRow>> {
    let sql = "SELECT id, display_name, created_at FROM players WHERE id = ?1";

    conn.query_row(sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<PlayerRow>> {
    let sql = "SELECT id, display_name, created_at FROM players";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerRow> {
    Ok(PlayerRow {
        id: row.get(0)?,
        display_name: row.get(1)?,
        created_at: row.get(2)?,
    })
}
