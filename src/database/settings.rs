use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use crate::ranking::TieHandling;

const TIE_HANDLING_KEY: &str = "tie_handling";

pub fn get(conn: &mut DbConn, key: &str) -> Result<Option<String>> {
    let sql = "SELECT value FROM settings WHERE key = ?1";

    conn.query_row(sql, params![key], |row| row.get(0))
        .optional()
        .context("Failed to read setting")
}

pub fn set(conn: &mut DbConn, key: &str, value: &str) -> Result<()> {
    let sql = "INSERT INTO settings (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value";
    conn.execute(sql, params![key, value])
        .context("Failed to write setting")
        .map(|_| ())
}

/// Persisted tie-handling flag; `default` applies when the flag was never
/// set. Threaded into aggregation as an explicit parameter.
pub fn tie_handling(conn: &mut DbConn, default: TieHandling) -> Result<TieHandling> {
    let value = get(conn, TIE_HANDLING_KEY)?;
    Ok(match value.as_deref() {
        Some("points_only") => TieHandling::PointsOnly,
        Some("exclude") => TieHandling::Exclude,
        _ => default,
    })
}

pub fn set_tie_handling(conn: &mut DbConn, ties: TieHandling) -> Result<()> {
    set(conn, TIE_HANDLING_KEY, ties.as_str())
}
