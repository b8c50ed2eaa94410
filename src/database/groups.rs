use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use super::models::GroupRow;
use crate::domain::{GroupId, PlayerId};

pub fn insert_group(conn: &mut DbConn, name: &str) -> Result<GroupRow> {
    let sql = "INSERT INTO groups (name) VALUES (?1) RETURNING id, name, created_at";

    conn.query_row(sql, params![name], parse_group_row)
        .context("Failed to insert group")
}

pub fn find_by_id(conn: &mut DbConn, id: GroupId) -> Result<Option<GroupRow>> {
    let sql = "SELECT id, name, created_at FROM groups WHERE id = ?1";

    conn.query_row(sql, params![id], parse_group_row)
        .optional()
        .context("Failed to query group by id")
}

pub fn add_member(conn: &mut DbConn, group: GroupId, player: PlayerId) -> Result<()> {
    let sql = "INSERT OR IGNORE INTO group_members (group_id, player_id) VALUES (?1, ?2)";
    conn.execute(sql, params![group, player])
        .context("Failed to add group member")
        .map(|_| ())
}

pub fn list_members(conn: &mut DbConn, group: GroupId) -> Result<Vec<PlayerId>> {
    let sql = "SELECT player_id FROM group_members WHERE group_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![group], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list group members")?;

    Ok(rows)
}

fn parse_group_row(row: &rusqlite::Row) -> rusqlite::Result<GroupRow> {
    Ok(GroupRow {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}
