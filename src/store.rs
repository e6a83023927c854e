//! SQLite persistence for generated rooms.
//!
//! The store is the only stateful collaborator: it keeps `{name, time limit,
//! serialized challenge list, generated html}` records and hands the html
//! back byte-for-byte. Challenge lists are stored as a JSON text column so
//! the schema stays a single flat table.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::ChallengeType;

/// One persisted room, as stored and as returned over the API.
#[derive(Clone, Debug, Serialize)]
pub struct RoomRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "timeLimitMinutes")]
    pub time_limit_minutes: u32,
    #[serde(rename = "challenges")]
    pub challenge_types: Vec<ChallengeType>,
    #[serde(rename = "htmlOutput")]
    pub html_output: String,
    #[serde(rename = "createdAt")]
    pub created_at_ms: i64,
}

/// Fields accepted by create; update takes each of them optionally.
#[derive(Debug)]
pub struct NewRoom {
    pub name: String,
    pub time_limit_minutes: u32,
    pub challenge_types: Vec<ChallengeType>,
    pub html_output: String,
}

#[derive(Default)]
pub struct RoomPatch {
    pub name: Option<String>,
    pub time_limit_minutes: Option<u32>,
    pub challenge_types: Option<Vec<ChallengeType>>,
    pub html_output: Option<String>,
}

pub struct RoomStore {
    conn: Connection,
}

impl RoomStore {
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self { conn: Connection::open(path)? })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    pub fn init(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                time_limit_minutes INTEGER NOT NULL,
                challenge_types TEXT NOT NULL,
                html_output TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            COMMIT;",
        )?;
        Ok(())
    }

    pub fn create(&mut self, room: NewRoom, now_ms: i64) -> Result<RoomRecord> {
        let id = Uuid::new_v4().to_string();
        let types_json = serde_json::to_string(&room.challenge_types)?;
        self.conn.execute(
            "INSERT INTO rooms (id, name, time_limit_minutes, challenge_types, html_output, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, room.name, room.time_limit_minutes, types_json, room.html_output, now_ms],
        )?;
        Ok(RoomRecord {
            id,
            name: room.name,
            time_limit_minutes: room.time_limit_minutes,
            challenge_types: room.challenge_types,
            html_output: room.html_output,
            created_at_ms: now_ms,
        })
    }

    pub fn get(&self, id: &str) -> Result<Option<RoomRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, time_limit_minutes, challenge_types, html_output, created_at
                 FROM rooms WHERE id = ?1",
                params![id],
                Self::row_to_record,
            )
            .optional()?;
        row.map(Self::decode_types).transpose()
    }

    /// All rooms, newest first.
    pub fn list(&self) -> Result<Vec<RoomRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, time_limit_minutes, challenge_types, html_output, created_at
             FROM rooms ORDER BY created_at DESC, id",
        )?;
        let rows = stmt.query_map([], Self::row_to_record)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(Self::decode_types(row?)?);
        }
        Ok(out)
    }

    /// Apply the provided fields to an existing record. Returns the updated
    /// record, or `None` when the id is unknown.
    pub fn update(&mut self, id: &str, patch: RoomPatch) -> Result<Option<RoomRecord>> {
        let Some(current) = self.get(id)? else {
            return Ok(None);
        };
        let name = patch.name.unwrap_or(current.name);
        let minutes = patch.time_limit_minutes.unwrap_or(current.time_limit_minutes);
        let types = patch.challenge_types.unwrap_or(current.challenge_types);
        let html = patch.html_output.unwrap_or(current.html_output);
        let types_json = serde_json::to_string(&types)?;
        self.conn.execute(
            "UPDATE rooms SET name = ?2, time_limit_minutes = ?3, challenge_types = ?4, html_output = ?5
             WHERE id = ?1",
            params![id, name, minutes, types_json, html],
        )?;
        Ok(Some(RoomRecord {
            id: id.to_string(),
            name,
            time_limit_minutes: minutes,
            challenge_types: types,
            html_output: html,
            created_at_ms: current.created_at_ms,
        }))
    }

    /// Returns false when the id is unknown.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let n = self.conn.execute("DELETE FROM rooms WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(RoomRecord, String)> {
        Ok((
            RoomRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                time_limit_minutes: row.get(2)?,
                challenge_types: Vec::new(),
                html_output: row.get(4)?,
                created_at_ms: row.get(5)?,
            },
            row.get(3)?,
        ))
    }

    fn decode_types((mut record, types_json): (RoomRecord, String)) -> Result<RoomRecord> {
        record.challenge_types = serde_json::from_str(&types_json)?;
        Ok(record)
    }
}
