// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local SQLite store: settings plus the last successfully fetched copy of
//! each collection.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

use crate::models::{parse_record_date, Kind, Transaction};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Cashboard", "cashboard"));

/// Cached copy of one collection.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Vec<Transaction>,
    pub fetched_at: DateTime<Utc>,
}

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("cashboard.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS snapshots(
        kind TEXT PRIMARY KEY CHECK(kind IN ('income','expense')),
        fetched_at TEXT NOT NULL
    );

    -- amount/date are NULL when the server sent something unparsable
    CREATE TABLE IF NOT EXISTS records(
        kind TEXT NOT NULL,
        id TEXT NOT NULL,
        position INTEGER NOT NULL,
        title TEXT NOT NULL,
        amount TEXT,
        date TEXT,
        description TEXT,
        PRIMARY KEY(kind, id)
    );
    CREATE INDEX IF NOT EXISTS idx_records_position ON records(kind, position);
    "#,
    )?;
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Replace the cached copy of `kind` with `records`.
pub fn store_snapshot(conn: &mut Connection, kind: Kind, records: &[Transaction]) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM records WHERE kind=?1", params![kind.singular()])?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO records(kind, id, position, title, amount, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (pos, t) in records.iter().enumerate() {
            stmt.execute(params![
                kind.singular(),
                t.id,
                pos as i64,
                t.title,
                t.amount.map(|a| a.to_string()),
                t.date.map(|d| d.to_string()),
                t.description,
            ])?;
        }
    }
    tx.execute(
        "INSERT INTO snapshots(kind, fetched_at) VALUES (?1, ?2)
         ON CONFLICT(kind) DO UPDATE SET fetched_at=excluded.fetched_at",
        params![kind.singular(), Utc::now().to_rfc3339()],
    )?;
    tx.commit()?;
    Ok(())
}

pub fn load_snapshot(conn: &Connection, kind: Kind) -> Result<Option<Snapshot>> {
    let fetched: Option<String> = conn
        .query_row(
            "SELECT fetched_at FROM snapshots WHERE kind=?1",
            params![kind.singular()],
            |r| r.get(0),
        )
        .optional()?;
    let Some(fetched) = fetched else {
        return Ok(None);
    };
    let fetched_at = DateTime::parse_from_rfc3339(&fetched)
        .with_context(|| format!("Invalid snapshot time '{}'", fetched))?
        .with_timezone(&Utc);

    let mut stmt = conn.prepare(
        "SELECT id, title, amount, date, description FROM records
         WHERE kind=?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![kind.singular()], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
        ))
    })?;
    let mut records = Vec::new();
    for row in rows {
        let (id, title, amount, date, description) = row?;
        records.push(Transaction {
            id,
            title,
            amount: amount.and_then(|s| s.parse::<Decimal>().ok()),
            date: date.as_deref().and_then(parse_record_date),
            description,
        });
    }
    Ok(Some(Snapshot {
        records,
        fetched_at,
    }))
}

/// Add a freshly created record to an existing snapshot. No-op when the
/// collection was never fetched.
pub fn append_record(conn: &Connection, kind: Kind, t: &Transaction) -> Result<()> {
    if !has_snapshot(conn, kind)? {
        return Ok(());
    }
    let next: i64 = conn.query_row(
        "SELECT IFNULL(MAX(position), -1) + 1 FROM records WHERE kind=?1",
        params![kind.singular()],
        |r| r.get(0),
    )?;
    conn.execute(
        "INSERT OR REPLACE INTO records(kind, id, position, title, amount, date, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            kind.singular(),
            t.id,
            next,
            t.title,
            t.amount.map(|a| a.to_string()),
            t.date.map(|d| d.to_string()),
            t.description,
        ],
    )?;
    Ok(())
}

pub fn remove_record(conn: &Connection, kind: Kind, id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM records WHERE kind=?1 AND id=?2",
        params![kind.singular(), id],
    )?;
    Ok(())
}

fn has_snapshot(conn: &Connection, kind: Kind) -> Result<bool> {
    let found: Option<i32> = conn
        .query_row(
            "SELECT 1 FROM snapshots WHERE kind=?1",
            params![kind.singular()],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}
