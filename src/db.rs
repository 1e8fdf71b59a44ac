// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::advice::AdviceHistory;
use crate::models::{Budget, Recommendation, Transaction, TxKind};
use crate::utils::decimal_or_zero;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendpace", "spendpace"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("spendpace.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        amount TEXT NOT NULL, -- display currency
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        year INTEGER NOT NULL,
        UNIQUE(category, month, year)
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense','saving')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);

    CREATE TABLE IF NOT EXISTS recurring(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense','saving')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        day INTEGER NOT NULL CHECK(day BETWEEN 1 AND 31),
        note TEXT,
        last_applied TEXT -- YYYY-MM of the last materialized month
    );

    CREATE TABLE IF NOT EXISTS advice_history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        generated_at TEXT NOT NULL,
        batch TEXT NOT NULL -- JSON array of recommendations
    );
    "#,
    )?;
    Ok(())
}

pub fn upsert_budget(
    conn: &Connection,
    category: &str,
    amount: &rust_decimal::Decimal,
    month: u32,
    year: i32,
) -> Result<()> {
    conn.execute(
        "INSERT INTO budgets(category, amount, month, year) VALUES (?1,?2,?3,?4)
         ON CONFLICT(category, month, year) DO UPDATE SET amount=excluded.amount",
        params![category, amount.to_string(), month, year],
    )?;
    Ok(())
}

pub fn all_budgets(conn: &Connection) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, category, amount, month, year FROM budgets
         ORDER BY year, month, category",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, u32>(3)?,
            r.get::<_, i32>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, category, amount_s, month, year) = row?;
        out.push(Budget {
            id,
            category,
            amount: decimal_or_zero(&amount_s, "budgets"),
            month,
            year,
        });
    }
    Ok(out)
}

pub fn insert_transaction(
    conn: &Connection,
    date: chrono::NaiveDate,
    kind: TxKind,
    category: &str,
    amount: &rust_decimal::Decimal,
    note: Option<&str>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions(date, kind, category, amount, note)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![date.to_string(), kind.as_str(), category, amount.to_string(), note],
    )?;
    Ok(())
}

pub fn all_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, kind, category, amount, note FROM transactions
         ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, date_s, kind_s, category, amount_s, note) = row?;
        let date = chrono::NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' in transactions", date_s))?;
        let kind = TxKind::from_str(&kind_s)
            .with_context(|| format!("Invalid kind '{}' in transactions", kind_s))?;
        out.push(Transaction {
            id,
            date,
            kind,
            category,
            amount: decimal_or_zero(&amount_s, "transactions"),
            note,
        });
    }
    Ok(out)
}

/// SQLite-backed store of past recommendation batches. Append-only and
/// display-only: the aggregator never reads it back to compute advice.
pub struct SqliteHistory<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteHistory<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl AdviceHistory for SqliteHistory<'_> {
    fn append(&self, generated_at: DateTime<Utc>, batch: &[Recommendation]) -> Result<()> {
        let json = serde_json::to_string(batch)?;
        self.conn.execute(
            "INSERT INTO advice_history(generated_at, batch) VALUES (?1, ?2)",
            params![generated_at.to_rfc3339(), json],
        )?;
        Ok(())
    }

    fn latest(&self, limit: usize) -> Result<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT generated_at, batch FROM advice_history ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
