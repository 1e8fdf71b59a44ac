// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection};

use crate::db;
use crate::models::TxKind;
use crate::utils::{days_in_month, parse_decimal, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", _)) => list(conn)?,
        Some(("run", sub)) => run(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = TxKind::from_str(sub.get_one::<String>("kind").unwrap().trim())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let day: u32 = *sub.get_one::<u32>("day").unwrap();
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO recurring(kind, category, amount, day, note) VALUES (?1,?2,?3,?4,?5)",
        params![kind.as_str(), category, amount.to_string(), day, note],
    )?;
    println!(
        "Recurring {} of {} in '{}' on day {} each month",
        kind, amount, category, day
    );
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT kind, category, amount, day, note, last_applied FROM recurring ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, u32>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (kind, category, amount, day, note, last) = row?;
        data.push(vec![
            kind,
            category,
            amount,
            day.to_string(),
            note.unwrap_or_default(),
            last.unwrap_or_default(),
        ]);
    }
    println!(
        "{}",
        pretty_table(
            &["Kind", "Category", "Amount", "Day", "Note", "Last applied"],
            data
        )
    );
    Ok(())
}

fn run(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Utc::now().date_naive();
    let (year, month) = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s.trim())?,
        None => (today.year(), today.month()),
    };
    let applied = run_for_month(conn, year, month, today)?;
    println!(
        "Applied {} recurring transaction(s) for {:04}-{:02}",
        applied, year, month
    );
    Ok(())
}

/// Materialize recurring templates into transactions for one month.
/// Applies each template at most once per month (tracked via
/// `last_applied`), skips months that have not started, and within the
/// current month skips templates whose day has not arrived yet. The
/// landing day clamps to the month's length.
pub fn run_for_month(conn: &Connection, year: i32, month: u32, today: NaiveDate) -> Result<usize> {
    let month_key = format!("{:04}-{:02}", year, month);
    let current_key = format!("{:04}-{:02}", today.year(), today.month());
    if month_key > current_key {
        return Ok(0);
    }
    let dim = days_in_month(year, month);

    let mut stmt = conn.prepare(
        "SELECT id, kind, category, amount, day, note, last_applied FROM recurring ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, u32>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;

    let mut applied = 0usize;
    for row in rows {
        let (id, kind_s, category, amount_s, day, note, last) = row?;
        if let Some(last) = &last {
            if last.as_str() >= month_key.as_str() {
                continue;
            }
        }
        let land_day = day.min(dim);
        if month_key == current_key && land_day > today.day() {
            continue;
        }
        let kind = TxKind::from_str(&kind_s)
            .with_context(|| format!("Invalid kind '{}' in recurring", kind_s))?;
        let amount = parse_decimal(&amount_s)
            .with_context(|| format!("Invalid amount '{}' in recurring", amount_s))?;
        let date = NaiveDate::from_ymd_opt(year, month, land_day)
            .with_context(|| format!("Invalid landing date {}-{}", month_key, land_day))?;

        db::insert_transaction(conn, date, kind, &category, &amount, note.as_deref())?;
        conn.execute(
            "UPDATE recurring SET last_applied=?1 WHERE id=?2",
            params![month_key, id],
        )?;
        applied += 1;
    }
    Ok(applied)
}
