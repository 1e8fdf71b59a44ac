// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::db;
use crate::models::TxKind;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = TxKind::from_str(sub.get_one::<String>("kind").unwrap().trim())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s.trim())?,
        None => chrono::Utc::now().date_naive(),
    };
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    db::insert_transaction(conn, date, kind, &category, &amount, note.as_deref())?;
    println!("Recorded {} {} in '{}' on {}", kind, amount, category, date);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Kind", "Category", "Amount", "Note"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub note: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT date, kind, category, amount, note FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND category=?");
        params_vec.push(cat.into());
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        // Validate early so a typo filters nothing silently
        let kind = TxKind::from_str(kind.trim())?;
        sql.push_str(" AND kind=?");
        params_vec.push(kind.as_str().into());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let kind: String = r.get(1)?;
        let category: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let note: Option<String> = r.get(4)?;
        data.push(TransactionRow {
            date,
            kind,
            category,
            amount,
            note: note.unwrap_or_default(),
        });
    }
    Ok(data)
}
