// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Datelike;
use rusqlite::Connection;

use crate::db;
use crate::utils::{maybe_print_json, parse_decimal, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let (year, month) = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s.trim())?,
        None => {
            let today = chrono::Utc::now().date_naive();
            (today.year(), today.month())
        }
    };
    db::upsert_budget(conn, &category, &amount, month, year)?;
    println!("Budget set for {:04}-{:02} / {} = {}", year, month, category, amount);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s.trim()))
        .transpose()?;

    let mut data = Vec::new();
    for b in db::all_budgets(conn)? {
        if let Some((y, mo)) = filter {
            if (b.year, b.month) != (y, mo) {
                continue;
            }
        }
        data.push(vec![
            format!("{:04}-{:02}", b.year, b.month),
            b.category,
            b.amount.to_string(),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Month", "Category", "Budget"], data));
    }
    Ok(())
}
