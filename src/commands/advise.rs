// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::advice::{self, AdviceHistory};
use crate::db::SqliteHistory;
use crate::utils::{maybe_print_json, parse_date, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("history", sub)) => history(conn, sub),
        _ => run(conn, m),
    }
}

fn run(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let today = match m.get_one::<String>("date") {
        Some(s) => parse_date(s.trim())?,
        None => chrono::Utc::now().date_naive(),
    };

    let batch = advice::generate_and_record(conn, today)?;

    if !maybe_print_json(json_flag, jsonl_flag, &batch)? {
        let rows: Vec<Vec<String>> = batch
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.severity.to_string(),
                    r.pace_percentage
                        .map(|p| p.display())
                        .unwrap_or_else(|| "-".to_string()),
                    r.message.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Severity", "Pace", "Advice"], rows)
        );
    }
    Ok(())
}

fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let limit: usize = *sub.get_one::<usize>("limit").unwrap_or(&5);
    let store = SqliteHistory::new(conn);
    let batches = store.latest(limit)?;

    let mut rows = Vec::new();
    for (generated_at, batch_json) in batches {
        let entries: serde_json::Value = serde_json::from_str(&batch_json)
            .unwrap_or_else(|_| json!([]));
        let count = entries.as_array().map(|a| a.len()).unwrap_or(0);
        let first = entries
            .as_array()
            .and_then(|a| a.first())
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("")
            .to_string();
        rows.push(vec![generated_at, count.to_string(), first]);
    }
    println!(
        "{}",
        pretty_table(&["Generated", "Entries", "First advisory"], rows)
    );
    Ok(())
}
