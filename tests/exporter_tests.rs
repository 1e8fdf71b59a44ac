// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use serde_json::json;
use spendpace::{cli, commands::exporter, db};
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO transactions(date, kind, category, amount, note)
        VALUES ('2026-09-02', 'expense', 'Groceries', '12.34', 'weekly run');
        INSERT INTO transactions(date, kind, category, amount, note)
        VALUES ('2026-09-03', 'income', 'Salary', '2500', NULL);
        "#,
    )
    .unwrap();
    conn
}

fn export_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("export", m)) => m.clone(),
        _ => panic!("no export subcommand"),
    }
}

#[test]
fn export_transactions_as_csv() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("ledger.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let m = export_matches(&[
        "spendpace",
        "export",
        "transactions",
        "--format",
        "csv",
        "--out",
        &out_str,
    ]);
    exporter::handle(&conn, &m).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next().unwrap(), "date,kind,category,amount,note");
    assert_eq!(lines.next().unwrap(), "2026-09-02,expense,Groceries,12.34,weekly run");
    assert_eq!(lines.next().unwrap(), "2026-09-03,income,Salary,2500,");
}

#[test]
fn export_transactions_as_json() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("ledger.json");
    let out_str = out_path.to_string_lossy().to_string();

    let m = export_matches(&[
        "spendpace",
        "export",
        "transactions",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    exporter::handle(&conn, &m).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(
        parsed[0],
        json!({
            "date": "2026-09-02",
            "kind": "expense",
            "category": "Groceries",
            "amount": "12.34",
            "note": "weekly run"
        })
    );
}

#[test]
fn export_rejects_unknown_format() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("ledger.xml");
    let out_str = out_path.to_string_lossy().to_string();

    let m = export_matches(&[
        "spendpace",
        "export",
        "transactions",
        "--format",
        "xml",
        "--out",
        &out_str,
    ]);
    assert!(exporter::handle(&conn, &m).is_err());
    assert!(!out_path.exists());
}
