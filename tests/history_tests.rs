// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use spendpace::advice::{generate_and_record, AdviceHistory};
use spendpace::db::{self, SqliteHistory};
use spendpace::models::{Recommendation, Severity};
use spendpace::utils::set_currency;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn history_roundtrips_batches_newest_first() {
    let conn = setup();
    let store = SqliteHistory::new(&conn);
    let batch_a = vec![Recommendation {
        category: "general".into(),
        message: "first".into(),
        severity: Severity::General,
        pace_percentage: None,
    }];
    let batch_b = vec![Recommendation {
        category: "general".into(),
        message: "second".into(),
        severity: Severity::General,
        pace_percentage: None,
    }];
    store.append(Utc::now(), &batch_a).unwrap();
    store.append(Utc::now(), &batch_b).unwrap();

    let latest = store.latest(10).unwrap();
    assert_eq!(latest.len(), 2);
    assert!(latest[0].1.contains("second"));
    assert!(latest[1].1.contains("first"));

    let only_one = store.latest(1).unwrap();
    assert_eq!(only_one.len(), 1);
}

#[test]
fn advise_records_a_batch_to_history() {
    let conn = setup();
    set_currency(&conn, "EUR").unwrap();
    db::upsert_budget(&conn, "Dining", &rust_decimal::Decimal::from(300), 9, 2026).unwrap();

    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let batch = generate_and_record(&conn, today).unwrap();
    assert!(!batch.is_empty());

    let latest = SqliteHistory::new(&conn).latest(1).unwrap();
    assert_eq!(latest.len(), 1);
    assert!(latest[0].1.contains("Dining"));
    assert!(latest[0].1.contains("EUR"));
}

#[test]
fn history_write_failure_does_not_withhold_advice() {
    let conn = setup();
    db::upsert_budget(&conn, "Dining", &rust_decimal::Decimal::from(300), 9, 2026).unwrap();
    // Simulate a broken history collaborator.
    conn.execute_batch("DROP TABLE advice_history;").unwrap();

    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let batch = generate_and_record(&conn, today).unwrap();
    assert_eq!(batch.len(), 3); // one specific entry plus two generic tips
}
