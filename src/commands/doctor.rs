// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::utils::pretty_table;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Amounts that no longer parse (reporting coerces them to zero)
    let mut stmt = conn.prepare("SELECT category, month, year, amount FROM budgets")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let cat: String = r.get(0)?;
        let month: u32 = r.get(1)?;
        let year: i32 = r.get(2)?;
        let amount: String = r.get(3)?;
        if amount.parse::<Decimal>().is_err() {
            rows.push(vec![
                "bad_budget_amount".into(),
                format!("{:04}-{:02} {} '{}'", year, month, cat, amount),
            ]);
        }
    }
    let mut stmt2 = conn.prepare("SELECT id, date, amount FROM transactions")?;
    let mut cur2 = stmt2.query([])?;
    let today = chrono::Utc::now().date_naive();
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let date_s: String = r.get(1)?;
        let amount: String = r.get(2)?;
        if amount.parse::<Decimal>().is_err() {
            rows.push(vec![
                "bad_tx_amount".into(),
                format!("tx #{} '{}'", id, amount),
            ]);
        }
        // 2) Future-dated entries skew pace analysis
        if let Ok(d) = chrono::NaiveDate::parse_from_str(&date_s, "%Y-%m-%d") {
            if d > today {
                rows.push(vec!["future_tx".into(), format!("tx #{} on {}", id, d)]);
            }
        } else {
            rows.push(vec!["bad_tx_date".into(), format!("tx #{} '{}'", id, date_s)]);
        }
    }

    // 3) Recurring days that clamp in short months
    let mut stmt3 = conn.prepare("SELECT id, category, day FROM recurring WHERE day > 28")?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let cat: String = r.get(1)?;
        let day: u32 = r.get(2)?;
        rows.push(vec![
            "recurring_day_clamps".into(),
            format!("#{} '{}' day {} lands earlier in short months", id, cat, day),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
