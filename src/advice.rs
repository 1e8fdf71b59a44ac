// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::db;
use crate::models::{Budget, Recommendation, Severity, Transaction, TxKind};
use crate::pace::{compute_pace, Pace, PaceMetrics};
use crate::utils::{days_in_month, get_currency, CurrencyFormatter};

// Pace thresholds, in percent. The positive band tops out at 70; the
// caution band starts at 90 and warning is strictly above 100.
const POSITIVE_MAX: u32 = 70;
const CAUTION_MIN: u32 = 90;
const OVERALL_WARN: u32 = 110;

/// Store of past recommendation batches, keyed by generation time.
/// Writes are best-effort; advice is always recomputed from live data.
pub trait AdviceHistory {
    fn append(&self, generated_at: DateTime<Utc>, batch: &[Recommendation]) -> Result<()>;
    fn latest(&self, limit: usize) -> Result<Vec<(String, String)>>;
}

/// Map one budget's pacing figures to an advisory message and severity.
/// Thresholds are checked in order; the first match wins.
pub fn classify(
    category: &str,
    m: &PaceMetrics,
    fmt: &CurrencyFormatter,
) -> (Severity, String) {
    if m.pace.exceeds(100) {
        if m.remaining <= Decimal::ZERO {
            return (
                Severity::Warning,
                format!(
                    "'{}' is already over the limit: {} spent against a {} budget.",
                    category,
                    fmt.format(m.spent),
                    fmt.format(m.budget_amount)
                ),
            );
        }
        return (
            Severity::Warning,
            format!(
                "'{}' is on pace to exceed its budget by {}: projected {} against {}.",
                category,
                fmt.format(m.projected - m.budget_amount),
                fmt.format(m.projected),
                fmt.format(m.budget_amount)
            ),
        );
    }
    if let Pace::Percent(p) = m.pace {
        if p >= Decimal::from(CAUTION_MIN) {
            let msg = if m.daily_rate > Decimal::ZERO {
                let days_left = (m.remaining / m.daily_rate).ceil();
                format!(
                    "'{}' is close to its limit: roughly {} more days of spending at the current rate.",
                    category, days_left
                )
            } else {
                format!(
                    "'{}' is near its limit, but spending has paused; the budget holds at this rate.",
                    category
                )
            };
            return (Severity::Caution, msg);
        }
        if p <= Decimal::from(POSITIVE_MAX) {
            return (
                Severity::Positive,
                format!(
                    "Good pacing on '{}': {} spent so far with {} days left in the month.",
                    category,
                    fmt.format(m.spent),
                    m.remaining_days
                ),
            );
        }
    }
    (
        Severity::Info,
        format!(
            "'{}' is on track: {} of {} used.",
            category,
            fmt.format(m.spent),
            fmt.format(m.budget_amount)
        ),
    )
}

fn spent_for(budget: &Budget, transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| {
            t.kind == TxKind::Expense
                && t.category == budget.category
                && t.date.month() == budget.month
                && t.date.year() == budget.year
        })
        .map(|t| t.amount)
        .sum()
}

/// Build the full advisory list for one point in time. Pure over its
/// inputs: identical budgets, transactions and date yield an identical
/// list. Persistence is the caller's concern.
pub fn generate(
    budgets: &[Budget],
    transactions: &[Transaction],
    today: NaiveDate,
    fmt: &CurrencyFormatter,
) -> Vec<Recommendation> {
    let (year, month, day) = (today.year(), today.month(), today.day());
    let dim = days_in_month(year, month);

    let mut out = Vec::new();
    let mut current_total_budget = Decimal::ZERO;
    let mut current_total_spent = Decimal::ZERO;
    let mut current_count = 0u32;

    for b in budgets {
        if (b.year, b.month) == (year, month) {
            let spent = spent_for(b, transactions);
            current_total_budget += b.amount;
            current_total_spent += spent;
            current_count += 1;

            if spent.is_zero() {
                out.push(Recommendation {
                    category: b.category.clone(),
                    message: format!(
                        "No spending recorded for '{}' yet: the full {} budget is available.",
                        b.category,
                        fmt.format(b.amount)
                    ),
                    severity: Severity::Info,
                    pace_percentage: Some(Pace::Percent(Decimal::ZERO)),
                });
                continue;
            }

            let metrics = compute_pace(b.amount, spent, day as i64, dim);
            let (severity, message) = classify(&b.category, &metrics, fmt);
            out.push(Recommendation {
                category: b.category.clone(),
                message,
                severity,
                pace_percentage: Some(metrics.pace),
            });
        } else if (b.year, b.month) < (year, month) {
            let spent = spent_for(b, transactions);
            out.push(Recommendation {
                category: b.category.clone(),
                message: format!(
                    "Past month {:04}-{:02} for '{}': spent {} of {}.",
                    b.year,
                    b.month,
                    b.category,
                    fmt.format(spent),
                    fmt.format(b.amount)
                ),
                severity: Severity::Info,
                pace_percentage: None,
            });
        } else {
            out.push(Recommendation {
                category: b.category.clone(),
                message: format!(
                    "Budget of {} for '{}' is set for {:04}-{:02}.",
                    fmt.format(b.amount),
                    b.category,
                    b.year,
                    b.month
                ),
                severity: Severity::Info,
                pace_percentage: None,
            });
        }
    }

    if current_count > 1 {
        let overall = compute_pace(current_total_budget, current_total_spent, day as i64, dim);
        let (severity, message) = if overall.pace.exceeds(OVERALL_WARN) {
            (
                Severity::Warning,
                format!(
                    "Overall spending is ahead of pace: {} spent against an ideal {} so far.",
                    fmt.format(current_total_spent),
                    fmt.format(overall.ideal_spent)
                ),
            )
        } else if matches!(overall.pace, Pace::Percent(p) if p < Decimal::from(CAUTION_MIN)) {
            (
                Severity::Positive,
                format!(
                    "Overall spending is comfortably under pace: {} of an ideal {} so far.",
                    fmt.format(current_total_spent),
                    fmt.format(overall.ideal_spent)
                ),
            )
        } else {
            (
                Severity::Positive,
                "You are balancing spending well across your budgets.".to_string(),
            )
        };
        out.push(Recommendation {
            category: "overall".to_string(),
            message,
            severity,
            pace_percentage: Some(overall.pace),
        });
    }

    if out.len() < 3 {
        for tip in [
            "Review recurring charges and subscriptions for anything you no longer use.",
            "Set a monthly budget for each category you spend in to get tailored pacing advice.",
        ] {
            out.push(Recommendation {
                category: "general".to_string(),
                message: tip.to_string(),
                severity: Severity::General,
                pace_percentage: None,
            });
        }
    }

    out
}

/// Load budgets and transactions, generate advice for `today`, and append
/// the batch to history. A history write failure is reported on stderr
/// and never withholds the computed list.
pub fn generate_and_record(conn: &Connection, today: NaiveDate) -> Result<Vec<Recommendation>> {
    let budgets = db::all_budgets(conn)?;
    let transactions = db::all_transactions(conn)?;
    let fmt = CurrencyFormatter::new(get_currency(conn)?);

    let batch = generate(&budgets, &transactions, today, &fmt);

    let history = db::SqliteHistory::new(conn);
    if let Err(e) = history.append(Utc::now(), &batch) {
        eprintln!("warning: could not record advice history: {:#}", e);
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt() -> CurrencyFormatter {
        CurrencyFormatter::new("USD")
    }

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn pace_exactly_100_is_caution_not_warning() {
        let m = compute_pace(dec(3000), dec(1500), 15, 30);
        assert_eq!(m.pace, Pace::Percent(dec(100)));
        let (sev, _) = classify("Dining", &m, &fmt());
        assert_eq!(sev, Severity::Caution);
    }

    #[test]
    fn overspend_with_budget_left_projects_the_excess() {
        // 3000 budget, 1800 spent by day 15 of 30: pace 120, projected 3600
        let m = compute_pace(dec(3000), dec(1800), 15, 30);
        assert_eq!(m.pace, Pace::Percent(dec(120)));
        assert_eq!(m.projected, dec(3600));
        let (sev, msg) = classify("Groceries", &m, &fmt());
        assert_eq!(sev, Severity::Warning);
        assert!(msg.contains("exceed"), "got: {}", msg);
        assert!(msg.contains("USD 600"), "got: {}", msg);
    }

    #[test]
    fn already_over_the_limit_branch() {
        let m = compute_pace(dec(100), dec(150), 20, 30);
        let (sev, msg) = classify("Fun", &m, &fmt());
        assert_eq!(sev, Severity::Warning);
        assert!(msg.contains("over the limit"), "got: {}", msg);
    }

    #[test]
    fn unbounded_pace_is_treated_as_maximal_overspend() {
        let m = compute_pace(dec(0), dec(40), 5, 30);
        let (sev, msg) = classify("Misc", &m, &fmt());
        assert_eq!(sev, Severity::Warning);
        assert!(msg.contains("over the limit"), "got: {}", msg);
    }

    #[test]
    fn half_pace_is_positive() {
        let m = compute_pace(dec(3000), dec(750), 15, 30);
        assert_eq!(m.pace, Pace::Percent(dec(50)));
        let (sev, _) = classify("Transport", &m, &fmt());
        assert_eq!(sev, Severity::Positive);
    }

    #[test]
    fn middle_band_is_info() {
        let m = compute_pace(dec(3000), dec(1200), 15, 30);
        assert_eq!(m.pace, Pace::Percent(dec(80)));
        let (sev, msg) = classify("Rent", &m, &fmt());
        assert_eq!(sev, Severity::Info);
        assert!(msg.contains("on track"), "got: {}", msg);
    }

    #[test]
    fn caution_reports_days_until_limit() {
        // 95% of pace: 1425 of ideal 1500, remaining 1575, rate 95/day
        let m = compute_pace(dec(3000), dec(1425), 15, 30);
        let (sev, msg) = classify("Dining", &m, &fmt());
        assert_eq!(sev, Severity::Caution);
        // ceil(1575 / 95) = 17
        assert!(msg.contains("17"), "got: {}", msg);
    }
}
