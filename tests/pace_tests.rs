// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use spendpace::pace::{compute_pace, Pace};

fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

#[test]
fn full_budget_on_last_day_is_exactly_100() {
    for dim in [28u32, 29, 30, 31] {
        let m = compute_pace(dec(3100), dec(3100), dim as i64, dim);
        match m.pace {
            Pace::Percent(p) => assert_eq!(p.round_dp(6), dec(100)),
            Pace::Unbounded => panic!("unexpected unbounded pace"),
        }
    }
}

#[test]
fn total_over_odd_day_inputs() {
    // Any current_day, including at or below zero, must produce metrics.
    for day in [-30i64, -1, 0, 1, 15, 31, 45] {
        let m = compute_pace(dec(500), dec(125), day, 30);
        assert!(m.days_passed >= 1);
        assert!(m.daily_rate >= Decimal::ZERO);
    }
    // Zero spend with zero budget is quiet, not a division error.
    let m = compute_pace(dec(0), dec(0), 0, 31);
    assert_eq!(m.pace, Pace::Percent(Decimal::ZERO));
}

#[test]
fn pace_is_monotone_in_spent() {
    let mut last = Decimal::MIN;
    for spent in (0..=3000).step_by(50) {
        let m = compute_pace(dec(3000), dec(spent), 12, 30);
        let p = match m.pace {
            Pace::Percent(p) => p,
            Pace::Unbounded => panic!("budget is positive"),
        };
        assert!(p >= last, "pace dropped at spent={}", spent);
        last = p;
    }
}

#[test]
fn midmonth_overspend_scenario() {
    // 3000 budget, 1800 spent by day 15 of 30.
    let m = compute_pace(dec(3000), dec(1800), 15, 30);
    assert_eq!(m.ideal_spent, dec(1500));
    assert_eq!(m.pace, Pace::Percent(dec(120)));
    assert_eq!(m.daily_rate, dec(120));
    assert_eq!(m.projected, dec(3600));
    assert_eq!(m.remaining, dec(1200));
    assert_eq!(m.remaining_days, 15);
    assert_eq!(m.daily_budget, dec(80));
}

#[test]
fn zero_budget_with_spend_is_unbounded_and_serializable() {
    let m = compute_pace(dec(0), dec(10), 3, 30);
    assert_eq!(m.pace, Pace::Unbounded);
    assert_eq!(serde_json::to_string(&m.pace).unwrap(), "\"unbounded\"");
}
