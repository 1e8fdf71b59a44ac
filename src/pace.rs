// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Pace percentage: actual spend relative to the time-prorated ideal,
/// as a percentage. `Unbounded` stands in for the zero-budget-with-spend
/// case so the value stays serializable (no literal infinity on the wire).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pace {
    Percent(Decimal),
    Unbounded,
}

impl Serialize for Pace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Pace::Percent(p) => Serialize::serialize(p, serializer),
            Pace::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

impl Pace {
    /// True when spending runs ahead of the prorated budget by more than
    /// the given percentage threshold. Unbounded pace is ahead of any
    /// threshold.
    pub fn exceeds(&self, threshold: u32) -> bool {
        match self {
            Pace::Percent(p) => *p > Decimal::from(threshold),
            Pace::Unbounded => true,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Pace::Percent(p) => format!("{:.0}%", p.round_dp(0)),
            Pace::Unbounded => "unbounded".to_string(),
        }
    }
}

/// Everything the advisory classifier needs about one budget's month.
#[derive(Debug, Clone, PartialEq)]
pub struct PaceMetrics {
    pub budget_amount: Decimal,
    pub spent: Decimal,
    pub days_passed: u32,
    pub days_in_month: u32,
    pub remaining_days: u32,
    /// Budget prorated linearly over elapsed days.
    pub ideal_spent: Decimal,
    pub pace: Pace,
    /// Average spend per elapsed day.
    pub daily_rate: Decimal,
    /// Daily rate extrapolated to the full month.
    pub projected: Decimal,
    /// Budget minus spent; negative when over the limit.
    pub remaining: Decimal,
    /// What can still be spent per remaining day; zero when the month is done.
    pub daily_budget: Decimal,
}

/// Compute pacing figures for one budget. Total over its inputs: a
/// day-of-month at or below zero is clamped to 1 rather than rejected,
/// and a zero ideal with actual spending maps to `Pace::Unbounded`.
/// Callers must pass `days_in_month > 0`.
pub fn compute_pace(
    budget_amount: Decimal,
    spent: Decimal,
    current_day: i64,
    days_in_month: u32,
) -> PaceMetrics {
    let days_passed = current_day.max(1) as u32;
    let remaining_days = days_in_month.saturating_sub(days_passed);

    let ideal_spent =
        budget_amount / Decimal::from(days_in_month) * Decimal::from(days_passed);
    let pace = if ideal_spent > Decimal::ZERO {
        Pace::Percent(spent / ideal_spent * Decimal::ONE_HUNDRED)
    } else if spent > Decimal::ZERO {
        Pace::Unbounded
    } else {
        Pace::Percent(Decimal::ZERO)
    };

    let daily_rate = spent / Decimal::from(days_passed);
    let projected = daily_rate * Decimal::from(days_in_month);
    let remaining = budget_amount - spent;
    let daily_budget = if remaining_days > 0 {
        remaining / Decimal::from(remaining_days)
    } else {
        Decimal::ZERO
    };

    PaceMetrics {
        budget_amount,
        spent,
        days_passed,
        days_in_month,
        remaining_days,
        ideal_spent,
        pace,
        daily_rate,
        projected,
        remaining,
        daily_budget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn halfway_through_month_on_budget_is_100() {
        let m = compute_pace(dec(3000), dec(1500), 15, 30);
        assert_eq!(m.ideal_spent, dec(1500));
        assert_eq!(m.pace, Pace::Percent(dec(100)));
    }

    #[test]
    fn day_at_or_below_zero_clamps_to_one() {
        let m = compute_pace(dec(300), dec(10), 0, 30);
        assert_eq!(m.days_passed, 1);
        assert_eq!(m.ideal_spent, dec(10));
        let m = compute_pace(dec(300), dec(10), -7, 30);
        assert_eq!(m.days_passed, 1);
    }

    #[test]
    fn zero_budget_with_spend_is_unbounded() {
        let m = compute_pace(dec(0), dec(25), 10, 31);
        assert_eq!(m.pace, Pace::Unbounded);
        assert!(m.pace.exceeds(100));
    }

    #[test]
    fn zero_budget_zero_spend_is_zero_pace() {
        let m = compute_pace(dec(0), dec(0), 10, 31);
        assert_eq!(m.pace, Pace::Percent(Decimal::ZERO));
    }

    #[test]
    fn last_day_of_month_has_no_daily_budget() {
        let m = compute_pace(dec(3000), dec(2000), 30, 30);
        assert_eq!(m.remaining_days, 0);
        assert_eq!(m.daily_budget, Decimal::ZERO);
    }

    #[test]
    fn remaining_goes_negative_when_over() {
        let m = compute_pace(dec(100), dec(150), 20, 30);
        assert_eq!(m.remaining, dec(-50));
    }
}
