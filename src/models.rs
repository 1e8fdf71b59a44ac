// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::pace::Pace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
    Saving,
}

#[derive(Debug, Error)]
#[error("invalid transaction kind '{0}', expected income|expense|saving")]
pub struct ParseTxKindError(String);

impl FromStr for TxKind {
    type Err = ParseTxKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            "saving" => Ok(TxKind::Saving),
            other => Err(ParseTxKindError(other.to_string())),
        }
    }
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
            TxKind::Saving => "saving",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub amount: Decimal, // base currency
    pub month: u32,      // 1..=12
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TxKind,
    pub category: String,
    pub amount: Decimal, // non-negative; kind carries the sign
    pub note: Option<String>,
}

/// Advisory level driving message tone and presentation styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Caution,
    Positive,
    Info,
    General,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Caution => "caution",
            Severity::Positive => "positive",
            Severity::Info => "info",
            Severity::General => "general",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single advisory produced for the user. `category` is a budget
/// category name, or the sentinels "overall" (portfolio-level entry)
/// and "general" (generic tip).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace_percentage: Option<Pace>,
}
