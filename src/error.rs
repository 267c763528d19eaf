// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Domain failures callers may want to branch on. Everything else travels as
/// plain `anyhow` context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KakeiboError {
    #[error("No asset record for {month}")]
    RecordNotFound { month: String },
    #[error("A record for {month} already exists; confirm the overwrite to replace it")]
    NextMonthExists { month: String },
    #[error("{field} details sum to {details} but the total is {scalar}")]
    DetailSumMismatch {
        field: &'static str,
        scalar: i64,
        details: i64,
    },
    #[error("{field} must not be negative (got {amount})")]
    NegativeAmount { field: &'static str, amount: i64 },
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Invalid goal period '{0}', expected 1year|3year|5year|10year")]
    InvalidPeriod(String),
    #[error("Invalid frequency '{0}', expected monthly|yearly|one_time")]
    InvalidFrequency(String),
    #[error("Invalid income type '{0}', expected salary|bonus|side_job|investment|other")]
    InvalidIncomeType(String),
    #[error("Category '{0}' not found")]
    CategoryNotFound(String),
    #[error("No savings goal for period {0}")]
    GoalNotFound(String),
}
