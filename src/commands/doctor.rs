// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{MonthlyAssetRecord, sum_items};
use crate::session::Session;
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// One inconsistency in a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub month: String,
    pub issue: &'static str,
    pub detail: String,
}

pub fn check_record(rec: &MonthlyAssetRecord) -> Vec<Finding> {
    let mut out = Vec::new();
    let expected = rec.bank_balance + rec.monthly_income - rec.credit_expenses;
    if rec.calculated_balance != expected {
        out.push(Finding {
            month: rec.year_month.clone(),
            issue: "balance_mismatch",
            detail: format!("stored {}, expected {}", rec.calculated_balance, expected),
        });
    }
    let lists = [
        ("bank_details", rec.bank_balance, &rec.bank_details),
        ("income_details", rec.monthly_income, &rec.income_details),
        ("credit_details", rec.credit_expenses, &rec.credit_details),
        ("nisa_details", rec.nisa_value, &rec.nisa_details),
    ];
    for (issue, scalar, details) in lists {
        if let Some(items) = details {
            let total = sum_items(items);
            if total != scalar {
                out.push(Finding {
                    month: rec.year_month.clone(),
                    issue,
                    detail: format!("items sum to {}, total is {}", total, scalar),
                });
            }
        }
    }
    out
}

pub fn findings(conn: &Connection, session: &Session) -> Result<Vec<Finding>> {
    let mut out = Vec::new();
    for rec in store::list_records(conn, session, None)? {
        out.extend(check_record(&rec));
    }
    Ok(out)
}

pub fn handle(conn: &Connection, session: &Session) -> Result<()> {
    let found = findings(conn, session)?;
    if found.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }
    for f in &found {
        tracing::warn!(month = %f.month, issue = f.issue, "{}", f.detail);
    }
    let rows = found
        .into_iter()
        .map(|f| vec![f.month, f.issue.to_string(), f.detail])
        .collect();
    println!("{}", pretty_table(&["Month", "Issue", "Detail"], rows));
    Ok(())
}
