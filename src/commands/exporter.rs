// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{LineItem, MonthlyAssetRecord};
use crate::session::Session;
use crate::store;
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("records", sub)) => export_records(conn, session, sub),
        _ => Ok(()),
    }
}

fn details_cell(items: &Option<Vec<LineItem>>) -> String {
    items
        .iter()
        .flatten()
        .map(|i| format!("{}={}", i.name, i.amount))
        .collect::<Vec<_>>()
        .join(";")
}

fn export_records(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut records: Vec<MonthlyAssetRecord> = store::list_records(conn, session, None)?;
    records.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "year_month",
                "bank_balance",
                "monthly_income",
                "credit_expenses",
                "nisa_value",
                "calculated_balance",
                "is_confirmed",
                "notes",
                "bank_details",
                "income_details",
                "credit_details",
                "nisa_details",
            ])?;
            for r in &records {
                wtr.write_record([
                    r.year_month.clone(),
                    r.bank_balance.to_string(),
                    r.monthly_income.to_string(),
                    r.credit_expenses.to_string(),
                    r.nisa_value.to_string(),
                    r.calculated_balance.to_string(),
                    r.is_confirmed.to_string(),
                    r.notes.clone().unwrap_or_default(),
                    details_cell(&r.bank_details),
                    details_cell(&r.income_details),
                    details_cell(&r.credit_details),
                    details_cell(&r.nisa_details),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&records)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    tracing::info!(user = %session.user_id, count = records.len(), out = %out, "records exported");
    println!("Exported {} records to {}", records.len(), out);
    Ok(())
}
