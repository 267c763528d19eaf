// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{IncomeFrequency, IncomeType};
use crate::session::Session;
use crate::store;
use crate::utils::{fmt_yen, maybe_print_json, parse_amount, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            let frequency: IncomeFrequency = sub.get_one::<String>("frequency").unwrap().parse()?;
            let income_type: IncomeType = sub.get_one::<String>("type").unwrap().parse()?;
            let id = store::add_income(conn, session, name, income_type, amount, frequency)?;
            println!(
                "Added income #{} '{}' {} ({})",
                id,
                name,
                fmt_yen(amount),
                frequency
            );
        }
        Some(("list", sub)) => {
            let incomes = store::list_incomes(conn, session, sub.get_flag("all"))?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &incomes)? {
                let rows = incomes
                    .iter()
                    .map(|i| {
                        vec![
                            i.id.to_string(),
                            i.name.clone(),
                            i.income_type.as_str().to_string(),
                            fmt_yen(i.amount),
                            i.frequency.to_string(),
                            if i.is_active { "yes" } else { "no" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Type", "Amount", "Frequency", "Active"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if store::deactivate_income(conn, session, id)? == 0 {
                bail!("Income #{} not found", id);
            }
            println!("Deactivated income #{}", id);
        }
        _ => {}
    }
    Ok(())
}
