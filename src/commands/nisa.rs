// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::NisaAccount;
use crate::session::Session;
use crate::store;
use crate::utils::{fmt_yen, maybe_print_json, parse_amount, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let account = NisaAccount {
                id: 0,
                name: sub.get_one::<String>("name").unwrap().trim().to_string(),
                broker_name: sub.get_one::<String>("broker").unwrap().trim().to_string(),
                current_value: parse_amount(sub.get_one::<String>("value").unwrap())?,
                total_invested: parse_amount(sub.get_one::<String>("invested").unwrap())?,
                monthly_contribution: parse_amount(sub.get_one::<String>("monthly").unwrap())?,
                is_active: true,
            };
            let id = store::add_nisa_account(conn, session, &account)?;
            println!(
                "Added NISA account #{} '{}' ({} per month)",
                id,
                account.name,
                fmt_yen(account.monthly_contribution)
            );
        }
        Some(("list", sub)) => {
            let accounts = store::list_nisa_accounts(conn, session, sub.get_flag("all"))?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let rows = accounts
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            a.broker_name.clone(),
                            fmt_yen(a.current_value),
                            fmt_yen(a.current_value - a.total_invested),
                            fmt_yen(a.monthly_contribution),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Id", "Account", "Broker", "Value", "Gain/Loss", "Monthly"],
                        rows
                    )
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if store::deactivate_nisa_account(conn, session, id)? == 0 {
                bail!("NISA account #{} not found", id);
            }
            println!("Deactivated NISA account #{}", id);
        }
        _ => {}
    }
    Ok(())
}
