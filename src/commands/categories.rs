// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::Session;
use crate::store;
use crate::utils::{fmt_yen, maybe_print_json, parse_amount, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let budget = parse_amount(sub.get_one::<String>("budget").unwrap())?;
            let is_fixed = sub.get_flag("fixed");
            let order = sub.get_one::<i64>("order").copied();
            store::add_category(conn, session, name, budget, is_fixed, order)?;
            let kind = if is_fixed { "fixed" } else { "variable" };
            println!("Added {} category '{}' ({})", kind, name, fmt_yen(budget));
        }
        Some(("list", sub)) => {
            let cats = store::list_categories(conn, session)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let rows = cats
                    .iter()
                    .map(|c| {
                        vec![
                            c.display_order.to_string(),
                            c.name.clone(),
                            fmt_yen(c.budget),
                            if c.is_fixed { "fixed" } else { "variable" }.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["#", "Category", "Budget", "Kind"], rows));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            store::remove_category(conn, session, name)?;
            println!("Removed category '{}'", name);
        }
        Some(("budget", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            store::set_category_budget(conn, session, name, amount)?;
            println!("Budget for '{}' set to {}", name, fmt_yen(amount));
        }
        _ => {}
    }
    Ok(())
}
