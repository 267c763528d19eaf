// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::session::Session;
use crate::store::{self, DEFAULT_YIELD_KEY};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(
    conn: &Connection,
    session: &Session,
    cfg: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let yield_rate = store::default_yield_rate(conn, session)?;
            let cards = store::default_cards(conn, session)?;
            let v = json!({
                "db_path": cfg.db_path.display().to_string(),
                "user": cfg.user,
                "default_yield_rate": yield_rate.to_string(),
                "default_credit_cards": cards.len(),
            });
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &v)? {
                let rows = vec![
                    vec!["db_path".into(), cfg.db_path.display().to_string()],
                    vec!["user".into(), cfg.user.clone()],
                    vec!["default_yield_rate".into(), format!("{}%", yield_rate)],
                    vec!["default_credit_cards".into(), cards.len().to_string()],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set-yield", sub)) => {
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            if rate.is_sign_negative() {
                bail!("Yield rate must not be negative");
            }
            store::set_setting(conn, session, DEFAULT_YIELD_KEY, &rate.to_string())?;
            println!("Default NISA yield set to {}%", rate);
        }
        _ => {}
    }
    Ok(())
}
