// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::DefaultCard;
use crate::session::Session;
use crate::store;
use crate::utils::{fmt_yen, maybe_print_json, parse_amount, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            let mut cards = store::default_cards(conn, session)?;
            // Same name replaces the expected charge instead of adding a second line.
            match cards.iter_mut().find(|c| c.name == name) {
                Some(card) => card.amount = amount,
                None => cards.push(DefaultCard {
                    name: name.clone(),
                    amount,
                }),
            }
            store::set_default_cards(conn, session, &cards)?;
            println!("Default card '{}' set to {}", name, fmt_yen(amount));
        }
        Some(("list", sub)) => {
            let cards = store::default_cards(conn, session)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cards)? {
                let rows = cards
                    .iter()
                    .map(|c| vec![c.name.clone(), fmt_yen(c.amount)])
                    .collect();
                println!("{}", pretty_table(&["Card", "Monthly charge"], rows));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let mut cards = store::default_cards(conn, session)?;
            let before = cards.len();
            cards.retain(|c| c.name != name);
            if cards.len() == before {
                bail!("Default card '{}' not found", name);
            }
            store::set_default_cards(conn, session, &cards)?;
            println!("Removed default card '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
