// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use kakeibo::config::Config;
use kakeibo::{cli, commands, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    logging::init_tracing(matches.get_flag("verbose"));
    let cfg = Config::resolve(
        matches.get_one::<String>("db").map(String::as_str),
        matches.get_one::<String>("user").map(String::as_str),
    )?;
    let conn = db::open_at(&cfg.db_path)?;
    let session = cfg.session();

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", cfg.db_path.display());
        }
        Some(("category", sub)) => commands::categories::handle(&conn, &session, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&conn, &session, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&conn, &session, sub)?,
        Some(("income", sub)) => commands::income::handle(&conn, &session, sub)?,
        Some(("card", sub)) => commands::cards::handle(&conn, &session, sub)?,
        Some(("nisa", sub)) => commands::nisa::handle(&conn, &session, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&conn, &session, sub)?,
        Some(("record", sub)) => commands::records::handle(&conn, &session, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &session, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &session)?,
        Some(("config", sub)) => commands::settings::handle(&conn, &session, &cfg, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
