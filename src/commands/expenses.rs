// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::Session;
use crate::store;
use crate::utils::{fmt_yen, maybe_print_json, parse_amount, parse_date, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, session, sub)?,
        Some(("list", sub)) => list(conn, session, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());
    let memo = sub
        .get_one::<String>("memo")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());
    let category_id = match category {
        Some(c) => Some(store::id_for_category(conn, session, c)?),
        None => None,
    };
    store::add_expense(conn, session, category_id, amount, memo, date)?;
    println!(
        "Recorded {} on {} ({})",
        fmt_yen(amount),
        date,
        category.unwrap_or("uncategorized")
    );
    Ok(())
}

fn list(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, session, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.category.clone(),
                    fmt_yen(r.amount),
                    r.memo.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Category", "Amount", "Memo"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub date: String,
    pub category: String,
    pub amount: i64,
    pub memo: String,
}

pub fn query_rows(
    conn: &Connection,
    session: &Session,
    sub: &clap::ArgMatches,
) -> Result<Vec<ExpenseRow>> {
    let mut sql = String::from(
        "SELECT e.date, c.name, e.amount, e.memo FROM expenses e LEFT JOIN categories c ON e.category_id=c.id WHERE e.user_id=?",
    );
    let mut params_vec: Vec<String> = vec![session.user_id.clone()];

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(e.date,1,7)=?");
        params_vec.push(parse_month(month)?);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=?");
        params_vec.push(cat.trim().to_string());
    }
    sql.push_str(" ORDER BY e.date DESC, e.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(ExpenseRow {
            date: r.get(0)?,
            category: r
                .get::<_, Option<String>>(1)?
                .unwrap_or_else(|| "(uncategorized)".into()),
            amount: r.get(2)?,
            memo: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
        });
    }
    Ok(data)
}
