// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::Session;
use crate::store;
use crate::summary::{self, BudgetSummary, WeeklySummary};
use crate::utils::{
    fmt_yen, maybe_print_json, month_bounds, month_of, parse_amount, parse_date, parse_month,
    pretty_table, week_bounds,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, session, sub)?,
        Some(("week", sub)) => week(conn, session, sub)?,
        Some(("savings", sub)) => savings(conn, session, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn month_summary(conn: &Connection, session: &Session, month: &str) -> Result<BudgetSummary> {
    let (start, end) = month_bounds(month)?;
    let categories = store::list_categories(conn, session)?;
    let expenses = store::expenses_between(conn, session, start, end)?;
    Ok(summary::summarize(&categories, &expenses, start, end))
}

pub fn week_summary(conn: &Connection, session: &Session, day: NaiveDate) -> Result<WeeklySummary> {
    let (start, end) = week_bounds(day);
    let categories = store::list_categories(conn, session)?;
    let expenses = store::expenses_between(conn, session, start, end)?;
    Ok(summary::weekly_summary(&categories, &expenses, day))
}

fn month(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => month_of(Local::now().date_naive()),
    };
    let s = month_summary(conn, session, &month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = s
        .categories
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                fmt_yen(c.budget),
                fmt_yen(c.spent),
                fmt_yen(c.remaining),
                format!("{}%", c.usage_percent),
            ]
        })
        .collect();
    rows.push(vec![
        "TOTAL".into(),
        fmt_yen(s.total_budget),
        fmt_yen(s.total_spent),
        fmt_yen(s.total_remaining),
        format!("{}%", summary::usage_percent(s.total_spent, s.total_budget)),
    ]);
    println!("{}", month);
    println!(
        "{}",
        pretty_table(&["Category", "Budget", "Spent", "Remaining", "Used"], rows)
    );
    Ok(())
}

fn week(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let day = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let w = week_summary(conn, session, day)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &w)? {
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = w
        .categories
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                fmt_yen(c.weekly_budget),
                fmt_yen(c.weekly_spent),
                fmt_yen(c.weekly_remaining),
            ]
        })
        .collect();
    rows.push(vec![
        "TOTAL".into(),
        fmt_yen(w.total_weekly_budget),
        fmt_yen(w.total_weekly_spent),
        fmt_yen(w.total_weekly_remaining),
    ]);
    println!("{} .. {}", w.week_start, w.week_end);
    println!(
        "{}",
        pretty_table(&["Category", "Weekly budget", "Spent", "Remaining"], rows)
    );
    Ok(())
}

fn savings(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let income = match sub.get_one::<String>("income") {
        Some(s) => parse_amount(s)?,
        None => store::active_monthly_incomes(conn, session)?
            .iter()
            .map(|i| i.amount)
            .sum(),
    };
    let categories = store::list_categories(conn, session)?;
    let capacity = summary::monthly_savings_capacity(income, &categories);
    println!(
        "Income {} - budgets {} = {} per month",
        fmt_yen(income),
        fmt_yen(income - capacity),
        fmt_yen(capacity)
    );
    Ok(())
}
