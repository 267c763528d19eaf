// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use kakeibo::commands::{budgets, expenses};
use kakeibo::session::Session;
use kakeibo::utils::parse_date;
use kakeibo::{cli, db, store};
use rusqlite::Connection;

fn setup() -> (Connection, Session) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let s = Session::new("alice");
    let food = store::add_category(&conn, &s, "Food", 30_000, false, None).unwrap();
    let rent = store::add_category(&conn, &s, "Rent", 80_000, true, None).unwrap();
    store::add_category(&conn, &s, "Fun", 10_000, false, None).unwrap();
    for (cat, amount, date) in [
        (food, 5_000, "2025-03-10"),
        (food, 3_000, "2025-04-02"),
        (rent, 80_000, "2025-03-01"),
        (food, 1_200, "2025-03-11"),
    ] {
        store::add_expense(&conn, &s, Some(cat), amount, None, parse_date(date).unwrap()).unwrap();
    }
    (conn, s)
}

#[test]
fn month_summary_counts_only_that_month() {
    let (conn, s) = setup();
    let summary = budgets::month_summary(&conn, &s, "2025-03").unwrap();
    let food = summary.categories.iter().find(|c| c.name == "Food").unwrap();
    assert_eq!(food.spent, 6_200);
    assert_eq!(food.remaining, 23_800);
    assert_eq!(food.usage_percent, 21);
    assert_eq!(summary.total_budget, 120_000);
    assert_eq!(summary.total_spent, 86_200);
    assert_eq!(summary.total_remaining, 33_800);
}

#[test]
fn month_with_no_expenses_spends_nothing() {
    let (conn, s) = setup();
    let summary = budgets::month_summary(&conn, &s, "2025-05").unwrap();
    assert_eq!(summary.total_spent, 0);
    assert_eq!(summary.total_remaining, summary.total_budget);
}

#[test]
fn week_summary_skips_fixed_costs() {
    let (conn, s) = setup();
    // 2025-03-12 is a Wednesday; the week is 03-10..03-16
    let w = budgets::week_summary(&conn, &s, parse_date("2025-03-12").unwrap()).unwrap();
    assert_eq!(w.week_start.to_string(), "2025-03-10");
    let names: Vec<&str> = w.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Food", "Fun"]);
    assert_eq!(w.total_weekly_budget, 7_500 + 2_500);
    assert_eq!(w.total_weekly_spent, 6_200);
    assert_eq!(w.total_weekly_remaining, 3_800);
}

#[test]
fn budgets_are_per_user() {
    let (conn, _) = setup();
    let bob = Session::new("bob");
    let summary = budgets::month_summary(&conn, &bob, "2025-03").unwrap();
    assert!(summary.categories.is_empty());
    assert_eq!(summary.total_budget, 0);
}

#[test]
fn expense_list_filters_and_limits() {
    let (conn, s) = setup();
    let matches = cli::build_cli().get_matches_from([
        "kakeibo",
        "expense",
        "list",
        "--month",
        "2025-03",
        "--category",
        "Food",
        "--limit",
        "1",
    ]);
    if let Some(("expense", exp_m)) = matches.subcommand() {
        if let Some(("list", sub)) = exp_m.subcommand() {
            let rows = expenses::query_rows(&conn, &s, sub).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].date, "2025-03-11");
            assert_eq!(rows[0].amount, 1_200);
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no expense subcommand");
    }
}
