// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use kakeibo::commands::goals;
use kakeibo::models::GoalPeriod;
use kakeibo::session::Session;
use kakeibo::{cli, db, store};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &Connection, session: &Session, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["kakeibo", "goal"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("goal", goal_m)) = matches.subcommand() {
        goals::handle(conn, session, goal_m)
    } else {
        panic!("no goal subcommand");
    }
}

#[test]
fn set_goal_stores_yearly_bonus_and_projects() {
    let conn = setup();
    let s = Session::new("alice");
    run(
        &conn,
        &s,
        &[
            "set",
            "--period",
            "1year",
            "--target",
            "1000000",
            "--nisa-monthly",
            "10000",
            "--yield",
            "5",
            "--bonus",
            "200000",
            "--monthly",
            "30000",
        ],
    )
    .unwrap();

    let goal = store::get_goal(&conn, &s, GoalPeriod::OneYear).unwrap().unwrap();
    assert_eq!(goal.bonus_per_year, 400_000);
    assert_eq!(goal.bonus_frequency, 2);
    assert_eq!(goal.nisa_yield_rate, Decimal::new(5, 0));

    let view = goals::goal_view(goal);
    assert_eq!(view.per_bonus_amount, 200_000);
    assert_eq!(view.projection.nisa, 122_789);
    assert_eq!(view.projection.bonus, 400_000);
    assert_eq!(view.projection.monthly, 360_000);
    assert_eq!(view.projection.total, 882_789);
    assert_eq!(view.achievement_rate, 88);
    assert_eq!(view.shortfall_per_month, 9_768);
}

#[test]
fn omitted_monthly_is_solved_for_the_target() {
    let conn = setup();
    let s = Session::new("alice");
    run(
        &conn,
        &s,
        &["set", "--period", "3year", "--target", "3600000", "--yield", "0"],
    )
    .unwrap();
    let goal = store::get_goal(&conn, &s, GoalPeriod::ThreeYear).unwrap().unwrap();
    assert_eq!(goal.monthly_savings, 100_000);
    assert_eq!(goals::goal_view(goal).achievement_rate, 100);
}

#[test]
fn yield_defaults_to_configured_rate() {
    let conn = setup();
    let s = Session::new("alice");
    store::set_setting(&conn, &s, store::DEFAULT_YIELD_KEY, "3.5").unwrap();
    run(
        &conn,
        &s,
        &["set", "--period", "5year", "--target", "100", "--monthly", "0"],
    )
    .unwrap();
    let goal = store::get_goal(&conn, &s, GoalPeriod::FiveYear).unwrap().unwrap();
    assert_eq!(goal.nisa_yield_rate, Decimal::new(35, 1));
}

#[test]
fn setting_a_period_twice_replaces_it() {
    let conn = setup();
    let s = Session::new("alice");
    for target in ["500000", "700000"] {
        run(
            &conn,
            &s,
            &["set", "--period", "1year", "--target", target, "--monthly", "0"],
        )
        .unwrap();
    }
    let goals = store::list_goals(&conn, &s).unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].target_amount, 700_000);
}

#[test]
fn simulation_ends_at_the_goal_period() {
    let conn = setup();
    let s = Session::new("alice");
    run(
        &conn,
        &s,
        &["set", "--period", "1year", "--target", "120000", "--monthly", "10000", "--yield", "0"],
    )
    .unwrap();
    let goal = store::get_goal(&conn, &s, GoalPeriod::OneYear).unwrap().unwrap();
    let sim = goals::simulation(&goal);
    let last = sim.milestones.last().unwrap();
    assert_eq!(last.month, 12);
    assert_eq!(last.total, 120_000);
    let years: Vec<u32> = sim.long_term.iter().map(|p| p.years).collect();
    assert_eq!(years, [5, 7, 10]);
}

#[test]
fn zero_target_and_bad_period_are_rejected() {
    let conn = setup();
    let s = Session::new("alice");
    assert!(run(&conn, &s, &["set", "--period", "1year", "--target", "0"]).is_err());
    assert!(run(&conn, &s, &["set", "--period", "2year", "--target", "10"]).is_err());
    assert!(run(&conn, &s, &["show", "--period", "10year"]).is_err());
}

#[test]
fn overflowing_bonus_total_is_rejected() {
    let conn = setup();
    let s = Session::new("alice");
    let err = run(
        &conn,
        &s,
        &[
            "set",
            "--period",
            "1year",
            "--target",
            "100",
            "--bonus",
            "9223372036854775807",
            "--bonus-frequency",
            "2",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("too large"));
    assert!(store::get_goal(&conn, &s, GoalPeriod::OneYear).unwrap().is_none());
}
