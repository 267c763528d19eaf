// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::KakeiboError;
use crate::models::{GoalPeriod, SavingsGoal};
use crate::projection::{
    self, Milestone, ProjectionBreakdown, achievement_rate, breakdown, per_bonus_amount,
    required_monthly_savings,
};
use crate::session::Session;
use crate::store;
use crate::utils::{
    fmt_yen, fmt_yen_short, maybe_print_json, parse_amount, parse_decimal, pretty_table,
};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, session, sub)?,
        Some(("show", sub)) => show(conn, session, sub)?,
        Some(("list", sub)) => list(conn, session, sub)?,
        Some(("simulate", sub)) => simulate(conn, session, sub)?,
        Some(("rm", sub)) => {
            let period = period_arg(sub)?;
            if store::delete_goal(conn, session, period)? == 0 {
                return Err(KakeiboError::GoalNotFound(period.to_string()).into());
            }
            println!("Removed {} goal", period);
        }
        _ => {}
    }
    Ok(())
}

fn period_arg(sub: &clap::ArgMatches) -> Result<GoalPeriod> {
    Ok(sub.get_one::<String>("period").unwrap().parse()?)
}

fn load_goal(conn: &Connection, session: &Session, period: GoalPeriod) -> Result<SavingsGoal> {
    store::get_goal(conn, session, period)?
        .ok_or_else(|| KakeiboError::GoalNotFound(period.to_string()).into())
}

fn set(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_arg(sub)?;
    let target_amount = parse_amount(sub.get_one::<String>("target").unwrap())?;
    if target_amount == 0 {
        bail!("Target amount must be greater than zero");
    }
    let nisa_monthly = parse_amount(sub.get_one::<String>("nisa-monthly").unwrap())?;
    let nisa_yield_rate = match sub.get_one::<String>("yield") {
        Some(s) => parse_decimal(s)?,
        None => store::default_yield_rate(conn, session)?,
    };
    if nisa_yield_rate.is_sign_negative() {
        bail!("Yield rate must not be negative");
    }
    let per_bonus = parse_amount(sub.get_one::<String>("bonus").unwrap())?;
    let bonus_frequency = *sub.get_one::<i64>("bonus-frequency").unwrap();
    if bonus_frequency < 0 {
        bail!("Bonus frequency must not be negative");
    }
    let Some(bonus_per_year) = per_bonus.checked_mul(bonus_frequency) else {
        bail!(
            "Bonus amount {} x {} per year is too large",
            per_bonus,
            bonus_frequency
        );
    };
    let monthly_savings = match sub.get_one::<String>("monthly") {
        Some(s) => parse_amount(s)?,
        None => required_monthly_savings(
            target_amount,
            nisa_monthly,
            nisa_yield_rate,
            bonus_per_year,
            period.years(),
        ),
    };

    let goal = store::upsert_goal(
        conn,
        session,
        &SavingsGoal {
            id: 0,
            period,
            target_amount,
            nisa_monthly,
            nisa_yield_rate,
            bonus_per_year,
            bonus_frequency,
            monthly_savings,
            is_active: true,
        },
    )?;
    let years = period.years() as f64;
    println!(
        "Saved {} goal: target {}, monthly savings {}, projected {} ({}%)",
        period,
        fmt_yen(goal.target_amount),
        fmt_yen(goal.monthly_savings),
        fmt_yen(projection::total_projected_savings(&goal, years)),
        achievement_rate(&goal, years)
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct GoalView {
    pub goal: SavingsGoal,
    pub per_bonus_amount: i64,
    pub projection: ProjectionBreakdown,
    pub achievement_rate: i64,
    pub shortfall_per_month: i64,
}

pub fn goal_view(goal: SavingsGoal) -> GoalView {
    let years = goal.period.years();
    let projection = breakdown(&goal, years);
    let rate = achievement_rate(&goal, years as f64);
    let shortfall = (goal.target_amount - projection.total).max(0);
    let shortfall_per_month = (shortfall as f64 / (years as f64 * 12.0)).ceil() as i64;
    GoalView {
        per_bonus_amount: per_bonus_amount(goal.bonus_per_year, goal.bonus_frequency),
        projection,
        achievement_rate: rate,
        shortfall_per_month,
        goal,
    }
}

fn view_row(v: &GoalView) -> Vec<String> {
    vec![
        v.goal.period.to_string(),
        fmt_yen(v.goal.target_amount),
        fmt_yen(v.projection.nisa),
        fmt_yen(v.projection.bonus),
        fmt_yen(v.projection.monthly),
        fmt_yen(v.projection.total),
        format!("{}%", v.achievement_rate),
    ]
}

const VIEW_HEADERS: [&str; 7] = [
    "Period", "Target", "NISA", "Bonus", "Monthly", "Projected", "Achieved",
];

fn show(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let view = goal_view(load_goal(conn, session, period_arg(sub)?)?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        println!("{}", pretty_table(&VIEW_HEADERS, vec![view_row(&view)]));
        println!(
            "NISA {} / month at {}%, bonus {} x {}, savings {} / month",
            fmt_yen(view.goal.nisa_monthly),
            view.goal.nisa_yield_rate,
            fmt_yen(view.per_bonus_amount),
            view.goal.bonus_frequency,
            fmt_yen(view.goal.monthly_savings)
        );
        if view.shortfall_per_month > 0 {
            println!(
                "Add {} per month to reach the target",
                fmt_yen(view.shortfall_per_month)
            );
        }
    }
    Ok(())
}

fn list(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let views: Vec<GoalView> = store::list_goals(conn, session)?
        .into_iter()
        .map(goal_view)
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &views)? {
        let rows = views.iter().map(view_row).collect();
        println!("{}", pretty_table(&VIEW_HEADERS, rows));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Simulation {
    pub period: GoalPeriod,
    pub target_amount: i64,
    pub achievement_rate: i64,
    pub milestones: Vec<Milestone>,
    pub long_term: Vec<ProjectionBreakdown>,
}

pub fn simulation(goal: &SavingsGoal) -> Simulation {
    Simulation {
        period: goal.period,
        target_amount: goal.target_amount,
        achievement_rate: achievement_rate(goal, goal.period.years() as f64),
        milestones: projection::milestones(goal),
        long_term: projection::long_term_projections(goal),
    }
}

/// Long horizons are shown in the compact 万 form.
fn long_term_row(p: &ProjectionBreakdown) -> Vec<String> {
    vec![
        format!("{} years", p.years),
        fmt_yen_short(p.nisa),
        fmt_yen_short(p.bonus),
        fmt_yen_short(p.monthly),
        fmt_yen_short(p.total),
    ]
}

fn simulate(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let goal = load_goal(conn, session, period_arg(sub)?)?;
    let sim = simulation(&goal);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &sim)? {
        return Ok(());
    }
    println!(
        "{} goal {}: {}% achieved at the end of the period",
        sim.period,
        fmt_yen(sim.target_amount),
        sim.achievement_rate
    );
    let rows = sim
        .milestones
        .iter()
        .map(|m| {
            vec![
                format!("month {}", m.month),
                fmt_yen(m.nisa),
                fmt_yen(m.bonus),
                fmt_yen(m.monthly),
                fmt_yen(m.total),
                format!("{}%", m.progress),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["When", "NISA", "Bonus", "Monthly", "Total", "Progress"], rows)
    );
    let rows = sim.long_term.iter().map(long_term_row).collect();
    println!(
        "{}",
        pretty_table(&["Horizon", "NISA", "Bonus", "Monthly", "Total"], rows)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_term_rows_use_man_units() {
        let p = ProjectionBreakdown {
            years: 5,
            nisa: 680_060,
            bonus: 2_000_000,
            monthly: 1_800_000,
            total: 4_480_060,
        };
        assert_eq!(
            long_term_row(&p),
            vec!["5 years", "¥68.0万", "¥200.0万", "¥180.0万", "¥448.0万"]
        );
    }
}
