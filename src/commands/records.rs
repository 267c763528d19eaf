// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::KakeiboError;
use crate::models::{LineItem, MonthlyAssetRecord, RecordDraft, sum_items};
use crate::rollover::{self, ApplyOutcome, NavigateOutcome};
use crate::session::Session;
use crate::store;
use crate::utils::{
    fmt_yen, maybe_print_json, parse_amount, parse_line_item, parse_month, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, session, sub)?,
        Some(("save", sub)) => save(conn, session, sub)?,
        Some(("confirm", sub)) => {
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            let rec = rollover::confirm_record(conn, session, &month)?;
            println!(
                "Confirmed {} (balance {})",
                rec.year_month,
                fmt_yen(rec.calculated_balance)
            );
        }
        Some(("next", sub)) => next(conn, session, sub)?,
        Some(("apply-next", sub)) => {
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            report_apply(rollover::apply_to_next_month(
                conn,
                session,
                &month,
                sub.get_flag("yes"),
            )?);
        }
        Some(("history", sub)) => history(conn, session, sub)?,
        _ => {}
    }
    Ok(())
}

fn status(rec: &MonthlyAssetRecord) -> &'static str {
    if rec.is_confirmed { "confirmed" } else { "draft" }
}

fn print_record(rec: &MonthlyAssetRecord) {
    println!("{} [{}]", rec.year_month, status(rec));
    let sections = [
        ("Bank balance", rec.bank_balance, &rec.bank_details),
        ("Income", rec.monthly_income, &rec.income_details),
        ("Credit cards", rec.credit_expenses, &rec.credit_details),
        ("NISA", rec.nisa_value, &rec.nisa_details),
    ];
    let mut rows = Vec::new();
    for (label, total, details) in sections {
        rows.push(vec![label.to_string(), String::new(), fmt_yen(total)]);
        for item in details.iter().flatten() {
            rows.push(vec![String::new(), item.name.clone(), fmt_yen(item.amount)]);
        }
    }
    rows.push(vec![
        "Balance".into(),
        "bank + income - cards".into(),
        fmt_yen(rec.calculated_balance),
    ]);
    println!("{}", pretty_table(&["Field", "Item", "Amount"], rows));
    if let Some(notes) = rec.notes.as_deref().filter(|n| !n.is_empty()) {
        println!("Notes: {}", notes);
    }
}

fn show(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let rec = store::fetch_record(conn, session, &month)?
        .ok_or_else(|| KakeiboError::RecordNotFound {
            month: month.clone(),
        })?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rec)? {
        print_record(&rec);
    }
    Ok(())
}

fn items_arg(sub: &clap::ArgMatches, id: &str) -> Result<Option<Vec<LineItem>>> {
    match sub.get_many::<String>(id) {
        Some(values) => Ok(Some(
            values
                .map(|v| parse_line_item(v))
                .collect::<Result<Vec<_>>>()?,
        )),
        None => Ok(None),
    }
}

/// Applies one field's flags onto the draft. Items set both the list and the
/// total; a bare total drops a stale list that no longer sums to it.
fn apply_field(
    scalar: &mut i64,
    details: &mut Option<Vec<LineItem>>,
    total: Option<i64>,
    items: Option<Vec<LineItem>>,
) {
    if let Some(items) = items {
        *scalar = total.unwrap_or_else(|| sum_items(&items));
        *details = Some(items);
    } else if let Some(total) = total {
        *scalar = total;
        if details.as_ref().is_some_and(|d| sum_items(d) != total) {
            *details = None;
        }
    }
}

/// Builds the draft a `record save` invocation describes, on top of `base`.
pub fn draft_from_args(base: Option<RecordDraft>, sub: &clap::ArgMatches) -> Result<RecordDraft> {
    let mut draft = base.unwrap_or_default();
    let total = |id: &str| -> Result<Option<i64>> {
        sub.get_one::<String>(id).map(|s| parse_amount(s)).transpose()
    };
    apply_field(
        &mut draft.bank_balance,
        &mut draft.bank_details,
        total("bank")?,
        items_arg(sub, "bank-item")?,
    );
    apply_field(
        &mut draft.monthly_income,
        &mut draft.income_details,
        total("income")?,
        items_arg(sub, "income-item")?,
    );
    apply_field(
        &mut draft.credit_expenses,
        &mut draft.credit_details,
        total("credit")?,
        items_arg(sub, "credit-item")?,
    );
    apply_field(
        &mut draft.nisa_value,
        &mut draft.nisa_details,
        total("nisa")?,
        items_arg(sub, "nisa-item")?,
    );
    if let Some(notes) = sub.get_one::<String>("notes") {
        let notes = notes.trim();
        draft.notes = (!notes.is_empty()).then(|| notes.to_string());
    }
    draft.validate()?;
    Ok(draft)
}

fn save(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let existing = store::fetch_record(conn, session, &month)?;
    let draft = draft_from_args(existing.as_ref().map(|r| r.to_draft()), sub)?;
    let confirmed = if sub.get_flag("confirm") {
        Some(true)
    } else if sub.get_flag("unconfirm") {
        Some(false)
    } else {
        None
    };
    let rec = rollover::save_record(conn, session, &month, &draft, confirmed)?;
    println!(
        "Saved {} [{}] balance {}",
        rec.year_month,
        status(&rec),
        fmt_yen(rec.calculated_balance)
    );
    if sub.get_flag("apply-next") {
        report_apply(rollover::apply_to_next_month(
            conn,
            session,
            &month,
            sub.get_flag("yes"),
        )?);
    }
    Ok(())
}

fn report_apply(outcome: ApplyOutcome) {
    match outcome {
        ApplyOutcome::Created(rec) => println!(
            "Created {} from totals (balance {})",
            rec.year_month,
            fmt_yen(rec.calculated_balance)
        ),
        ApplyOutcome::Overwritten(rec) => println!(
            "Overwrote {} with totals; its breakdowns were cleared (balance {})",
            rec.year_month,
            fmt_yen(rec.calculated_balance)
        ),
        ApplyOutcome::Conflict(rec) => println!(
            "{} already has a {} record; rerun with --yes to overwrite it",
            rec.year_month,
            status(&rec)
        ),
    }
}

fn next(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let (target, outcome) = rollover::navigate_next(conn, session, &month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &outcome)? {
        return Ok(());
    }
    match outcome {
        NavigateOutcome::Existing(rec) => print_record(&rec),
        NavigateOutcome::Derived(rec) => {
            println!("Derived a draft for {} from {}", target, month);
            print_record(&rec);
        }
        NavigateOutcome::Empty => println!("{}: no record yet", target),
    }
    Ok(())
}

fn history(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let limit = sub.get_one::<usize>("limit").copied();
    let records = store::list_records(conn, session, limit)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &records)? {
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.year_month.clone(),
                    fmt_yen(r.bank_balance),
                    fmt_yen(r.monthly_income),
                    fmt_yen(r.credit_expenses),
                    fmt_yen(r.calculated_balance),
                    fmt_yen(r.nisa_value),
                    status(r).to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Bank", "Income", "Cards", "Balance", "NISA", "Status"],
                rows
            )
        );
    }
    Ok(())
}
