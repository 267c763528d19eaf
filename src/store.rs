// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::KakeiboError;
use crate::models::{
    Category, DefaultCard, Expense, GoalPeriod, IncomeFrequency, IncomeType, LineItem,
    MonthlyAssetRecord, NisaAccount, RecordDraft, RecurringIncome, SavingsGoal,
};
use crate::session::Session;

pub const DEFAULT_CARDS_KEY: &str = "default_credit_cards";
pub const DEFAULT_YIELD_KEY: &str = "default_yield_rate";

fn conversion_err<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn parse_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| conversion_err(idx, e))
}

fn details_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Vec<LineItem>>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(s) => serde_json::from_str(&s)
            .map(Some)
            .map_err(|e| conversion_err(idx, e)),
        None => Ok(None),
    }
}

fn details_json(items: &Option<Vec<LineItem>>) -> Result<Option<String>> {
    items
        .as_ref()
        .map(|v| serde_json::to_string(v).context("Serialize record details"))
        .transpose()
}

// Settings

pub fn get_setting(conn: &Connection, session: &Session, key: &str) -> Result<Option<String>> {
    let v = conn
        .query_row(
            "SELECT value FROM settings WHERE user_id=?1 AND key=?2",
            params![session.user_id, key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, session: &Session, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(user_id, key, value) VALUES(?1, ?2, ?3)
         ON CONFLICT(user_id, key) DO UPDATE SET value=excluded.value",
        params![session.user_id, key, value],
    )?;
    Ok(())
}

pub fn default_cards(conn: &Connection, session: &Session) -> Result<Vec<DefaultCard>> {
    match get_setting(conn, session, DEFAULT_CARDS_KEY)? {
        Some(s) => serde_json::from_str(&s).with_context(|| {
            format!(
                "Invalid {} setting for {}",
                DEFAULT_CARDS_KEY, session.user_id
            )
        }),
        None => Ok(Vec::new()),
    }
}

pub fn set_default_cards(
    conn: &Connection,
    session: &Session,
    cards: &[DefaultCard],
) -> Result<()> {
    set_setting(conn, session, DEFAULT_CARDS_KEY, &serde_json::to_string(cards)?)
}

pub fn default_yield_rate(conn: &Connection, session: &Session) -> Result<Decimal> {
    match get_setting(conn, session, DEFAULT_YIELD_KEY)? {
        Some(s) => s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid {} setting '{}'", DEFAULT_YIELD_KEY, s)),
        None => Ok(Decimal::new(500, 2)),
    }
}

// Categories

fn category_from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        budget: r.get(2)?,
        is_fixed: r.get(3)?,
        display_order: r.get(4)?,
    })
}

pub fn add_category(
    conn: &Connection,
    session: &Session,
    name: &str,
    budget: i64,
    is_fixed: bool,
    display_order: Option<i64>,
) -> Result<i64> {
    let order = match display_order {
        Some(o) => o,
        None => conn.query_row(
            "SELECT IFNULL(MAX(display_order), 0) + 1 FROM categories WHERE user_id=?1",
            params![session.user_id],
            |r| r.get(0),
        )?,
    };
    conn.execute(
        "INSERT INTO categories(user_id, name, budget, is_fixed, display_order) VALUES (?1,?2,?3,?4,?5)",
        params![session.user_id, name, budget, is_fixed, order],
    )
    .with_context(|| format!("Add category '{}'", name))?;
    Ok(conn.last_insert_rowid())
}

pub fn list_categories(conn: &Connection, session: &Session) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, budget, is_fixed, display_order FROM categories
         WHERE user_id=?1 ORDER BY display_order, name",
    )?;
    let rows = stmt.query_map(params![session.user_id], category_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn id_for_category(conn: &Connection, session: &Session, name: &str) -> Result<i64> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE user_id=?1 AND name=?2",
            params![session.user_id, name],
            |r| r.get(0),
        )
        .optional()?;
    id.ok_or_else(|| KakeiboError::CategoryNotFound(name.to_string()).into())
}

pub fn set_category_budget(
    conn: &Connection,
    session: &Session,
    name: &str,
    budget: i64,
) -> Result<()> {
    let n = conn.execute(
        "UPDATE categories SET budget=?3 WHERE user_id=?1 AND name=?2",
        params![session.user_id, name, budget],
    )?;
    if n == 0 {
        return Err(KakeiboError::CategoryNotFound(name.to_string()).into());
    }
    Ok(())
}

pub fn remove_category(conn: &Connection, session: &Session, name: &str) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM categories WHERE user_id=?1 AND name=?2",
        params![session.user_id, name],
    )?)
}

// Expenses

pub fn add_expense(
    conn: &Connection,
    session: &Session,
    category_id: Option<i64>,
    amount: i64,
    memo: Option<&str>,
    date: NaiveDate,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO expenses(user_id, category_id, amount, memo, date) VALUES (?1,?2,?3,?4,?5)",
        params![session.user_id, category_id, amount, memo, date],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn expenses_between(
    conn: &Connection,
    session: &Session,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, category_id, amount, memo, date FROM expenses
         WHERE user_id=?1 AND date>=?2 AND date<=?3 ORDER BY date, id",
    )?;
    let rows = stmt.query_map(params![session.user_id, start, end], |r| {
        Ok(Expense {
            id: r.get(0)?,
            category_id: r.get(1)?,
            amount: r.get(2)?,
            memo: r.get(3)?,
            date: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

// Recurring income

fn income_from_row(r: &Row<'_>) -> rusqlite::Result<RecurringIncome> {
    Ok(RecurringIncome {
        id: r.get(0)?,
        name: r.get(1)?,
        income_type: parse_col::<IncomeType>(r, 2)?,
        amount: r.get(3)?,
        frequency: parse_col::<IncomeFrequency>(r, 4)?,
        is_active: r.get(5)?,
    })
}

pub fn add_income(
    conn: &Connection,
    session: &Session,
    name: &str,
    income_type: IncomeType,
    amount: i64,
    frequency: IncomeFrequency,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO income_records(user_id, name, income_type, amount, frequency) VALUES (?1,?2,?3,?4,?5)",
        params![session.user_id, name, income_type.as_str(), amount, frequency.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_incomes(
    conn: &Connection,
    session: &Session,
    include_inactive: bool,
) -> Result<Vec<RecurringIncome>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, income_type, amount, frequency, is_active FROM income_records
         WHERE user_id=?1 AND (?2 OR is_active=1) ORDER BY id",
    )?;
    let rows = stmt.query_map(params![session.user_id, include_inactive], income_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn active_monthly_incomes(
    conn: &Connection,
    session: &Session,
) -> Result<Vec<RecurringIncome>> {
    Ok(list_incomes(conn, session, false)?
        .into_iter()
        .filter(|i| i.frequency == IncomeFrequency::Monthly)
        .collect())
}

/// Soft delete; the definition stays for history but stops feeding rollovers.
pub fn deactivate_income(conn: &Connection, session: &Session, id: i64) -> Result<usize> {
    Ok(conn.execute(
        "UPDATE income_records SET is_active=0 WHERE user_id=?1 AND id=?2",
        params![session.user_id, id],
    )?)
}

// NISA accounts

pub fn add_nisa_account(
    conn: &Connection,
    session: &Session,
    account: &NisaAccount,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO nisa_accounts(user_id, name, broker_name, current_value, total_invested, monthly_contribution)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            session.user_id,
            account.name,
            account.broker_name,
            account.current_value,
            account.total_invested,
            account.monthly_contribution
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_nisa_accounts(
    conn: &Connection,
    session: &Session,
    include_inactive: bool,
) -> Result<Vec<NisaAccount>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, broker_name, current_value, total_invested, monthly_contribution, is_active
         FROM nisa_accounts WHERE user_id=?1 AND (?2 OR is_active=1) ORDER BY id",
    )?;
    let rows = stmt.query_map(params![session.user_id, include_inactive], |r| {
        Ok(NisaAccount {
            id: r.get(0)?,
            name: r.get(1)?,
            broker_name: r.get(2)?,
            current_value: r.get(3)?,
            total_invested: r.get(4)?,
            monthly_contribution: r.get(5)?,
            is_active: r.get(6)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn deactivate_nisa_account(conn: &Connection, session: &Session, id: i64) -> Result<usize> {
    Ok(conn.execute(
        "UPDATE nisa_accounts SET is_active=0 WHERE user_id=?1 AND id=?2",
        params![session.user_id, id],
    )?)
}

pub fn nisa_monthly_total(conn: &Connection, session: &Session) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT IFNULL(SUM(monthly_contribution), 0) FROM nisa_accounts WHERE user_id=?1 AND is_active=1",
        params![session.user_id],
        |r| r.get(0),
    )?)
}

// Savings goals

fn goal_from_row(r: &Row<'_>) -> rusqlite::Result<SavingsGoal> {
    Ok(SavingsGoal {
        id: r.get(0)?,
        period: parse_col::<GoalPeriod>(r, 1)?,
        target_amount: r.get(2)?,
        nisa_monthly: r.get(3)?,
        nisa_yield_rate: parse_col::<Decimal>(r, 4)?,
        bonus_per_year: r.get(5)?,
        bonus_frequency: r.get(6)?,
        monthly_savings: r.get(7)?,
        is_active: r.get(8)?,
    })
}

const GOAL_COLUMNS: &str = "id, period, target_amount, nisa_monthly, nisa_yield_rate, \
    bonus_per_year, bonus_frequency, monthly_savings, is_active";

/// One goal per period; saving again replaces the figures in place.
pub fn upsert_goal(
    conn: &Connection,
    session: &Session,
    goal: &SavingsGoal,
) -> Result<SavingsGoal> {
    conn.execute(
        "INSERT INTO savings_goals(user_id, period, target_amount, nisa_monthly, nisa_yield_rate,
                                   bonus_per_year, bonus_frequency, monthly_savings, is_active)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,1)
         ON CONFLICT(user_id, period) DO UPDATE SET
            target_amount=excluded.target_amount,
            nisa_monthly=excluded.nisa_monthly,
            nisa_yield_rate=excluded.nisa_yield_rate,
            bonus_per_year=excluded.bonus_per_year,
            bonus_frequency=excluded.bonus_frequency,
            monthly_savings=excluded.monthly_savings,
            is_active=1,
            updated_at=datetime('now')",
        params![
            session.user_id,
            goal.period.as_str(),
            goal.target_amount,
            goal.nisa_monthly,
            goal.nisa_yield_rate.to_string(),
            goal.bonus_per_year,
            goal.bonus_frequency,
            goal.monthly_savings
        ],
    )?;
    tracing::info!(user = %session.user_id, period = %goal.period, "savings goal saved");
    get_goal(conn, session, goal.period)?
        .ok_or_else(|| KakeiboError::GoalNotFound(goal.period.to_string()).into())
}

pub fn get_goal(
    conn: &Connection,
    session: &Session,
    period: GoalPeriod,
) -> Result<Option<SavingsGoal>> {
    let sql = format!(
        "SELECT {} FROM savings_goals WHERE user_id=?1 AND period=?2",
        GOAL_COLUMNS
    );
    Ok(conn
        .query_row(&sql, params![session.user_id, period.as_str()], goal_from_row)
        .optional()?)
}

pub fn list_goals(conn: &Connection, session: &Session) -> Result<Vec<SavingsGoal>> {
    let sql = format!(
        "SELECT {} FROM savings_goals WHERE user_id=?1 AND is_active=1 ORDER BY id",
        GOAL_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![session.user_id], goal_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    out.sort_by_key(|g| g.period.years());
    Ok(out)
}

pub fn delete_goal(conn: &Connection, session: &Session, period: GoalPeriod) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM savings_goals WHERE user_id=?1 AND period=?2",
        params![session.user_id, period.as_str()],
    )?)
}

// Monthly asset records

const RECORD_COLUMNS: &str = "id, user_id, year_month, bank_balance, monthly_income, \
    credit_expenses, nisa_value, calculated_balance, is_confirmed, notes, \
    bank_details, income_details, credit_details, nisa_details";

fn record_from_row(r: &Row<'_>) -> rusqlite::Result<MonthlyAssetRecord> {
    Ok(MonthlyAssetRecord {
        id: r.get(0)?,
        user_id: r.get(1)?,
        year_month: r.get(2)?,
        bank_balance: r.get(3)?,
        monthly_income: r.get(4)?,
        credit_expenses: r.get(5)?,
        nisa_value: r.get(6)?,
        calculated_balance: r.get(7)?,
        is_confirmed: r.get(8)?,
        notes: r.get(9)?,
        bank_details: details_col(r, 10)?,
        income_details: details_col(r, 11)?,
        credit_details: details_col(r, 12)?,
        nisa_details: details_col(r, 13)?,
    })
}

pub fn fetch_record(
    conn: &Connection,
    session: &Session,
    month: &str,
) -> Result<Option<MonthlyAssetRecord>> {
    let sql = format!(
        "SELECT {} FROM monthly_asset_records WHERE user_id=?1 AND year_month=?2",
        RECORD_COLUMNS
    );
    Ok(conn
        .query_row(&sql, params![session.user_id, month], record_from_row)
        .optional()?)
}

/// Writes the whole record for `(user, month)`, replacing any existing row.
/// `calculated_balance` is always recomputed from the draft here.
pub fn upsert_record(
    conn: &Connection,
    session: &Session,
    month: &str,
    draft: &RecordDraft,
    is_confirmed: bool,
) -> Result<MonthlyAssetRecord> {
    draft.validate()?;
    conn.execute(
        "INSERT INTO monthly_asset_records(user_id, year_month, bank_balance, monthly_income, credit_expenses,
                                           nisa_value, calculated_balance, is_confirmed, notes,
                                           bank_details, income_details, credit_details, nisa_details)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)
         ON CONFLICT(user_id, year_month) DO UPDATE SET
            bank_balance=excluded.bank_balance,
            monthly_income=excluded.monthly_income,
            credit_expenses=excluded.credit_expenses,
            nisa_value=excluded.nisa_value,
            calculated_balance=excluded.calculated_balance,
            is_confirmed=excluded.is_confirmed,
            notes=excluded.notes,
            bank_details=excluded.bank_details,
            income_details=excluded.income_details,
            credit_details=excluded.credit_details,
            nisa_details=excluded.nisa_details,
            updated_at=datetime('now')",
        params![
            session.user_id,
            month,
            draft.bank_balance,
            draft.monthly_income,
            draft.credit_expenses,
            draft.nisa_value,
            draft.calculated_balance(),
            is_confirmed,
            draft.notes,
            details_json(&draft.bank_details)?,
            details_json(&draft.income_details)?,
            details_json(&draft.credit_details)?,
            details_json(&draft.nisa_details)?
        ],
    )?;
    tracing::info!(user = %session.user_id, month, confirmed = is_confirmed, "asset record saved");
    fetch_record(conn, session, month)?.ok_or_else(|| {
        KakeiboError::RecordNotFound {
            month: month.to_string(),
        }
        .into()
    })
}

/// Newest month first.
pub fn list_records(
    conn: &Connection,
    session: &Session,
    limit: Option<usize>,
) -> Result<Vec<MonthlyAssetRecord>> {
    let sql = format!(
        "SELECT {} FROM monthly_asset_records WHERE user_id=?1 ORDER BY year_month DESC LIMIT ?2",
        RECORD_COLUMNS
    );
    let limit = limit.map(|l| l as i64).unwrap_or(-1);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![session.user_id, limit], record_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
