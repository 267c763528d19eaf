// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub fn open_at(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        user_id TEXT NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY(user_id, key)
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        budget INTEGER NOT NULL DEFAULT 0 CHECK(budget >= 0),
        is_fixed INTEGER NOT NULL DEFAULT 0,
        display_order INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, name)
    );

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        category_id INTEGER,
        amount INTEGER NOT NULL CHECK(amount >= 0),
        memo TEXT,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses(user_id, date);

    CREATE TABLE IF NOT EXISTS income_records(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        income_type TEXT NOT NULL DEFAULT 'salary'
            CHECK(income_type IN ('salary','bonus','side_job','investment','other')),
        amount INTEGER NOT NULL CHECK(amount >= 0),
        frequency TEXT NOT NULL CHECK(frequency IN ('monthly','yearly','one_time')),
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS nisa_accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        broker_name TEXT NOT NULL DEFAULT '',
        current_value INTEGER NOT NULL DEFAULT 0,
        total_invested INTEGER NOT NULL DEFAULT 0,
        monthly_contribution INTEGER NOT NULL DEFAULT 0 CHECK(monthly_contribution >= 0),
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS savings_goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        period TEXT NOT NULL CHECK(period IN ('1year','3year','5year','10year')),
        target_amount INTEGER NOT NULL,
        nisa_monthly INTEGER NOT NULL DEFAULT 0,
        nisa_yield_rate TEXT NOT NULL DEFAULT '5.00',
        bonus_per_year INTEGER NOT NULL DEFAULT 0,
        bonus_frequency INTEGER NOT NULL DEFAULT 0,
        monthly_savings INTEGER NOT NULL DEFAULT 0,
        is_active INTEGER NOT NULL DEFAULT 1,
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, period)
    );

    -- details columns hold JSON arrays of {name, amount}
    CREATE TABLE IF NOT EXISTS monthly_asset_records(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        year_month TEXT NOT NULL,
        bank_balance INTEGER NOT NULL,
        monthly_income INTEGER NOT NULL,
        credit_expenses INTEGER NOT NULL,
        nisa_value INTEGER NOT NULL,
        calculated_balance INTEGER NOT NULL,
        is_confirmed INTEGER NOT NULL DEFAULT 0,
        notes TEXT,
        bank_details TEXT,
        income_details TEXT,
        credit_details TEXT,
        nisa_details TEXT,
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, year_month)
    );
    "#,
    )?;
    Ok(())
}
