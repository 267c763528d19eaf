// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Category, Expense};
use crate::utils::week_bounds;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category_id: i64,
    pub name: String,
    pub budget: i64,
    pub spent: i64,
    pub remaining: i64,
    pub usage_percent: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    pub categories: Vec<CategorySummary>,
    pub total_budget: i64,
    pub total_spent: i64,
    pub total_remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyCategorySummary {
    pub category_id: i64,
    pub name: String,
    pub monthly_budget: i64,
    pub weekly_budget: i64,
    pub weekly_spent: i64,
    pub weekly_remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub categories: Vec<WeeklyCategorySummary>,
    pub total_weekly_budget: i64,
    pub total_weekly_spent: i64,
    pub total_weekly_remaining: i64,
}

/// Sum of expenses for one category dated within `[start, end]`.
pub fn spent_in_window(
    category_id: i64,
    expenses: &[Expense],
    start: NaiveDate,
    end: NaiveDate,
) -> i64 {
    expenses
        .iter()
        .filter(|e| e.category_id == Some(category_id) && e.date >= start && e.date <= end)
        .map(|e| e.amount)
        .sum()
}

pub fn usage_percent(spent: i64, budget: i64) -> i64 {
    if budget == 0 {
        return 0;
    }
    ((spent as f64 / budget as f64) * 100.0).round() as i64
}

pub fn summarize(
    categories: &[Category],
    expenses: &[Expense],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> BudgetSummary {
    let per_category: Vec<CategorySummary> = categories
        .iter()
        .map(|c| {
            let spent = spent_in_window(c.id, expenses, window_start, window_end);
            CategorySummary {
                category_id: c.id,
                name: c.name.clone(),
                budget: c.budget,
                spent,
                remaining: c.budget - spent,
                usage_percent: usage_percent(spent, c.budget),
            }
        })
        .collect();

    let total_budget: i64 = categories.iter().map(|c| c.budget).sum();
    let total_spent: i64 = per_category.iter().map(|c| c.spent).sum();
    BudgetSummary {
        categories: per_category,
        total_budget,
        total_spent,
        total_remaining: total_budget - total_spent,
    }
}

/// A quarter of the monthly budget; calendar weeks per month are ignored on purpose.
pub fn weekly_budget(monthly_budget: i64) -> i64 {
    (monthly_budget as f64 / 4.0).round() as i64
}

/// Weekly view over variable costs for the Monday-to-Sunday week containing `week_of`.
/// Fixed categories are left out entirely.
pub fn weekly_summary(
    categories: &[Category],
    expenses: &[Expense],
    week_of: NaiveDate,
) -> WeeklySummary {
    let (week_start, week_end) = week_bounds(week_of);
    let rows: Vec<WeeklyCategorySummary> = categories
        .iter()
        .filter(|c| !c.is_fixed)
        .map(|c| {
            let weekly = weekly_budget(c.budget);
            let spent = spent_in_window(c.id, expenses, week_start, week_end);
            WeeklyCategorySummary {
                category_id: c.id,
                name: c.name.clone(),
                monthly_budget: c.budget,
                weekly_budget: weekly,
                weekly_spent: spent,
                weekly_remaining: weekly - spent,
            }
        })
        .collect();

    let total_weekly_budget: i64 = rows.iter().map(|r| r.weekly_budget).sum();
    let total_weekly_spent: i64 = rows.iter().map(|r| r.weekly_spent).sum();
    WeeklySummary {
        week_start,
        week_end,
        categories: rows,
        total_weekly_budget,
        total_weekly_spent,
        total_weekly_remaining: total_weekly_budget - total_weekly_spent,
    }
}

/// What is left of the monthly income once every category budget is set aside.
pub fn monthly_savings_capacity(monthly_income: i64, categories: &[Category]) -> i64 {
    monthly_income - categories.iter().map(|c| c.budget).sum::<i64>()
}
