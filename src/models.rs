// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::KakeiboError;

/// One named amount inside a record breakdown (a bank account, a salary, a card).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub amount: i64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, amount: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            amount,
        }
    }
}

pub fn sum_items(items: &[LineItem]) -> i64 {
    items.iter().map(|i| i.amount).sum()
}

/// Stored snapshot of one user's assets for a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAssetRecord {
    pub id: i64,
    pub user_id: String,
    pub year_month: String, // YYYY-MM
    pub bank_balance: i64,
    pub monthly_income: i64,
    pub credit_expenses: i64,
    pub nisa_value: i64,
    pub calculated_balance: i64,
    pub is_confirmed: bool,
    pub notes: Option<String>,
    pub bank_details: Option<Vec<LineItem>>,
    pub income_details: Option<Vec<LineItem>>,
    pub credit_details: Option<Vec<LineItem>>,
    pub nisa_details: Option<Vec<LineItem>>,
}

impl MonthlyAssetRecord {
    /// The editable fields of this record, as they would be re-saved.
    pub fn to_draft(&self) -> RecordDraft {
        RecordDraft {
            bank_balance: self.bank_balance,
            monthly_income: self.monthly_income,
            credit_expenses: self.credit_expenses,
            nisa_value: self.nisa_value,
            notes: self.notes.clone(),
            bank_details: self.bank_details.clone(),
            income_details: self.income_details.clone(),
            credit_details: self.credit_details.clone(),
            nisa_details: self.nisa_details.clone(),
        }
    }
}

/// Writable fields of a monthly record. `calculated_balance` is deliberately absent:
/// it is always derived at write time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub bank_balance: i64,
    pub monthly_income: i64,
    pub credit_expenses: i64,
    pub nisa_value: i64,
    pub notes: Option<String>,
    pub bank_details: Option<Vec<LineItem>>,
    pub income_details: Option<Vec<LineItem>>,
    pub credit_details: Option<Vec<LineItem>>,
    pub nisa_details: Option<Vec<LineItem>>,
}

impl RecordDraft {
    pub fn calculated_balance(&self) -> i64 {
        self.bank_balance + self.monthly_income - self.credit_expenses
    }

    /// Totals only; every breakdown list is dropped.
    pub fn without_details(self) -> Self {
        Self {
            bank_details: None,
            income_details: None,
            credit_details: None,
            nisa_details: None,
            ..self
        }
    }

    /// Checks that each present breakdown sums to its scalar. Income, card and
    /// NISA totals must not be negative; the bank balance may be, since it opens
    /// at the previous month's closing balance.
    pub fn validate(&self) -> Result<(), KakeiboError> {
        let fields = [
            ("bank_balance", self.bank_balance, &self.bank_details, true),
            ("monthly_income", self.monthly_income, &self.income_details, false),
            ("credit_expenses", self.credit_expenses, &self.credit_details, false),
            ("nisa_value", self.nisa_value, &self.nisa_details, false),
        ];
        for (field, scalar, details, may_be_negative) in fields {
            if scalar < 0 && !may_be_negative {
                return Err(KakeiboError::NegativeAmount {
                    field,
                    amount: scalar,
                });
            }
            if let Some(items) = details {
                let total = sum_items(items);
                if total != scalar {
                    return Err(KakeiboError::DetailSumMismatch {
                        field,
                        scalar,
                        details: total,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeFrequency {
    Monthly,
    Yearly,
    OneTime,
}

impl IncomeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeFrequency::Monthly => "monthly",
            IncomeFrequency::Yearly => "yearly",
            IncomeFrequency::OneTime => "one_time",
        }
    }
}

impl FromStr for IncomeFrequency {
    type Err = KakeiboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(IncomeFrequency::Monthly),
            "yearly" => Ok(IncomeFrequency::Yearly),
            "one_time" | "one-time" => Ok(IncomeFrequency::OneTime),
            other => Err(KakeiboError::InvalidFrequency(other.to_string())),
        }
    }
}

impl fmt::Display for IncomeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeType {
    Salary,
    Bonus,
    SideJob,
    Investment,
    Other,
}

impl IncomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeType::Salary => "salary",
            IncomeType::Bonus => "bonus",
            IncomeType::SideJob => "side_job",
            IncomeType::Investment => "investment",
            IncomeType::Other => "other",
        }
    }
}

impl FromStr for IncomeType {
    type Err = KakeiboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "salary" => Ok(IncomeType::Salary),
            "bonus" => Ok(IncomeType::Bonus),
            "side_job" | "side-job" => Ok(IncomeType::SideJob),
            "investment" => Ok(IncomeType::Investment),
            "other" => Ok(IncomeType::Other),
            other => Err(KakeiboError::InvalidIncomeType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringIncome {
    pub id: i64,
    pub name: String,
    pub income_type: IncomeType,
    pub amount: i64,
    pub frequency: IncomeFrequency,
    pub is_active: bool,
}

/// Expected recurring card charge, kept in the user's settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultCard {
    pub name: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NisaAccount {
    pub id: i64,
    pub name: String,
    pub broker_name: String,
    pub current_value: i64,
    pub total_invested: i64,
    pub monthly_contribution: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalPeriod {
    #[serde(rename = "1year")]
    OneYear,
    #[serde(rename = "3year")]
    ThreeYear,
    #[serde(rename = "5year")]
    FiveYear,
    #[serde(rename = "10year")]
    TenYear,
}

impl GoalPeriod {
    pub const ALL: [GoalPeriod; 4] = [
        GoalPeriod::OneYear,
        GoalPeriod::ThreeYear,
        GoalPeriod::FiveYear,
        GoalPeriod::TenYear,
    ];

    pub fn years(&self) -> u32 {
        match self {
            GoalPeriod::OneYear => 1,
            GoalPeriod::ThreeYear => 3,
            GoalPeriod::FiveYear => 5,
            GoalPeriod::TenYear => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPeriod::OneYear => "1year",
            GoalPeriod::ThreeYear => "3year",
            GoalPeriod::FiveYear => "5year",
            GoalPeriod::TenYear => "10year",
        }
    }
}

impl FromStr for GoalPeriod {
    type Err = KakeiboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalPeriod::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| KakeiboError::InvalidPeriod(s.trim().to_string()))
    }
}

impl fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub period: GoalPeriod,
    pub target_amount: i64,
    pub nisa_monthly: i64,
    pub nisa_yield_rate: Decimal, // annual percent
    pub bonus_per_year: i64,      // per-occurrence amount x frequency
    pub bonus_frequency: i64,
    pub monthly_savings: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub budget: i64, // monthly
    pub is_fixed: bool,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub category_id: Option<i64>,
    pub amount: i64,
    pub memo: Option<String>,
    pub date: NaiveDate,
}
