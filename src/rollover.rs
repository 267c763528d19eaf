// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month-to-month asset record rollover.
//!
//! A record goes `absent -> draft -> confirmed`. Drafts come from an explicit save
//! or from [`navigate_next`]; only [`confirm_record`] sets the confirmed flag, and a
//! later save keeps it unless the caller asks for a draft again.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::error::KakeiboError;
use crate::models::{
    DefaultCard, IncomeFrequency, LineItem, MonthlyAssetRecord, RecordDraft, RecurringIncome,
    sum_items,
};
use crate::session::Session;
use crate::store;
use crate::utils::next_month;

/// Seeds the following month from `prior`'s ending position.
///
/// The closing balance becomes the opening bank balance, income and card charges
/// reset to the standing definitions, and NISA grows by the monthly contributions
/// without any yield applied. Pure: same inputs, same draft.
pub fn derive_next_month(
    prior: &MonthlyAssetRecord,
    recurring_incomes: &[RecurringIncome],
    default_cards: &[DefaultCard],
    nisa_contribution_total: i64,
) -> RecordDraft {
    let income_items: Vec<LineItem> = recurring_incomes
        .iter()
        .filter(|i| i.is_active && i.frequency == IncomeFrequency::Monthly)
        .map(|i| LineItem {
            id: Some(i.id),
            name: i.name.clone(),
            amount: i.amount,
        })
        .collect();
    let credit_items: Vec<LineItem> = default_cards
        .iter()
        .map(|c| LineItem::new(c.name.clone(), c.amount))
        .collect();

    RecordDraft {
        bank_balance: prior.calculated_balance,
        monthly_income: sum_items(&income_items),
        credit_expenses: sum_items(&credit_items),
        nisa_value: prior.nisa_value + nisa_contribution_total,
        notes: None,
        bank_details: None,
        income_details: (!income_items.is_empty()).then_some(income_items),
        credit_details: (!credit_items.is_empty()).then_some(credit_items),
        nisa_details: None,
    }
}

/// The user's standing definitions that feed [`derive_next_month`].
#[derive(Debug, Clone, Default)]
pub struct StandingInputs {
    pub incomes: Vec<RecurringIncome>,
    pub cards: Vec<DefaultCard>,
    pub nisa_contribution_total: i64,
}

pub fn standing_inputs(conn: &Connection, session: &Session) -> Result<StandingInputs> {
    Ok(StandingInputs {
        incomes: store::active_monthly_incomes(conn, session)?,
        cards: store::default_cards(conn, session)?,
        nisa_contribution_total: store::nisa_monthly_total(conn, session)?,
    })
}

fn derive_from_store(
    conn: &Connection,
    session: &Session,
    prior: &MonthlyAssetRecord,
) -> Result<RecordDraft> {
    let inputs = standing_inputs(conn, session)?;
    Ok(derive_next_month(
        prior,
        &inputs.incomes,
        &inputs.cards,
        inputs.nisa_contribution_total,
    ))
}

/// Explicit save. `confirmed = None` keeps the stored flag (draft for a new record).
pub fn save_record(
    conn: &Connection,
    session: &Session,
    month: &str,
    draft: &RecordDraft,
    confirmed: Option<bool>,
) -> Result<MonthlyAssetRecord> {
    let is_confirmed = match confirmed {
        Some(flag) => flag,
        None => store::fetch_record(conn, session, month)?
            .map(|r| r.is_confirmed)
            .unwrap_or(false),
    };
    store::upsert_record(conn, session, month, draft, is_confirmed)
}

/// Marks the stored values as actual. Nothing is recomputed.
pub fn confirm_record(
    conn: &Connection,
    session: &Session,
    month: &str,
) -> Result<MonthlyAssetRecord> {
    let current =
        store::fetch_record(conn, session, month)?.ok_or_else(|| KakeiboError::RecordNotFound {
            month: month.to_string(),
        })?;
    tracing::info!(user = %session.user_id, month, "confirming asset record");
    store::upsert_record(conn, session, month, &current.to_draft(), true)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum NavigateOutcome {
    /// The month already had a record; it is returned untouched.
    Existing(MonthlyAssetRecord),
    /// No record existed, so a draft was derived from the prior month and stored.
    Derived(MonthlyAssetRecord),
    /// Neither month has a record; nothing to derive from.
    Empty,
}

/// Moves from `from_month` to the next month, deriving a draft there when it is
/// missing and `from_month` has a record. Existing records are never replaced.
pub fn navigate_next(
    conn: &Connection,
    session: &Session,
    from_month: &str,
) -> Result<(String, NavigateOutcome)> {
    let target = next_month(from_month)?;
    if let Some(existing) = store::fetch_record(conn, session, &target)? {
        return Ok((target, NavigateOutcome::Existing(existing)));
    }
    let Some(prior) = store::fetch_record(conn, session, from_month)? else {
        return Ok((target, NavigateOutcome::Empty));
    };
    let draft = derive_from_store(conn, session, &prior)?;
    tracing::debug!(user = %session.user_id, from = from_month, to = %target, "deriving draft");
    let rec = store::upsert_record(conn, session, &target, &draft, false)?;
    Ok((target, NavigateOutcome::Derived(rec)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The next month was empty and now holds the carried totals.
    Created(MonthlyAssetRecord),
    /// The next month already has a record and `overwrite` was not given.
    Conflict(MonthlyAssetRecord),
    /// The existing next-month record was replaced.
    Overwritten(MonthlyAssetRecord),
}

/// Pushes `from_month` forward into the next month as totals only: every
/// breakdown list on the target is cleared. An existing target is replaced only
/// when `overwrite` is set; otherwise the conflict is reported back.
pub fn apply_to_next_month(
    conn: &Connection,
    session: &Session,
    from_month: &str,
    overwrite: bool,
) -> Result<ApplyOutcome> {
    let source =
        store::fetch_record(conn, session, from_month)?.ok_or_else(|| {
            KakeiboError::RecordNotFound {
                month: from_month.to_string(),
            }
        })?;
    let target = next_month(from_month)?;
    let existing = store::fetch_record(conn, session, &target)?;
    if let Some(rec) = existing.as_ref().filter(|_| !overwrite) {
        tracing::warn!(
            user = %session.user_id,
            month = %target,
            "next month exists, overwrite not confirmed"
        );
        return Ok(ApplyOutcome::Conflict(rec.clone()));
    }
    let draft = derive_from_store(conn, session, &source)?.without_details();
    let rec = store::upsert_record(conn, session, &target, &draft, false)?;
    Ok(match existing {
        Some(_) => ApplyOutcome::Overwritten(rec),
        None => ApplyOutcome::Created(rec),
    })
}

/// Like [`apply_to_next_month`] but turns a conflict into an error.
pub fn apply_to_next_month_strict(
    conn: &Connection,
    session: &Session,
    from_month: &str,
    overwrite: bool,
) -> Result<MonthlyAssetRecord> {
    match apply_to_next_month(conn, session, from_month, overwrite)? {
        ApplyOutcome::Created(rec) | ApplyOutcome::Overwritten(rec) => Ok(rec),
        ApplyOutcome::Conflict(rec) => Err(KakeiboError::NextMonthExists {
            month: rec.year_month,
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IncomeType;

    fn prior() -> MonthlyAssetRecord {
        MonthlyAssetRecord {
            id: 1,
            user_id: "u".into(),
            year_month: "2025-03".into(),
            bank_balance: 100_000,
            monthly_income: 300_000,
            credit_expenses: 80_000,
            nisa_value: 500_000,
            calculated_balance: 320_000,
            is_confirmed: true,
            notes: Some("march".into()),
            bank_details: Some(vec![LineItem::new("Main", 100_000)]),
            income_details: None,
            credit_details: None,
            nisa_details: Some(vec![LineItem::new("SBI", 500_000)]),
        }
    }

    fn income(
        id: i64,
        amount: i64,
        frequency: IncomeFrequency,
        is_active: bool,
    ) -> RecurringIncome {
        RecurringIncome {
            id,
            name: format!("income-{}", id),
            income_type: IncomeType::Salary,
            amount,
            frequency,
            is_active,
        }
    }

    #[test]
    fn derives_balances_from_prior_month() {
        let incomes = [income(1, 300_000, IncomeFrequency::Monthly, true)];
        let cards = [DefaultCard {
            name: "Visa".into(),
            amount: 80_000,
        }];
        let draft = derive_next_month(&prior(), &incomes, &cards, 20_000);
        assert_eq!(draft.bank_balance, 320_000);
        assert_eq!(draft.monthly_income, 300_000);
        assert_eq!(draft.credit_expenses, 80_000);
        assert_eq!(draft.nisa_value, 520_000);
        assert_eq!(draft.calculated_balance(), 540_000);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn only_active_monthly_income_contributes() {
        let incomes = [
            income(1, 300_000, IncomeFrequency::Monthly, true),
            income(2, 600_000, IncomeFrequency::Yearly, true),
            income(3, 50_000, IncomeFrequency::OneTime, true),
            income(4, 20_000, IncomeFrequency::Monthly, false),
        ];
        let draft = derive_next_month(&prior(), &incomes, &[], 0);
        assert_eq!(draft.monthly_income, 300_000);
        let details = draft.income_details.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].id, Some(1));
        assert_eq!(draft.credit_details, None);
    }

    #[test]
    fn prior_breakdowns_are_not_carried() {
        let draft = derive_next_month(&prior(), &[], &[], 0);
        assert_eq!(draft.bank_details, None);
        assert_eq!(draft.nisa_details, None);
        assert_eq!(draft.notes, None);
        assert_eq!(draft.monthly_income, 0);
        assert_eq!(draft.income_details, None);
    }

    #[test]
    fn derivation_is_idempotent() {
        let incomes = [income(1, 300_000, IncomeFrequency::Monthly, true)];
        let cards = [DefaultCard {
            name: "Visa".into(),
            amount: 80_000,
        }];
        let a = derive_next_month(&prior(), &incomes, &cards, 20_000);
        let b = derive_next_month(&prior(), &incomes, &cards, 20_000);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
