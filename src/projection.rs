// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Savings-goal projection.
//!
//! Only the NISA stream compounds. Bonus and flat monthly savings accumulate
//! linearly. All amounts are whole yen; fractional intermediate values are rounded
//! to the nearest integer with halves away from zero (`f64::round`), which is
//! half-up for the non-negative amounts this module is fed.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::models::SavingsGoal;

/// Horizons shown alongside every goal, independent of its own period.
pub const LONG_TERM_YEARS: [u32; 3] = [5, 7, 10];

/// Future value of `monthly_amount` paid in every month for `years` years at an
/// annual yield of `annual_yield_percent` percent, compounded monthly.
///
/// `years` may be fractional so that partial-year milestones can be evaluated.
pub fn future_value_of_monthly_contribution(
    monthly_amount: i64,
    annual_yield_percent: Decimal,
    years: f64,
) -> i64 {
    if monthly_amount == 0 {
        return 0;
    }
    let months = years * 12.0;
    let amount = monthly_amount as f64;
    if annual_yield_percent.is_zero() {
        return (amount * months).round() as i64;
    }
    let r = annual_yield_percent.to_f64().unwrap_or(0.0) / 100.0 / 12.0;
    if r == 0.0 {
        return (amount * months).round() as i64;
    }
    (amount * (((1.0 + r).powf(months) - 1.0) / r)).round() as i64
}

/// Per-stream contribution to a goal over a horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionBreakdown {
    pub years: u32,
    pub nisa: i64,
    pub bonus: i64,
    pub monthly: i64,
    pub total: i64,
}

fn linear(amount: i64, multiplier: f64) -> i64 {
    (amount as f64 * multiplier).round() as i64
}

pub fn total_projected_savings(goal: &SavingsGoal, years: f64) -> i64 {
    let nisa =
        future_value_of_monthly_contribution(goal.nisa_monthly, goal.nisa_yield_rate, years);
    nisa + linear(goal.bonus_per_year, years) + linear(goal.monthly_savings, years * 12.0)
}

/// Percentage of the target reached by the projection. Not capped; a zero target
/// yields 0.
pub fn achievement_rate(goal: &SavingsGoal, years: f64) -> i64 {
    if goal.target_amount == 0 {
        return 0;
    }
    let total = total_projected_savings(goal, years) as f64;
    (total / goal.target_amount as f64 * 100.0).round() as i64
}

pub fn breakdown(goal: &SavingsGoal, years: u32) -> ProjectionBreakdown {
    let y = years as f64;
    let nisa = future_value_of_monthly_contribution(goal.nisa_monthly, goal.nisa_yield_rate, y);
    let bonus = linear(goal.bonus_per_year, y);
    let monthly = goal.monthly_savings * 12 * years as i64;
    ProjectionBreakdown {
        years,
        nisa,
        bonus,
        monthly,
        total: nisa + bonus + monthly,
    }
}

pub fn long_term_projections(goal: &SavingsGoal) -> Vec<ProjectionBreakdown> {
    LONG_TERM_YEARS.iter().map(|y| breakdown(goal, *y)).collect()
}

/// Flat monthly amount still needed after NISA and bonus contributions, rounded up.
pub fn required_monthly_savings(
    target_amount: i64,
    nisa_monthly: i64,
    nisa_yield_rate: Decimal,
    bonus_per_year: i64,
    years: u32,
) -> i64 {
    if years == 0 {
        return 0;
    }
    let y = years as f64;
    let nisa = future_value_of_monthly_contribution(nisa_monthly, nisa_yield_rate, y);
    let remaining = target_amount - nisa - bonus_per_year * years as i64;
    let months = years as f64 * 12.0;
    ((remaining as f64) / months).ceil().max(0.0) as i64
}

/// Recovers the single-bonus amount from the pre-multiplied yearly figure.
pub fn per_bonus_amount(bonus_per_year: i64, bonus_frequency: i64) -> i64 {
    if bonus_frequency > 0 {
        (bonus_per_year as f64 / bonus_frequency as f64).round() as i64
    } else {
        bonus_per_year
    }
}

/// Share of `target` reached by `current`, capped at 100.
pub fn progress(current: i64, target: i64) -> i64 {
    if target == 0 {
        return 0;
    }
    ((current as f64 / target as f64) * 100.0).round().min(100.0) as i64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    pub month: u32,
    pub nisa: i64,
    pub bonus: i64,
    pub monthly: i64,
    pub total: i64,
    pub progress: i64,
}

fn milestone_interval(years: u32) -> u32 {
    match years {
        1 => 3,
        3 => 6,
        _ => 12,
    }
}

/// Cumulative position at selected months of the goal's own period.
pub fn milestones(goal: &SavingsGoal) -> Vec<Milestone> {
    let years = goal.period.years();
    let last = years * 12;
    let interval = milestone_interval(years);
    (1..=last)
        .filter(|m| m % interval == 0 || *m == last)
        .map(|month| {
            let elapsed = month as f64 / 12.0;
            let nisa = future_value_of_monthly_contribution(
                goal.nisa_monthly,
                goal.nisa_yield_rate,
                elapsed,
            );
            let bonus = linear(goal.bonus_per_year, elapsed);
            let monthly = goal.monthly_savings * month as i64;
            let total = nisa + bonus + monthly;
            Milestone {
                month,
                nisa,
                bonus,
                monthly,
                total,
                progress: progress(total, goal.target_amount),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoalPeriod;

    fn goal(period: GoalPeriod) -> SavingsGoal {
        SavingsGoal {
            id: 1,
            period,
            target_amount: 1_000_000,
            nisa_monthly: 10_000,
            nisa_yield_rate: Decimal::new(500, 2),
            bonus_per_year: 200_000,
            bonus_frequency: 2,
            monthly_savings: 30_000,
            is_active: true,
        }
    }

    #[test]
    fn zero_contribution_is_zero_for_any_rate() {
        assert_eq!(
            future_value_of_monthly_contribution(0, Decimal::new(500, 2), 10.0),
            0
        );
        assert_eq!(future_value_of_monthly_contribution(0, Decimal::ZERO, 3.0), 0);
    }

    #[test]
    fn zero_rate_is_linear() {
        assert_eq!(
            future_value_of_monthly_contribution(12_345, Decimal::ZERO, 3.0),
            12_345 * 3 * 12
        );
    }

    #[test]
    fn five_percent_for_one_year() {
        // 10000 * ((1 + 0.05/12)^12 - 1) / (0.05/12) = 122788.55...
        assert_eq!(
            future_value_of_monthly_contribution(10_000, Decimal::new(500, 2), 1.0),
            122_789
        );
    }

    #[test]
    fn monotonic_in_each_argument() {
        let rate = Decimal::new(300, 2);
        let mut prev = 0;
        for amount in [0, 1, 500, 10_000, 50_000] {
            let v = future_value_of_monthly_contribution(amount, rate, 5.0);
            assert!(v >= prev);
            prev = v;
        }
        let mut prev = 0;
        for bp in [0, 1, 100, 350, 1200] {
            let v = future_value_of_monthly_contribution(10_000, Decimal::new(bp, 2), 5.0);
            assert!(v >= prev);
            prev = v;
        }
        let mut prev = 0;
        for y in [0.0, 0.25, 1.0, 2.5, 10.0] {
            let v = future_value_of_monthly_contribution(10_000, rate, y);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn bonus_and_flat_savings_do_not_compound() {
        let mut g = goal(GoalPeriod::ThreeYear);
        g.nisa_monthly = 0;
        assert_eq!(total_projected_savings(&g, 3.0), 200_000 * 3 + 30_000 * 36);
    }

    #[test]
    fn achievement_rate_guards_zero_target() {
        let mut g = goal(GoalPeriod::OneYear);
        g.target_amount = 0;
        assert_eq!(achievement_rate(&g, 1.0), 0);
    }

    #[test]
    fn achievement_rate_is_not_capped() {
        let g = goal(GoalPeriod::OneYear);
        // 122789 + 200000 + 360000 = 682789 of 1000000
        assert_eq!(total_projected_savings(&g, 1.0), 682_789);
        assert_eq!(achievement_rate(&g, 1.0), 68);
        let mut small = g.clone();
        small.target_amount = 100_000;
        assert_eq!(achievement_rate(&small, 1.0), 683);
    }

    #[test]
    fn required_monthly_rounds_up_and_floors_at_zero() {
        // (1000000 - 122789 - 200000) / 12 = 56434.25 -> 56435
        assert_eq!(
            required_monthly_savings(1_000_000, 10_000, Decimal::new(500, 2), 200_000, 1),
            56_435
        );
        assert_eq!(
            required_monthly_savings(100_000, 10_000, Decimal::new(500, 2), 200_000, 1),
            0
        );
    }

    #[test]
    fn milestones_follow_period_interval() {
        let months: Vec<u32> = milestones(&goal(GoalPeriod::OneYear))
            .iter()
            .map(|m| m.month)
            .collect();
        assert_eq!(months, vec![3, 6, 9, 12]);
        let three = milestones(&goal(GoalPeriod::ThreeYear));
        assert_eq!(three.len(), 6);
        assert_eq!(three.last().map(|m| m.month), Some(36));
        assert_eq!(milestones(&goal(GoalPeriod::TenYear)).len(), 10);
    }

    #[test]
    fn final_milestone_matches_total() {
        let g = goal(GoalPeriod::OneYear);
        let last = milestones(&g).pop().unwrap();
        assert_eq!(last.total, total_projected_savings(&g, 1.0));
        assert_eq!(last.progress, 68);
    }

    #[test]
    fn per_bonus_amount_handles_zero_frequency() {
        assert_eq!(per_bonus_amount(200_000, 2), 100_000);
        assert_eq!(per_bonus_amount(150_000, 0), 150_000);
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(progress(150, 100), 100);
        assert_eq!(progress(1, 0), 0);
        assert_eq!(progress(333, 1000), 33);
    }
}
