// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Duration, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::error::KakeiboError;
use crate::models::LineItem;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    month_start(s)?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Whole-yen amount; negatives are rejected.
pub fn parse_amount(s: &str) -> Result<i64> {
    let v = s
        .trim()
        .replace(',', "")
        .parse::<i64>()
        .with_context(|| format!("Invalid amount '{}', expected a whole number", s))?;
    if v < 0 {
        return Err(KakeiboError::NegativeAmount {
            field: "amount",
            amount: v,
        }
        .into());
    }
    Ok(v)
}

/// Parses `name=amount` as used by the repeated `--*-item` flags.
pub fn parse_line_item(s: &str) -> Result<LineItem> {
    let (name, amount) = s
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Invalid item '{}', expected NAME=AMOUNT", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Invalid item '{}': name is empty", s));
    }
    Ok(LineItem::new(name, parse_amount(amount)?))
}

pub fn month_start(month: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .map_err(|_| KakeiboError::InvalidMonth(month.trim().to_string()).into())
}

pub fn month_end(month: &str) -> Result<NaiveDate> {
    let next = month_start(&next_month(month)?)?;
    Ok(next - Duration::days(1))
}

/// Inclusive first and last day of a `YYYY-MM` month.
pub fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate)> {
    Ok((month_start(month)?, month_end(month)?))
}

pub fn next_month(month: &str) -> Result<String> {
    shift_month(month, 1)
}

fn shift_month(month: &str, delta: i32) -> Result<String> {
    let start = month_start(month)?;
    let idx = start.year() * 12 + start.month0() as i32 + delta;
    let (y, m) = (idx.div_euclid(12), idx.rem_euclid(12) + 1);
    Ok(format!("{:04}-{:02}", y, m))
}

pub fn month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Monday-to-Sunday week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = date.weekday().num_days_from_monday() as i64;
    let start = date - Duration::days(offset);
    (start, start + Duration::days(6))
}

fn group_thousands(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `¥1,234`; negatives render as `-¥1,234`.
pub fn fmt_yen(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}¥{}", sign, group_thousands(amount.unsigned_abs()))
}

/// `¥12.3万` at or above ten thousand, plain `fmt_yen` below.
pub fn fmt_yen_short(amount: i64) -> String {
    if amount >= 10_000 {
        format!("¥{:.1}万", amount as f64 / 10_000.0)
    } else {
        fmt_yen(amount)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_arithmetic_crosses_years() {
        assert_eq!(next_month("2025-12").unwrap(), "2026-01");
        assert_eq!(next_month("2024-01").unwrap(), "2024-02");
        assert_eq!(next_month("2025-03").unwrap(), "2025-04");
    }

    #[test]
    fn month_end_handles_leap_years() {
        assert_eq!(month_end("2024-02").unwrap().to_string(), "2024-02-29");
        assert_eq!(month_end("2025-02").unwrap().to_string(), "2025-02-28");
        assert_eq!(month_end("2025-12").unwrap().to_string(), "2025-12-31");
    }

    #[test]
    fn invalid_month_is_a_domain_error() {
        let err = parse_month("2025-13").unwrap_err();
        assert_eq!(
            err.downcast_ref::<KakeiboError>(),
            Some(&KakeiboError::InvalidMonth("2025-13".into()))
        );
    }

    #[test]
    fn week_starts_on_monday() {
        let (s, e) = week_bounds(parse_date("2025-03-09").unwrap());
        assert_eq!(s.to_string(), "2025-03-03");
        assert_eq!(e.to_string(), "2025-03-09");
    }

    #[test]
    fn yen_formatting() {
        assert_eq!(fmt_yen(0), "¥0");
        assert_eq!(fmt_yen(1_234), "¥1,234");
        assert_eq!(fmt_yen(1_234_567), "¥1,234,567");
        assert_eq!(fmt_yen(-80_000), "-¥80,000");
        assert_eq!(fmt_yen_short(123_000), "¥12.3万");
        assert_eq!(fmt_yen_short(9_999), "¥9,999");
    }

    #[test]
    fn line_items_parse_name_and_amount() {
        let item = parse_line_item(" Salary = 300,000 ").unwrap();
        assert_eq!(item, LineItem::new("Salary", 300_000));
        assert!(parse_line_item("NoAmount").is_err());
        assert!(parse_line_item("Card=-5").is_err());
    }

    #[test]
    fn amounts_reject_negatives() {
        assert_eq!(parse_amount("5000").unwrap(), 5_000);
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("12.5").is_err());
    }
}
