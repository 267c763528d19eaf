// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use kakeibo::commands::exporter;
use kakeibo::models::{LineItem, RecordDraft};
use kakeibo::session::Session;
use kakeibo::{cli, db, rollover};
use rusqlite::Connection;
use tempfile::tempdir;

fn conn_with_records(session: &Session) -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let march = RecordDraft {
        bank_balance: 100_000,
        monthly_income: 300_000,
        credit_expenses: 80_000,
        nisa_value: 500_000,
        credit_details: Some(vec![
            LineItem::new("Visa", 50_000),
            LineItem::new("Amex", 30_000),
        ]),
        ..RecordDraft::default()
    };
    rollover::save_record(&conn, session, "2025-03", &march, Some(true)).unwrap();
    rollover::apply_to_next_month(&conn, session, "2025-03", false).unwrap();
    conn
}

fn export(conn: &Connection, session: &Session, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "kakeibo", "export", "records", "--format", format, "--out", out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, session, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_records_as_csv_oldest_first() {
    let s = Session::new("alice");
    let conn = conn_with_records(&s);
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("records.csv");
    export(&conn, &s, "csv", &out_path.to_string_lossy()).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "2025-03");
    assert_eq!(&rows[0][5], "320000");
    assert_eq!(&rows[0][6], "true");
    assert_eq!(&rows[0][10], "Visa=50000;Amex=30000");
    assert_eq!(&rows[1][0], "2025-04");
    assert_eq!(&rows[1][1], "320000");
    assert_eq!(&rows[1][6], "false");
}

#[test]
fn export_records_as_json() {
    let s = Session::new("alice");
    let conn = conn_with_records(&s);
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("records.json");
    export(&conn, &s, "JSON", &out_path.to_string_lossy()).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["year_month"], "2025-03");
    assert_eq!(arr[0]["credit_details"][1]["name"], "Amex");
    assert_eq!(arr[1]["credit_details"], serde_json::Value::Null);
}

#[test]
fn export_records_rejects_unknown_format() {
    let s = Session::new("alice");
    let conn = conn_with_records(&s);
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("records.xml");
    assert!(export(&conn, &s, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}
