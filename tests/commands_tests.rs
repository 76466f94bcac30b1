// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use cashboard::aggregate::merge;
use cashboard::commands::{self, entries, exporter, fetch_kind, fetch_merged, transactions, Source};
use cashboard::config::Settings;
use cashboard::db::{init_schema, load_snapshot, store_snapshot};
use cashboard::{cli, models::Kind};
use common::{d, dec, tx, FakeApi};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    init_schema(&mut conn).unwrap();
    conn
}

fn settings() -> Settings {
    Settings {
        api_url: "http://localhost:5000".into(),
        currency: "₹".into(),
    }
}

fn sub_matches(args: &[&str], path: &[&str]) -> clap::ArgMatches {
    let mut m = cli::build_cli().get_matches_from(args);
    for name in path {
        m = match m.remove_subcommand() {
            Some((n, sub)) if n == *name => sub,
            other => panic!("expected {} subcommand, got {:?}", name, other.map(|o| o.0)),
        };
    }
    m
}

#[test]
fn fetch_kind_caches_live_data() {
    let mut conn = setup();
    let api = FakeApi::with(vec![tx("i1", "Salary", "10", "2024-01-01")], vec![]);
    let loaded = fetch_kind(&api, &mut conn, Kind::Income).unwrap();
    assert_eq!(loaded.source, Source::Live);
    assert_eq!(
        load_snapshot(&conn, Kind::Income).unwrap().unwrap().records.len(),
        1
    );
}

#[test]
fn fetch_kind_falls_back_to_cache() {
    let mut conn = setup();
    store_snapshot(&mut conn, Kind::Expense, &[tx("e1", "Rent", "5", "2024-01-01")]).unwrap();
    let api = FakeApi::default().failing_list(Kind::Expense);
    let loaded = fetch_kind(&api, &mut conn, Kind::Expense).unwrap();
    assert!(matches!(loaded.source, Source::Cached(_)));
    assert_eq!(loaded.data[0].id, "e1");
}

#[test]
fn fetch_kind_without_cache_reports_error() {
    let mut conn = setup();
    let api = FakeApi::default().failing_list(Kind::Income);
    let err = fetch_kind(&api, &mut conn, Kind::Income).unwrap_err();
    let chain = format!("{:#}", err);
    assert_eq!(chain.matches("Failed to fetch incomes").count(), 1);
    assert!(chain.contains("connection refused"));
}

#[test]
fn fallback_carries_the_fetch_failure() {
    let mut conn = setup();
    let api = FakeApi::with(vec![tx("i1", "Salary", "10", "2024-01-01")], vec![]);
    let live = fetch_kind(&api, &mut conn, Kind::Income).unwrap();
    assert_eq!(live.warning, None);

    let api = FakeApi::default().failing_list(Kind::Income);
    let cached = fetch_kind(&api, &mut conn, Kind::Income).unwrap();
    assert_eq!(
        cached.warning.as_deref(),
        Some("Failed to fetch incomes: connection refused")
    );
}

fn break_record_inserts(conn: &Connection) {
    conn.execute_batch(
        "CREATE TRIGGER no_records BEFORE INSERT ON records
         BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
    )
    .unwrap();
}

#[test]
fn cache_failure_does_not_undo_a_remote_add() {
    let mut conn = setup();
    store_snapshot(&mut conn, Kind::Expense, &[]).unwrap();
    break_record_inserts(&conn);
    let api = FakeApi::default();

    let m = sub_matches(
        &[
            "cashboard", "expense", "add", "--title", "Tea", "--amount", "2", "--date",
            "2024-01-05",
        ],
        &["expense"],
    );
    entries::handle(&api, &mut conn, &settings(), Kind::Expense, &m).unwrap();
    assert_eq!(api.stored(Kind::Expense).len(), 1);
    assert!(load_snapshot(&conn, Kind::Expense).unwrap().unwrap().records.is_empty());
}

#[test]
fn cache_failure_keeps_live_lists() {
    let mut conn = setup();
    break_record_inserts(&conn);
    let api = FakeApi::with(
        vec![tx("i1", "Salary", "10", "2024-01-01")],
        vec![tx("e1", "Rent", "5", "2024-01-02")],
    );

    let loaded = fetch_kind(&api, &mut conn, Kind::Income).unwrap();
    assert_eq!(loaded.source, Source::Live);
    assert_eq!(loaded.data.len(), 1);

    let merged = fetch_merged(&api, &mut conn).unwrap();
    assert_eq!(merged.source, Source::Live);
    assert_eq!(merged.data.len(), 2);
    assert!(load_snapshot(&conn, Kind::Income).unwrap().is_none());
}

#[test]
fn fetch_merged_never_mixes_live_and_cached() {
    let mut conn = setup();
    // only incomes were ever cached
    store_snapshot(&mut conn, Kind::Income, &[tx("i1", "Salary", "10", "2024-01-01")]).unwrap();
    let api = FakeApi::with(vec![], vec![tx("e1", "Rent", "5", "2024-01-01")])
        .failing_list(Kind::Income);
    assert!(fetch_merged(&api, &mut conn).is_err());

    store_snapshot(&mut conn, Kind::Expense, &[tx("e0", "Old", "1", "2023-01-01")]).unwrap();
    let loaded = fetch_merged(&api, &mut conn).unwrap();
    assert!(matches!(loaded.source, Source::Cached(_)));
    let ids: Vec<_> = loaded.data.iter().map(|t| t.record().id.as_str()).collect();
    assert_eq!(ids, vec!["i1", "e0"]);
}

#[test]
fn query_rows_reads_view_flags() {
    let merged = merge(
        vec![tx("i1", "Salary", "5000", "2024-03-01")],
        vec![
            tx("e1", "Groceries", "120", "2024-03-05"),
            tx("e2", "Grocery top-up", "300", "2024-03-02"),
        ],
    );
    let m = sub_matches(
        &[
            "cashboard", "tx", "--filter", "expense", "--search", "GROCER", "--sort", "amount",
        ],
        &["transactions"],
    );
    let rows = transactions::query_rows(&merged, &m).unwrap();
    let ids: Vec<_> = rows.iter().map(|t| t.record().id.as_str()).collect();
    assert_eq!(ids, vec!["e2", "e1"]);

    let m = sub_matches(&["cashboard", "transactions"], &["transactions"]);
    assert_eq!(transactions::query_rows(&merged, &m).unwrap(), merged);

}

#[test]
fn bad_view_flags_fail_at_parse_time() {
    let cli = cli::build_cli();
    assert!(cli
        .clone()
        .try_get_matches_from(["cashboard", "tx", "--filter", "bogus"])
        .is_err());
    assert!(cli
        .clone()
        .try_get_matches_from(["cashboard", "export", "--format", "csv", "--out", "x", "--filter", "nope"])
        .is_err());
    assert!(cli.clone().try_get_matches_from(["cashboard", "expense"]).is_err());
    assert!(cli.clone().try_get_matches_from(["cashboard", "income"]).is_err());
    assert!(cli.try_get_matches_from(["cashboard", "config"]).is_err());
}

#[test]
fn draft_from_args_parses_form_fields() {
    let m = sub_matches(
        &[
            "cashboard",
            "expense",
            "add",
            "--title",
            " Dentist ",
            "--amount",
            "120.00",
            "--date",
            "2023-02-26",
            "--description",
            "checkup",
        ],
        &["expense", "add"],
    );
    let draft = entries::draft_from_args(&m).unwrap();
    assert_eq!(draft.title, "Dentist");
    assert_eq!(draft.amount, dec("120"));
    assert_eq!(draft.date, d("2023-02-26"));
    assert_eq!(draft.description.as_deref(), Some("checkup"));

    let m = sub_matches(
        &[
            "cashboard", "income", "add", "--title", "Pay", "--amount", "ten", "--date",
            "2023-02-26",
        ],
        &["income", "add"],
    );
    assert!(entries::draft_from_args(&m).is_err());
}

#[test]
fn add_then_remove_updates_remote_and_cache() {
    let mut conn = setup();
    let api = FakeApi::default();
    store_snapshot(&mut conn, Kind::Expense, &[]).unwrap();

    let m = sub_matches(
        &[
            "cashboard", "expense", "add", "--title", "Tea", "--amount", "2", "--date",
            "2024-01-05",
        ],
        &["expense"],
    );
    entries::handle(&api, &mut conn, &settings(), Kind::Expense, &m).unwrap();
    let cached = load_snapshot(&conn, Kind::Expense).unwrap().unwrap().records;
    assert_eq!(cached.len(), 1);
    let id = cached[0].id.clone();

    let m = sub_matches(&["cashboard", "expense", "rm", &id], &["expense"]);
    entries::handle(&api, &mut conn, &settings(), Kind::Expense, &m).unwrap();
    assert!(api.stored(Kind::Expense).is_empty());
    assert!(load_snapshot(&conn, Kind::Expense).unwrap().unwrap().records.is_empty());
}

#[test]
fn rejected_delete_keeps_cache() {
    let mut conn = setup();
    let api = FakeApi::with(vec![tx("i1", "Salary", "10", "2024-01-01")], vec![]);
    *api.reject_delete.lock().unwrap() = true;
    store_snapshot(&mut conn, Kind::Income, &api.stored(Kind::Income)).unwrap();

    let m = sub_matches(&["cashboard", "income", "rm", "i1"], &["income"]);
    let err = entries::handle(&api, &mut conn, &settings(), Kind::Income, &m).unwrap_err();
    assert!(err.to_string().contains("Failed to delete income"));
    assert_eq!(load_snapshot(&conn, Kind::Income).unwrap().unwrap().records.len(), 1);
}

#[test]
fn export_writes_filtered_json() {
    let mut conn = setup();
    let api = FakeApi::with(
        vec![tx("i1", "Salary", "5000", "2024-03-01")],
        vec![tx("e1", "Corner Shop", "12.34", "2024-01-02").with_description("Weekly run")],
    );
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let m = sub_matches(
        &[
            "cashboard", "export", "--format", "json", "--out", &out_str, "--filter", "expense",
        ],
        &["export"],
    );
    exporter::handle(&api, &mut conn, &m).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([{
            "kind": "expense",
            "id": "e1",
            "title": "Corner Shop",
            "amount": "12.34",
            "date": "2024-01-02",
            "description": "Weekly run"
        }])
    );
}

#[test]
fn export_writes_csv_with_header() {
    let mut conn = setup();
    let api = FakeApi::with(vec![tx("i1", "Salary", "5000", "2024-03-01")], vec![]);
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let m = sub_matches(
        &["cashboard", "export", "--format", "CSV", "--out", &out_str],
        &["export"],
    );
    exporter::handle(&api, &mut conn, &m).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("kind,id,title,amount,date,description"));
    assert_eq!(lines.next(), Some("income,i1,Salary,5000,2024-03-01,"));
}

#[test]
fn export_rejects_unknown_format_before_fetching() {
    let mut conn = setup();
    let api = FakeApi::default();
    let m = sub_matches(
        &["cashboard", "export", "--format", "xml", "--out", "/tmp/never"],
        &["export"],
    );
    assert!(exporter::handle(&api, &mut conn, &m).is_err());
    assert!(api.calls().is_empty());
}

#[test]
fn config_set_and_show() {
    let conn = setup();
    let m = sub_matches(
        &["cashboard", "config", "set-currency", "$"],
        &["config"],
    );
    commands::settings::handle(&conn, &settings(), &m).unwrap();
    assert_eq!(Settings::resolve(&conn, None, None).unwrap().currency, "$");
}
