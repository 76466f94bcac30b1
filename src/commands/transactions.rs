// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};

use super::fetch_merged;
use crate::aggregate::{apply_filter_search_sort, compute_stats, Filter, SortBy, TransactionStats};
use crate::api::ResourceApi;
use crate::config::Settings;
use crate::models::TaggedTransaction;
use crate::utils::{fmt_date, fmt_money, fmt_signed, maybe_print_json, pretty_table};

pub fn handle<A: ResourceApi + Sync + ?Sized>(
    api: &A,
    conn: &mut Connection,
    settings: &Settings,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let loaded = fetch_merged(api, conn)?;
    loaded.announce();
    let stats = compute_stats(&loaded.data);
    let visible = query_rows(&loaded.data, sub)?;

    if sub.get_flag("jsonl") {
        let rows: Vec<HistoryRow> = visible.iter().map(HistoryRow::from_tagged).collect();
        maybe_print_json(false, true, &rows)?;
    } else if sub.get_flag("json") {
        maybe_print_json(true, false, &history_json(&stats, &visible))?;
    } else {
        println!("{}", render_history(&stats, &visible, &settings.currency));
    }
    Ok(())
}

/// `{ "stats": ..., "transactions": [...] }`; stats cover the full history.
pub fn history_json(stats: &TransactionStats, visible: &[TaggedTransaction]) -> Value {
    let rows: Vec<HistoryRow> = visible.iter().map(HistoryRow::from_tagged).collect();
    json!({ "stats": stats, "transactions": rows })
}

pub fn render_history(
    stats: &TransactionStats,
    visible: &[TaggedTransaction],
    currency: &str,
) -> String {
    let mut out = vec![
        stats_table(stats, currency).to_string(),
        "Transaction History".to_string(),
    ];
    if visible.is_empty() {
        out.push("No transactions found".into());
        out.push("Try adjusting your filters or search term".into());
        return out.join("\n");
    }
    let rows: Vec<Vec<String>> = visible
        .iter()
        .map(|t| {
            let r = t.record();
            vec![
                t.kind().label().to_string(),
                r.title.clone(),
                fmt_signed(t, currency),
                fmt_date(r.date),
                r.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    out.push(pretty_table(&["Type", "Title", "Amount", "Date", "Description"], rows).to_string());
    out.join("\n")
}

/// Apply `--filter`, `--search` and `--sort` to the merged history.
pub fn query_rows(
    transactions: &[TaggedTransaction],
    sub: &clap::ArgMatches,
) -> Result<Vec<TaggedTransaction>> {
    let filter = match sub.get_one::<String>("filter") {
        Some(f) => f.parse::<Filter>()?,
        None => Filter::All,
    };
    let search = sub
        .get_one::<String>("search")
        .map(String::as_str)
        .unwrap_or("");
    let sort_by = sub
        .get_one::<String>("sort")
        .map(|s| SortBy::from(s.as_str()))
        .unwrap_or_default();
    Ok(apply_filter_search_sort(transactions, filter, search, sort_by))
}

pub fn stats_table(stats: &TransactionStats, currency: &str) -> comfy_table::Table {
    pretty_table(
        &["Net Balance", "Total Income", "Total Expenses"],
        vec![vec![
            fmt_money(&stats.net, currency),
            fmt_money(&stats.income_total, currency),
            fmt_money(&stats.expense_total, currency),
        ]],
    )
}

#[derive(Debug, Serialize)]
pub struct HistoryRow {
    pub kind: String,
    pub id: String,
    pub title: String,
    pub amount: String,
    pub date: String,
    pub description: String,
}

impl HistoryRow {
    pub fn from_tagged(t: &TaggedTransaction) -> Self {
        let r = t.record();
        Self {
            kind: t.kind().to_string(),
            id: r.id.clone(),
            title: r.title.clone(),
            amount: r.amount.map(|a| a.to_string()).unwrap_or_default(),
            date: r.date.map(|d| d.to_string()).unwrap_or_default(),
            description: r.description.clone().unwrap_or_default(),
        }
    }
}
