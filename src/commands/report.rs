// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::{json, Value};

use super::fetch_merged;
use super::transactions::{stats_table, HistoryRow};
use crate::api::ResourceApi;
use crate::config::Settings;
use crate::report::{build_dashboard, AmountRange, Dashboard};
use crate::utils::{fmt_money, fmt_signed, maybe_print_json, pretty_table};

pub const DEFAULT_RECENT: usize = 3;
pub const DEFAULT_MONTHS: usize = 12;

pub fn handle<A: ResourceApi + Sync + ?Sized>(
    api: &A,
    conn: &mut Connection,
    settings: &Settings,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let recent = *sub.get_one::<usize>("recent").unwrap_or(&DEFAULT_RECENT);
    let months = *sub.get_one::<usize>("months").unwrap_or(&DEFAULT_MONTHS);
    show(
        api,
        conn,
        settings,
        recent,
        months,
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
    )
}

pub fn show<A: ResourceApi + Sync + ?Sized>(
    api: &A,
    conn: &mut Connection,
    settings: &Settings,
    recent: usize,
    months: usize,
    json_flag: bool,
    jsonl_flag: bool,
) -> Result<()> {
    let loaded = fetch_merged(api, conn)?;
    loaded.announce();
    let dash = build_dashboard(&loaded.data, recent, months);
    if maybe_print_json(json_flag, jsonl_flag, &dashboard_json(&dash))? {
        return Ok(());
    }
    println!("{}", render_dashboard(&dash, &settings.currency));
    Ok(())
}

pub fn dashboard_json(dash: &Dashboard) -> Value {
    json!({
        "stats": dash.stats,
        "recent": dash.recent.iter().map(HistoryRow::from_tagged).collect::<Vec<_>>(),
        "income_range": dash.income_range,
        "expense_range": dash.expense_range,
        "monthly": dash.monthly,
    })
}

pub fn render_dashboard(dash: &Dashboard, ccy: &str) -> String {
    let mut out = vec![stats_table(&dash.stats, ccy).to_string(), "Recent History".to_string()];
    if dash.recent.is_empty() {
        out.push("  (nothing recorded yet)".into());
    } else {
        let rows = dash
            .recent
            .iter()
            .map(|t| vec![t.record().title.clone(), fmt_signed(t, ccy)])
            .collect();
        out.push(pretty_table(&["Title", "Amount"], rows).to_string());
    }

    let range = |label: &str, r: Option<AmountRange>| match r {
        Some(r) => vec![label.to_string(), fmt_money(&r.min, ccy), fmt_money(&r.max, ccy)],
        None => vec![label.to_string(), "-".into(), "-".into()],
    };
    out.push(
        pretty_table(
            &["", "Min", "Max"],
            vec![
                range("Income", dash.income_range),
                range("Expense", dash.expense_range),
            ],
        )
        .to_string(),
    );

    if !dash.monthly.is_empty() {
        let rows = dash
            .monthly
            .iter()
            .map(|p| {
                vec![
                    p.month.clone(),
                    fmt_money(&p.income, ccy),
                    fmt_money(&p.expense, ccy),
                ]
            })
            .collect();
        out.push(pretty_table(&["Month", "Income", "Expenses"], rows).to_string());
    }
    out.join("\n")
}
