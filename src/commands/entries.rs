// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The expense and income views: a form plus a list with its total.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

use super::{fetch_kind, keep_cached, required};
use crate::api::ResourceApi;
use crate::config::Settings;
use crate::db::{append_record, load_snapshot, remove_record};
use crate::models::{Kind, Transaction, TransactionDraft};
use crate::section::Section;
use crate::utils::{fmt_date, fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle<A: ResourceApi + ?Sized>(
    api: &A,
    conn: &mut Connection,
    settings: &Settings,
    kind: Kind,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(api, conn, settings, kind, sub)?,
        Some(("list", sub)) => list(api, conn, settings, kind, sub)?,
        Some(("rm", sub)) => remove(api, conn, kind, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let title = required(sub, "title")?.trim().to_string();
    let amount = parse_decimal(required(sub, "amount")?)?;
    let date = parse_date(required(sub, "date")?)?;
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    let draft = TransactionDraft {
        title,
        amount,
        date,
        description,
    };
    draft.validate()?;
    Ok(draft)
}

/// Local copy to start from: the cached snapshot, or empty.
fn seeded_section(conn: &Connection, kind: Kind) -> Result<Section> {
    let records = load_snapshot(conn, kind)?
        .map(|s| s.records)
        .unwrap_or_default();
    Ok(Section::with_records(kind, records))
}

fn add<A: ResourceApi + ?Sized>(
    api: &A,
    conn: &mut Connection,
    settings: &Settings,
    kind: Kind,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let draft = draft_from_args(sub)?;
    let mut section = seeded_section(conn, kind)?;
    let created = section
        .submit(api, &draft)
        .with_context(|| format!("Failed to add {}", kind))?
        .clone();
    keep_cached(kind.collection(), append_record(conn, kind, &created));
    println!("{} added successfully", kind.label());
    println!(
        "  {} {} on {} (id {})",
        created.title,
        created
            .amount
            .map(|a| fmt_money(&a, &settings.currency))
            .unwrap_or_else(|| "?".into()),
        fmt_date(created.date),
        created.id
    );
    Ok(())
}

fn remove<A: ResourceApi + ?Sized>(
    api: &A,
    conn: &mut Connection,
    kind: Kind,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = required(sub, "id")?.to_string();
    let mut section = seeded_section(conn, kind)?;
    section
        .delete(api, &id)
        .with_context(|| format!("Failed to delete {}", kind))?;
    keep_cached(kind.collection(), remove_record(conn, kind, &id));
    println!("{} deleted successfully", kind.label());
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct EntryRow {
    pub id: String,
    pub title: String,
    pub amount: String,
    pub date: String,
    pub description: String,
}

impl EntryRow {
    pub fn from_record(t: &Transaction) -> Self {
        Self {
            id: t.id.clone(),
            title: t.title.clone(),
            amount: t.amount.map(|a| a.to_string()).unwrap_or_default(),
            date: t.date.map(|d| d.to_string()).unwrap_or_default(),
            description: t.description.clone().unwrap_or_default(),
        }
    }
}

fn list<A: ResourceApi + ?Sized>(
    api: &A,
    conn: &mut Connection,
    settings: &Settings,
    kind: Kind,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let loaded = fetch_kind(api, conn, kind)?;
    loaded.announce();
    let section = Section::with_records(kind, loaded.data);
    let data: Vec<EntryRow> = section.records().iter().map(EntryRow::from_record).collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }

    println!(
        "Total {}: {}",
        kind.collection(),
        fmt_money(&section.total(), &settings.currency)
    );
    if section.records().is_empty() {
        println!("No {} yet", kind.collection());
        return Ok(());
    }
    let rows: Vec<Vec<String>> = section
        .records()
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.title.clone(),
                t.amount
                    .map(|a| fmt_money(&a, &settings.currency))
                    .unwrap_or_else(|| "?".into()),
                fmt_date(t.date),
                t.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Title", "Amount", "Date", "Description"], rows)
    );
    Ok(())
}
