// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod entries;
pub mod exporter;
pub mod report;
pub mod settings;
pub mod transactions;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::aggregate::merge;
use crate::api::ResourceApi;
use crate::db::{load_snapshot, store_snapshot};
use crate::models::{Kind, TaggedTransaction, Transaction};
use crate::section::load_all;

/// Where a rendered list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Live,
    Cached(DateTime<Utc>),
}

#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub data: T,
    pub source: Source,
    /// Why the live fetch was skipped, set only when falling back.
    pub warning: Option<String>,
}

impl<T> Loaded<T> {
    fn live(data: T) -> Self {
        Self {
            data,
            source: Source::Live,
            warning: None,
        }
    }

    fn cached(data: T, at: DateTime<Utc>, warning: String) -> Self {
        Self {
            data,
            source: Source::Cached(at),
            warning: Some(warning),
        }
    }

    /// Print the fetch failure and the "showing cached data" note when the
    /// data is not live.
    pub fn announce(&self) {
        if let Some(w) = &self.warning {
            eprintln!("{}", w);
        }
        if let Source::Cached(at) = self.source {
            eprintln!(
                "Showing last fetched data from {}",
                at.format("%Y-%m-%d %H:%M UTC")
            );
        }
    }
}

/// Cache writes are best-effort: the remote side already succeeded.
pub(crate) fn keep_cached(what: &str, result: Result<()>) {
    if let Err(err) = result {
        tracing::warn!(error = %err, "could not cache {}", what);
    }
}

/// List one collection. A successful fetch refreshes the cache; a failed one
/// falls back to the cached copy when there is one.
pub fn fetch_kind<A: ResourceApi + ?Sized>(
    api: &A,
    conn: &mut Connection,
    kind: Kind,
) -> Result<Loaded<Vec<Transaction>>> {
    match api.list(kind) {
        Ok(records) => {
            keep_cached(kind.collection(), store_snapshot(conn, kind, &records));
            Ok(Loaded::live(records))
        }
        Err(err) => {
            tracing::warn!(%kind, error = %err, "list failed, trying cache");
            match load_snapshot(conn, kind)? {
                Some(snap) => Ok(Loaded::cached(
                    snap.records,
                    snap.fetched_at,
                    format!("Failed to fetch {}: {}", kind.collection(), err),
                )),
                None => Err(anyhow!(err))
                    .with_context(|| format!("Failed to fetch {}", kind.collection())),
            }
        }
    }
}

/// Both collections, merged. The cache is only used when it holds both
/// kinds, so a fallback never mixes live and cached data.
pub fn fetch_merged<A: ResourceApi + Sync + ?Sized>(
    api: &A,
    conn: &mut Connection,
) -> Result<Loaded<Vec<TaggedTransaction>>> {
    match load_all(api) {
        Ok((incomes, expenses)) => {
            keep_cached("incomes", store_snapshot(conn, Kind::Income, &incomes));
            keep_cached("expenses", store_snapshot(conn, Kind::Expense, &expenses));
            Ok(Loaded::live(merge(incomes, expenses)))
        }
        Err(err) => {
            tracing::warn!(error = %err, "combined list failed, trying cache");
            let incomes = load_snapshot(conn, Kind::Income)?;
            let expenses = load_snapshot(conn, Kind::Expense)?;
            match (incomes, expenses) {
                (Some(i), Some(e)) => {
                    let at = i.fetched_at.min(e.fetched_at);
                    Ok(Loaded::cached(
                        merge(i.records, e.records),
                        at,
                        format!("Failed to load transactions: {}", err),
                    ))
                }
                _ => Err(anyhow!(err))
                    .context("Failed to load transactions. Please try again later."),
            }
        }
    }
}

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    m.get_one::<String>(name)
        .with_context(|| format!("Missing required argument '{}'", name))
}
