// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure view-model building over the two collections.
//!
//! Nothing here performs I/O. Records with a malformed amount count as zero
//! in totals and sort after every well-formed record; the same goes for
//! malformed dates.

use std::cmp::Ordering;
use std::str::FromStr;

use anyhow::anyhow;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Kind, TaggedTransaction, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TransactionStats {
    pub net: Decimal,
    pub income_total: Decimal,
    pub expense_total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(Kind),
}

impl Filter {
    pub fn matches(self, kind: Kind) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(k) => k == kind,
        }
    }
}

impl FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }
        s.parse::<Kind>()
            .map(Filter::Only)
            .map_err(|_| anyhow!("Unknown filter '{}', expected all|income|expense", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Date,
    Amount,
    /// Any unrecognised sort key; keeps incoming order.
    Unsorted,
}

impl From<&str> for SortBy {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "date" => SortBy::Date,
            "amount" => SortBy::Amount,
            _ => SortBy::Unsorted,
        }
    }
}

/// Tag both collections and order them most recent first.
///
/// Expenses come before incomes in the concatenation, so records sharing a
/// date keep that order.
pub fn merge(incomes: Vec<Transaction>, expenses: Vec<Transaction>) -> Vec<TaggedTransaction> {
    let mut out: Vec<TaggedTransaction> = Vec::with_capacity(incomes.len() + expenses.len());
    out.extend(expenses.into_iter().map(TaggedTransaction::Expense));
    out.extend(incomes.into_iter().map(TaggedTransaction::Income));
    sort_by_date(&mut out);
    out
}

pub fn compute_stats(transactions: &[TaggedTransaction]) -> TransactionStats {
    let mut stats = TransactionStats::default();
    for t in transactions {
        let amt = t.record().amount_or_zero();
        match t.kind() {
            Kind::Income => stats.income_total += amt,
            Kind::Expense => stats.expense_total += amt,
        }
    }
    stats.net = stats.income_total - stats.expense_total;
    stats
}

/// Filter by kind, then search, then sort. The stage order is fixed.
pub fn apply_filter_search_sort(
    transactions: &[TaggedTransaction],
    filter: Filter,
    search_term: &str,
    sort_by: SortBy,
) -> Vec<TaggedTransaction> {
    let needle = search_term.to_lowercase();
    let mut out: Vec<TaggedTransaction> = transactions
        .iter()
        .filter(|t| filter.matches(t.kind()))
        .filter(|t| matches_search(t.record(), &needle))
        .cloned()
        .collect();
    match sort_by {
        SortBy::Date => sort_by_date(&mut out),
        SortBy::Amount => out.sort_by(|a, b| descending_missing_last(a.amount(), b.amount())),
        SortBy::Unsorted => {}
    }
    out
}

/// `needle` must already be lowercased.
fn matches_search(t: &Transaction, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    t.title.to_lowercase().contains(needle)
        || t.description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(needle)
}

fn sort_by_date(items: &mut [TaggedTransaction]) {
    items.sort_by(|a, b| descending_missing_last(a.date(), b.date()));
}

fn descending_missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
