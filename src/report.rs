// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{apply_filter_search_sort, compute_stats, Filter, SortBy, TransactionStats};
use crate::models::{Kind, TaggedTransaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmountRange {
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub month: String, // YYYY-MM
    pub income: Decimal,
    pub expense: Decimal,
}

/// Everything the dashboard view shows.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub stats: TransactionStats,
    pub recent: Vec<TaggedTransaction>,
    pub income_range: Option<AmountRange>,
    pub expense_range: Option<AmountRange>,
    pub monthly: Vec<MonthlyPoint>,
}

pub fn build_dashboard(
    transactions: &[TaggedTransaction],
    recent_count: usize,
    months: usize,
) -> Dashboard {
    let mut monthly = monthly_series(transactions);
    if monthly.len() > months {
        monthly.drain(..monthly.len() - months);
    }
    Dashboard {
        stats: compute_stats(transactions),
        recent: recent(transactions, recent_count),
        income_range: amount_range(transactions, Kind::Income),
        expense_range: amount_range(transactions, Kind::Expense),
        monthly,
    }
}

/// Most recent `n` records, newest first.
pub fn recent(transactions: &[TaggedTransaction], n: usize) -> Vec<TaggedTransaction> {
    let mut sorted = apply_filter_search_sort(transactions, Filter::All, "", SortBy::Date);
    sorted.truncate(n);
    sorted
}

/// Smallest and largest well-formed amount of one kind.
pub fn amount_range(transactions: &[TaggedTransaction], kind: Kind) -> Option<AmountRange> {
    transactions
        .iter()
        .filter(|t| t.kind() == kind)
        .filter_map(|t| t.amount())
        .fold(None, |acc, amt| match acc {
            None => Some(AmountRange { min: amt, max: amt }),
            Some(r) => Some(AmountRange {
                min: r.min.min(amt),
                max: r.max.max(amt),
            }),
        })
}

/// Per-month income and expense totals, oldest month first. Undated records
/// are left out.
pub fn monthly_series(transactions: &[TaggedTransaction]) -> Vec<MonthlyPoint> {
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let Some(date) = t.date() else { continue };
        let entry = map
            .entry(date.format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        let amt = t.record().amount_or_zero();
        match t.kind() {
            Kind::Income => entry.0 += amt,
            Kind::Expense => entry.1 += amt,
        }
    }
    map.into_iter()
        .map(|(month, (income, expense))| MonthlyPoint {
            month,
            income,
            expense,
        })
        .collect()
}
