// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::aggregate::merge;
use crate::api::ResourceApi;
use crate::errors::ApiError;
use crate::models::{Kind, TaggedTransaction, Transaction, TransactionDraft};

/// One view's slice of state: the local copy of a single collection.
///
/// Remote calls mutate the local copy only after they succeed, so a failed
/// call leaves the last-known-good list in place.
#[derive(Debug, Clone)]
pub struct Section {
    kind: Kind,
    records: Vec<Transaction>,
}

impl Section {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    pub fn with_records(kind: Kind, records: Vec<Transaction>) -> Self {
        Self { kind, records }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    /// Sum of amounts; malformed amounts count as zero.
    pub fn total(&self) -> Decimal {
        self.records.iter().map(Transaction::amount_or_zero).sum()
    }

    pub fn refresh<A: ResourceApi + ?Sized>(&mut self, api: &A) -> Result<(), ApiError> {
        self.records = api.list(self.kind)?;
        Ok(())
    }

    pub fn submit<A: ResourceApi + ?Sized>(
        &mut self,
        api: &A,
        draft: &TransactionDraft,
    ) -> Result<&Transaction, ApiError> {
        draft.validate()?;
        let created = api.create(self.kind, draft)?;
        self.records.push(created);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Returns whether a local record was removed.
    pub fn delete<A: ResourceApi + ?Sized>(&mut self, api: &A, id: &str) -> Result<bool, ApiError> {
        api.delete(self.kind, id)?;
        Ok(self.remove_local(id))
    }

    /// Drop `id` from the local copy. Unknown ids leave it unchanged.
    pub fn remove_local(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|t| t.id != id);
        self.records.len() != before
    }
}

/// Fetch both collections at once, returned as `(incomes, expenses)`. Either
/// failure fails the whole load; no partial result is returned.
pub fn load_all<A: ResourceApi + Sync + ?Sized>(
    api: &A,
) -> Result<(Vec<Transaction>, Vec<Transaction>), ApiError> {
    std::thread::scope(|s| {
        let incomes = s.spawn(|| api.list(Kind::Income));
        let expenses = api.list(Kind::Expense);
        let incomes = incomes
            .join()
            .map_err(|_| ApiError::Transport("income fetch panicked".into()))?;
        Ok((incomes?, expenses?))
    })
}

pub fn load_merged<A: ResourceApi + Sync + ?Sized>(
    api: &A,
) -> Result<Vec<TaggedTransaction>, ApiError> {
    let (incomes, expenses) = load_all(api)?;
    Ok(merge(incomes, expenses))
}
