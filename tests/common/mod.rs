// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use cashboard::api::ResourceApi;
use cashboard::errors::ApiError;
use cashboard::models::{Kind, Transaction, TransactionDraft};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn tx(id: &str, title: &str, amount: &str, date: &str) -> Transaction {
    Transaction::new(id, title, dec(amount), d(date))
}

/// In-memory stand-in for the remote API.
#[derive(Default)]
pub struct FakeApi {
    pub store: Mutex<HashMap<Kind, Vec<Transaction>>>,
    pub fail_list: Mutex<Vec<Kind>>,
    pub fail_create: Mutex<bool>,
    pub reject_delete: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
    next_id: Mutex<u32>,
}

impl FakeApi {
    pub fn with(incomes: Vec<Transaction>, expenses: Vec<Transaction>) -> Self {
        let api = FakeApi::default();
        {
            let mut store = api.store.lock().unwrap();
            store.insert(Kind::Income, incomes);
            store.insert(Kind::Expense, expenses);
        }
        api
    }

    pub fn failing_list(self, kind: Kind) -> Self {
        self.fail_list.lock().unwrap().push(kind);
        self
    }

    pub fn stored(&self, kind: Kind) -> Vec<Transaction> {
        self.store
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ResourceApi for FakeApi {
    fn list(&self, kind: Kind) -> Result<Vec<Transaction>, ApiError> {
        self.calls.lock().unwrap().push(format!("list {}", kind));
        if self.fail_list.lock().unwrap().contains(&kind) {
            return Err(ApiError::Transport("connection refused".into()));
        }
        Ok(self.stored(kind))
    }

    fn create(&self, kind: Kind, draft: &TransactionDraft) -> Result<Transaction, ApiError> {
        self.calls.lock().unwrap().push(format!("create {}", kind));
        if *self.fail_create.lock().unwrap() {
            return Err(ApiError::Server {
                status: 400,
                message: "Amount is required".into(),
            });
        }
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let record = Transaction {
            id: format!("srv-{}", next),
            title: draft.title.clone(),
            amount: Some(draft.amount),
            date: Some(draft.date),
            description: draft.description.clone(),
        };
        self.store
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    fn delete(&self, kind: Kind, id: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(format!("delete {} {}", kind, id));
        if *self.reject_delete.lock().unwrap() {
            return Err(ApiError::Rejected(format!("Failed to delete {}", kind)));
        }
        if let Some(list) = self.store.lock().unwrap().get_mut(&kind) {
            list.retain(|t| t.id != id);
        }
        Ok(())
    }
}
