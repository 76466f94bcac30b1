// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ApiError;

/// Which collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    /// Path segment and list envelope key, e.g. `incomes`.
    pub fn collection(self) -> &'static str {
        match self {
            Kind::Income => "incomes",
            Kind::Expense => "expenses",
        }
    }

    /// Envelope key of a single created record, e.g. `income`.
    pub fn singular(self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Kind::Income => "Income",
            Kind::Expense => "Expense",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

impl FromStr for Kind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "incomes" => Ok(Kind::Income),
            "expense" | "expenses" => Ok(Kind::Expense),
            other => Err(anyhow!("Unknown kind '{}', expected income|expense", other)),
        }
    }
}

/// A record as held by the server. `amount` and `date` are `None` when the
/// server sent something that does not parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Wire shape. Servers may send `_id`, `id` or both.
#[derive(Deserialize)]
struct WireTransaction {
    #[serde(rename = "_id", default)]
    mongo_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    title: String,
    #[serde(default, deserialize_with = "de_amount")]
    amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de_date")]
    date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_description")]
    description: Option<String>,
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let wire = WireTransaction::deserialize(d)?;
        let raw_id = wire
            .mongo_id
            .or(wire.id)
            .ok_or_else(|| de::Error::missing_field("_id"))?;
        Ok(Self {
            id: record_id(raw_id).map_err(de::Error::custom)?,
            title: wire.title,
            amount: wire.amount,
            date: wire.date,
            description: wire.description,
        })
    }
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            amount: Some(amount),
            date: Some(date),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Amount for aggregation; malformed counts as zero.
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}

/// Form submission payload. Has no id until the server assigns one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionDraft {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Invalid("title must not be empty".into()));
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(ApiError::Invalid(format!(
                "amount must not be negative (got {})",
                self.amount
            )));
        }
        Ok(())
    }
}

/// A record tagged by the collection it was fetched from.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedTransaction {
    Income(Transaction),
    Expense(Transaction),
}

impl TaggedTransaction {
    pub fn kind(&self) -> Kind {
        match self {
            TaggedTransaction::Income(_) => Kind::Income,
            TaggedTransaction::Expense(_) => Kind::Expense,
        }
    }

    pub fn record(&self) -> &Transaction {
        match self {
            TaggedTransaction::Income(t) | TaggedTransaction::Expense(t) => t,
        }
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.record().amount
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.record().date
    }
}

/// Parse an amount the way the server may send it: number or numeric string.
/// Negative values are treated as malformed.
pub fn parse_amount_value(v: &Value) -> Option<Decimal> {
    let parsed = match v {
        Value::Number(n) => {
            let s = n.to_string();
            s.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(&s).ok())
        }
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    parsed.filter(|d| !d.is_sign_negative() || d.is_zero())
}

/// Accepts `YYYY-MM-DD` or anything starting with it (ISO timestamps).
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
        s.get(..10)
            .and_then(|p| NaiveDate::parse_from_str(p, "%Y-%m-%d").ok())
    })
}

fn record_id(v: Value) -> Result<String, String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("invalid record id {}", other)),
    }
}

fn de_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
    Ok(parse_amount_value(&Value::deserialize(d)?))
}

fn de_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => parse_record_date(&s),
        _ => None,
    })
}

fn de_description<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}
