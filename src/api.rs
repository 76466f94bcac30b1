// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ApiError;
use crate::models::{Kind, Transaction, TransactionDraft};
use crate::utils::http_client;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Create/list/delete over the two remote collections.
pub trait ResourceApi {
    fn list(&self, kind: Kind) -> Result<Vec<Transaction>, ApiError>;
    fn create(&self, kind: Kind, draft: &TransactionDraft) -> Result<Transaction, ApiError>;
    fn delete(&self, kind: Kind, id: &str) -> Result<(), ApiError>;
}

pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ResourceApi for HttpApi {
    fn list(&self, kind: Kind) -> Result<Vec<Transaction>, ApiError> {
        let url = collection_url(&self.base_url, kind);
        tracing::debug!(%url, "GET");
        let body = read_success(self.client.get(&url).send()?)?;
        let records = decode_list(kind, &body)?;
        tracing::debug!(%kind, count = records.len(), "listed");
        Ok(records)
    }

    fn create(&self, kind: Kind, draft: &TransactionDraft) -> Result<Transaction, ApiError> {
        draft.validate()?;
        let url = collection_url(&self.base_url, kind);
        tracing::debug!(%url, title = %draft.title, "POST");
        let body = read_success(self.client.post(&url).json(draft).send()?)?;
        decode_created(kind, &body)
    }

    fn delete(&self, kind: Kind, id: &str) -> Result<(), ApiError> {
        let url = item_url(&self.base_url, kind, id)?;
        tracing::debug!(%url, "DELETE");
        let body = read_success(self.client.delete(&url).send()?)?;
        decode_deleted(kind, &body)
    }
}

pub fn collection_url(base: &str, kind: Kind) -> String {
    format!("{}/api/{}", base.trim_end_matches('/'), kind.collection())
}

/// Collection URL plus the id as one percent-encoded path segment.
pub fn item_url(base: &str, kind: Kind, id: &str) -> Result<String, ApiError> {
    let bad_base = || ApiError::Invalid(format!("API URL '{}' cannot take a record id", base));
    let mut url = Url::parse(&collection_url(base, kind)).map_err(|_| bad_base())?;
    url.path_segments_mut().map_err(|_| bad_base())?.push(id);
    Ok(url.to_string())
}

fn read_success(resp: Response) -> Result<String, ApiError> {
    let status = resp.status();
    let body = resp.text()?;
    check_status(status, body)
}

/// The body of a 2xx response, or a `Server` error carrying the server's
/// message (falling back to the status reason).
pub fn check_status(status: StatusCode, body: String) -> Result<String, ApiError> {
    if status.is_success() {
        return Ok(body);
    }
    let message = server_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    tracing::warn!(status = status.as_u16(), %message, "server refused request");
    Err(ApiError::Server {
        status: status.as_u16(),
        message,
    })
}

/// `message` (or `error`) from a JSON error body.
pub fn server_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|k| v.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

/// `{ "<collection>": [ ... ] }`. A missing or null key is an empty list.
pub fn decode_list(kind: Kind, body: &str) -> Result<Vec<Transaction>, ApiError> {
    let v: Value = serde_json::from_str(body)?;
    let Value::Object(map) = v else {
        return Err(ApiError::Decode(format!(
            "expected an object with '{}'",
            kind.collection()
        )));
    };
    let records = match map.get(kind.collection()) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(Transaction::deserialize)
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(ApiError::Decode(format!(
                "'{}' is not a list",
                kind.collection()
            )));
        }
    };
    for t in &records {
        if t.amount.is_none() {
            tracing::warn!(%kind, id = %t.id, "malformed amount, counted as zero");
        }
        if t.date.is_none() {
            tracing::warn!(%kind, id = %t.id, "malformed date, sorted last");
        }
    }
    Ok(records)
}

/// `{ "<singular>": { ... } }`, or the bare record.
pub fn decode_created(kind: Kind, body: &str) -> Result<Transaction, ApiError> {
    let v: Value = serde_json::from_str(body)?;
    match v.get(kind.singular()) {
        Some(record) if record.is_object() => Ok(Transaction::deserialize(record)?),
        _ if v.get("_id").is_some() || v.get("id").is_some() => Ok(Transaction::deserialize(&v)?),
        _ => Err(ApiError::Decode(format!(
            "created {} missing from response",
            kind
        ))),
    }
}

/// Any 2xx counts as deleted unless the body says `success: false`.
pub fn decode_deleted(kind: Kind, body: &str) -> Result<(), ApiError> {
    let Ok(v) = serde_json::from_str::<Value>(body) else {
        return Ok(());
    };
    if v.get("success").and_then(Value::as_bool) == Some(false) {
        let reason = v
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Failed to delete {}", kind));
        return Err(ApiError::Rejected(reason));
    }
    Ok(())
}
