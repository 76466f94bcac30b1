// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures surfaced by a [`crate::api::ResourceApi`] call.
///
/// An empty collection is not an error; it comes back as `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, or the body could not be read.
    #[error("{0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Server { status: u16, message: String },
    /// A delete answered `success: false`.
    #[error("{0}")]
    Rejected(String),
    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The draft was refused before any request was sent.
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
