// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::api::DEFAULT_API_URL;
use crate::db::{get_setting, set_setting};

pub const API_URL_ENV: &str = "CASHBOARD_API_URL";
pub const DEFAULT_CURRENCY: &str = "₹";

const KEY_API_URL: &str = "api_url";
const KEY_CURRENCY: &str = "currency";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub currency: String,
}

impl Settings {
    /// Flag beats environment beats the settings table beats the default.
    pub fn resolve(
        conn: &Connection,
        flag_url: Option<&str>,
        env_url: Option<&str>,
    ) -> Result<Self> {
        let stored_url = get_setting(conn, KEY_API_URL)?;
        let api_url = flag_url
            .or(env_url)
            .map(str::to_string)
            .or(stored_url)
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let currency = get_setting(conn, KEY_CURRENCY)?
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        Ok(Self { api_url, currency })
    }

    /// Resolve with the environment variable read from the process.
    pub fn load(conn: &Connection, flag_url: Option<&str>) -> Result<Self> {
        let env_url = std::env::var(API_URL_ENV).ok();
        Self::resolve(conn, flag_url, env_url.as_deref())
    }
}

pub fn set_api_url(conn: &Connection, url: &str) -> Result<()> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!("Invalid API URL '{}', expected http:// or https://", url);
    }
    set_setting(conn, KEY_API_URL, url)
}

pub fn set_currency(conn: &Connection, symbol: &str) -> Result<()> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        anyhow::bail!("Currency symbol must not be empty");
    }
    set_setting(conn, KEY_CURRENCY, symbol)
}
