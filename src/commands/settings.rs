// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::required;
use crate::config::{set_api_url, set_currency, Settings};
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-url", sub)) => {
            let url = required(sub, "url")?;
            set_api_url(conn, url)?;
            println!("API URL set to {}", url.trim().trim_end_matches('/'));
        }
        Some(("set-currency", sub)) => {
            let symbol = required(sub, "symbol")?;
            set_currency(conn, symbol)?;
            println!("Currency symbol set to {}", symbol.trim());
        }
        _ => {
            let rows = vec![
                vec!["api_url".to_string(), settings.api_url.clone()],
                vec!["currency".to_string(), settings.currency.clone()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
    }
    Ok(())
}
