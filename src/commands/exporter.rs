// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use rusqlite::Connection;

use super::transactions::{query_rows, HistoryRow};
use super::{fetch_merged, required};
use crate::api::ResourceApi;

pub fn handle<A: ResourceApi + Sync + ?Sized>(
    api: &A,
    conn: &mut Connection,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let loaded = fetch_merged(api, conn)?;
    loaded.announce();
    let rows: Vec<HistoryRow> = query_rows(&loaded.data, sub)?
        .iter()
        .map(HistoryRow::from_tagged)
        .collect();
    write_rows(&fmt, out, &rows)?;
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}

pub fn write_rows(fmt: &str, out: &str, rows: &[HistoryRow]) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(rows)?)
                .with_context(|| format!("Write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
