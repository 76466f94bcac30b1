// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use cashboard::api::HttpApi;
use cashboard::commands::report::{DEFAULT_MONTHS, DEFAULT_RECENT};
use cashboard::config::Settings;
use cashboard::models::Kind;
use cashboard::{cli, commands, db, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    utils::init_tracing(matches.get_flag("verbose"));

    let mut conn = db::open_or_init()?;
    let flag_url = matches.get_one::<String>("api_url").map(String::as_str);
    let settings = Settings::load(&conn, flag_url)?;
    let api = HttpApi::new(&settings.api_url)?;
    tracing::debug!(api = api.base_url(), "using API");

    match matches.subcommand() {
        Some(("expense", sub)) => {
            commands::entries::handle(&api, &mut conn, &settings, Kind::Expense, sub)?
        }
        Some(("income", sub)) => {
            commands::entries::handle(&api, &mut conn, &settings, Kind::Income, sub)?
        }
        Some(("transactions", sub)) => {
            commands::transactions::handle(&api, &mut conn, &settings, sub)?
        }
        Some(("report", sub)) => commands::report::handle(&api, &mut conn, &settings, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&api, &mut conn, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, &settings, sub)?,
        _ => commands::report::show(
            &api,
            &mut conn,
            &settings,
            DEFAULT_RECENT,
            DEFAULT_MONTHS,
            false,
            false,
        )?,
    }
    Ok(())
}
