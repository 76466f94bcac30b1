// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn view_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("filter")
            .long("filter")
            .value_parser(["all", "income", "expense"])
            .default_value("all")
            .help("all | income | expense"),
    )
    .arg(
        Arg::new("search")
            .long("search")
            .help("Case-insensitive match on title or description"),
    )
    .arg(
        Arg::new("sort")
            .long("sort")
            .default_value("date")
            .help("date | amount (anything else keeps fetch order)"),
    )
}

fn entry_cmd(name: &'static str, label: &'static str) -> Command {
    Command::new(name)
        .about(format!("Record, list and delete {}s", label))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("add")
                .about(format!("Add an {}", label))
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .required(true)
                        .help("YYYY-MM-DD"),
                )
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(json_args(
            Command::new("list").about(format!("List {}s with their total", label)),
        ))
        .subcommand(
            Command::new("rm")
                .about(format!("Delete an {} by id", label))
                .arg(Arg::new("id").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("cashboard")
        .version(crate_version!())
        .about("Income and expense dashboard for a remote ledger API")
        .arg(
            Arg::new("api_url")
                .long("api-url")
                .global(true)
                .help("API base URL (overrides CASHBOARD_API_URL and config)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log requests to stderr"),
        )
        .subcommand(entry_cmd("expense", "expense"))
        .subcommand(entry_cmd("income", "income"))
        .subcommand(json_args(view_args(
            Command::new("transactions")
                .visible_alias("tx")
                .about("Transaction history with totals"),
        )))
        .subcommand(json_args(
            Command::new("report")
                .visible_alias("dash")
                .about("Dashboard: totals, recent history, ranges, monthly series")
                .arg(
                    Arg::new("recent")
                        .long("recent")
                        .value_parser(value_parser!(usize))
                        .default_value("3"),
                )
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(usize))
                        .default_value("12"),
                ),
        ))
        .subcommand(view_args(
            Command::new("export")
                .about("Export the transaction history")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .required(true)
                        .help("csv | json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        ))
        .subcommand(
            Command::new("config")
                .about("Show or change stored settings")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set-url").arg(Arg::new("url").required(true)))
                .subcommand(Command::new("set-currency").arg(Arg::new("symbol").required(true))),
        )
}
