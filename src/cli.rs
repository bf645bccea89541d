// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Subscription id")
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    ]
}

fn sub_cmd() -> Command {
    Command::new("sub")
        .about("Manage subscriptions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Register a subscription")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .allow_hyphen_values(true),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .required(true)
                        .help("STREAMING|GAMES|MOBILE|SERVICE|SAAS|OTHER"),
                )
                .arg(
                    Arg::new("cadence")
                        .long("cadence")
                        .required(true)
                        .help("WEEKLY|MONTHLY|QUARTERLY|SEMI_ANNUAL|ANNUAL"),
                )
                .arg(
                    Arg::new("due")
                        .long("due")
                        .required(true)
                        .help("Next due date (YYYY-MM-DD)"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List subscriptions")
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .default_value("name")
                        .help("name|price|duedate"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Include paused subscriptions"),
                )
                .args(json_args()),
        )
        .subcommand(Command::new("show").about("Show one subscription").arg(id_arg()))
        .subcommand(
            Command::new("edit")
                .about("Edit name, amount, category or cadence")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .allow_hyphen_values(true),
                )
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("cadence").long("cadence")),
        )
        .subcommand(Command::new("rm").about("Delete a subscription").arg(id_arg()))
        .subcommand(
            Command::new("pause")
                .about("Hide from the due-soon queue")
                .arg(id_arg()),
        )
        .subcommand(Command::new("resume").about("Undo pause").arg(id_arg()))
        .subcommand(
            Command::new("search")
                .about("Find subscriptions by name")
                .arg(Arg::new("name").long("name").required(true))
                .args(json_args()),
        )
}

pub fn build_cli() -> Command {
    Command::new("subclip")
        .version(crate_version!())
        .about("Track recurring subscriptions, payments and what is due soon")
        .arg(
            Arg::new("owner")
                .long("owner")
                .global(true)
                .value_parser(value_parser!(i64))
                .help("Owner id (defaults to the owner_id setting)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(sub_cmd())
        .subcommand(
            Command::new("pay")
                .about("Confirm a payment and advance the due date one cycle")
                .arg(id_arg())
                .arg(
                    Arg::new("on")
                        .long("on")
                        .help("Payment date (YYYY-MM-DD), defaults to today"),
                ),
        )
        .subcommand(
            Command::new("history")
                .about("Show the payment ledger of a subscription")
                .arg(id_arg())
                .arg(
                    Arg::new("latest_first")
                        .long("latest-first")
                        .action(ArgAction::SetTrue),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("due")
                .about("Subscriptions due soon, most urgent first")
                .arg(
                    Arg::new("window")
                        .long("window")
                        .value_parser(value_parser!(i64))
                        .help("Days ahead to include (defaults to the due_window_days setting)"),
                )
                .arg(
                    Arg::new("as_of")
                        .long("as-of")
                        .help("Reference date (YYYY-MM-DD), defaults to today"),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("report")
                .about("Cost reports")
                .subcommand_required(true)
                .subcommand(
                    Command::new("monthly")
                        .about("Monthly and yearly cost per category")
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("subscriptions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("json")
                                .help("json|csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("subscriptions")
                        .about("Import a JSON export")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand_required(true)
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("key")
                                .long("key")
                                .required(true)
                                .help("owner_id|due_window_days|currency"),
                        )
                        .arg(Arg::new("value").long("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check ledger consistency"))
}
