// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(c: Command) -> Command {
    c.arg(
        Arg::new("json")
            .long("json")
            .help("Print output as pretty JSON")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print output as JSON lines")
            .action(ArgAction::SetTrue),
    )
}

pub fn build_cli() -> Command {
    Command::new("spendpace")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Personal finance tracking with budget pacing advisories")
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(
            Command::new("budget")
                .about("Set and list monthly category budgets")
                .subcommand(
                    Command::new("set")
                        .about("Set (or replace) a category budget for a month")
                        .arg(Arg::new("category").required(true))
                        .arg(Arg::new("amount").required(true))
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .value_name("YYYY-MM")
                                .help("Defaults to the current month"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List budgets").arg(
                        Arg::new("month")
                            .long("month")
                            .value_name("YYYY-MM")
                            .help("Only budgets for this month"),
                    ),
                )),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("kind").required(true).help("income|expense|saving"))
                        .arg(Arg::new("category").required(true))
                        .arg(Arg::new("amount").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            json_flags(
                Command::new("advise")
                    .about("Generate spending-pace advisories from current budgets")
                    .arg(
                        Arg::new("date")
                            .long("date")
                            .value_name("YYYY-MM-DD")
                            .help("Evaluate as of this date instead of today"),
                    ),
            )
            .subcommand(
                Command::new("history")
                    .about("Show recently generated advisory batches")
                    .arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .default_value("5"),
                    ),
            ),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage recurring transaction templates")
                .subcommand(
                    Command::new("add")
                        .about("Add a recurring template")
                        .arg(Arg::new("kind").required(true).help("income|expense|saving"))
                        .arg(Arg::new("category").required(true))
                        .arg(Arg::new("amount").required(true))
                        .arg(
                            Arg::new("day")
                                .long("day")
                                .value_parser(value_parser!(u32).range(1..=31))
                                .default_value("1")
                                .help("Day of month the charge lands on"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(Command::new("list").about("List recurring templates"))
                .subcommand(
                    Command::new("run")
                        .about("Materialize templates due for a month")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .value_name("YYYY-MM")
                                .help("Defaults to the current month"),
                        ),
                ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export the transaction ledger")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv or json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Check the database for oddities"))
}
