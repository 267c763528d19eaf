// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn opt(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help)
}

fn req(id: &'static str, help: &'static str) -> Arg {
    opt(id, help).required(true)
}

fn flag(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help).action(ArgAction::SetTrue)
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(flag("json", "Print pretty JSON"))
        .arg(flag("jsonl", "Print one JSON object per line"))
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Budget categories")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Category name"))
                .arg(opt("budget", "Monthly budget in yen").default_value("0"))
                .arg(flag("fixed", "Fixed cost; left out of the weekly view"))
                .arg(opt("order", "Display order").value_parser(value_parser!(i64))),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(Command::new("rm").arg(req("name", "Category name")))
        .subcommand(
            Command::new("budget")
                .about("Change a category's monthly budget")
                .arg(req("name", "Category name"))
                .arg(req("amount", "Monthly budget in yen")),
        )
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Ledger entries")
        .subcommand(
            Command::new("add")
                .arg(req("date", "YYYY-MM-DD"))
                .arg(req("amount", "Amount in yen"))
                .arg(opt("category", "Category name"))
                .arg(opt("memo", "Free text")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .arg(opt("month", "YYYY-MM"))
                .arg(opt("category", "Category name"))
                .arg(opt("limit", "Maximum rows").value_parser(value_parser!(usize))),
        ))
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Spent versus budget")
        .subcommand(json_flags(
            Command::new("month")
                .about("Per-category summary for a calendar month")
                .arg(opt("month", "YYYY-MM (default: current month)")),
        ))
        .subcommand(json_flags(
            Command::new("week")
                .about("Variable-cost summary for the Monday-start week of a date")
                .arg(opt("date", "YYYY-MM-DD (default: today)")),
        ))
        .subcommand(
            Command::new("savings")
                .about("Monthly income left after all category budgets")
                .arg(opt("income", "Monthly income (default: active monthly incomes)")),
        )
}

fn income_cmd() -> Command {
    Command::new("income")
        .about("Recurring income definitions")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Income name"))
                .arg(req("amount", "Amount in yen"))
                .arg(opt("frequency", "monthly|yearly|one_time").default_value("monthly"))
                .arg(
                    opt("type", "salary|bonus|side_job|investment|other")
                        .default_value("salary"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list").arg(flag("all", "Include deactivated entries")),
        ))
        .subcommand(
            Command::new("rm")
                .about("Deactivate an income definition")
                .arg(req("id", "Income id").value_parser(value_parser!(i64))),
        )
}

fn card_cmd() -> Command {
    Command::new("card")
        .about("Default monthly credit-card charges")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Card name"))
                .arg(req("amount", "Expected monthly charge")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(Command::new("rm").arg(req("name", "Card name")))
}

fn nisa_cmd() -> Command {
    Command::new("nisa")
        .about("NISA accounts")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Account name"))
                .arg(opt("broker", "Broker name").default_value(""))
                .arg(opt("value", "Current value").default_value("0"))
                .arg(opt("invested", "Total invested").default_value("0"))
                .arg(opt("monthly", "Monthly contribution").default_value("0")),
        )
        .subcommand(json_flags(
            Command::new("list").arg(flag("all", "Include deactivated accounts")),
        ))
        .subcommand(
            Command::new("rm")
                .about("Deactivate an account")
                .arg(req("id", "Account id").value_parser(value_parser!(i64))),
        )
}

fn goal_cmd() -> Command {
    let period = || req("period", "1year|3year|5year|10year");
    Command::new("goal")
        .about("Savings goals and projections")
        .subcommand(
            Command::new("set")
                .arg(period())
                .arg(req("target", "Target amount"))
                .arg(opt("nisa-monthly", "Monthly NISA contribution").default_value("0"))
                .arg(opt("yield", "Annual NISA yield in percent (default: configured)"))
                .arg(opt("bonus", "Saved amount per bonus").default_value("0"))
                .arg(
                    opt("bonus-frequency", "Bonuses per year")
                        .default_value("2")
                        .value_parser(value_parser!(i64)),
                )
                .arg(opt(
                    "monthly",
                    "Flat monthly savings (default: amount required to reach the target)",
                )),
        )
        .subcommand(json_flags(Command::new("show").arg(period())))
        .subcommand(json_flags(Command::new("list")))
        .subcommand(json_flags(
            Command::new("simulate")
                .about("Milestones and long-term outlook")
                .arg(period()),
        ))
        .subcommand(Command::new("rm").arg(period()))
}

fn record_cmd() -> Command {
    let month = || req("month", "YYYY-MM");
    let item = |id: &'static str, help: &'static str| opt(id, help).action(ArgAction::Append);
    Command::new("record")
        .about("Monthly asset records")
        .subcommand(json_flags(Command::new("show").arg(month())))
        .subcommand(
            Command::new("save")
                .arg(month())
                .arg(opt("bank", "Bank balance"))
                .arg(opt("income", "Monthly income"))
                .arg(opt("credit", "Credit-card expenses"))
                .arg(opt("nisa", "NISA value"))
                .arg(opt("notes", "Free text"))
                .arg(item("bank-item", "NAME=AMOUNT, repeatable; sets --bank"))
                .arg(item("income-item", "NAME=AMOUNT, repeatable; sets --income"))
                .arg(item("credit-item", "NAME=AMOUNT, repeatable; sets --credit"))
                .arg(item("nisa-item", "NAME=AMOUNT, repeatable; sets --nisa"))
                .arg(flag("confirm", "Save as confirmed"))
                .arg(flag("unconfirm", "Save as draft").conflicts_with("confirm"))
                .arg(flag("apply-next", "Also carry the totals into next month"))
                .arg(flag("yes", "Overwrite next month without asking")),
        )
        .subcommand(Command::new("confirm").arg(month()))
        .subcommand(json_flags(
            Command::new("next")
                .about("Go to the following month, deriving a draft if it is missing")
                .arg(month()),
        ))
        .subcommand(
            Command::new("apply-next")
                .about("Carry this month's totals into next month")
                .arg(month())
                .arg(flag("yes", "Overwrite an existing next-month record")),
        )
        .subcommand(json_flags(
            Command::new("history")
                .arg(opt("limit", "Maximum months").value_parser(value_parser!(usize))),
        ))
}

fn export_cmd() -> Command {
    Command::new("export").subcommand(
        Command::new("records")
            .arg(req("format", "csv|json"))
            .arg(req("out", "Output path")),
    )
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Resolved configuration and per-user settings")
        .subcommand(json_flags(Command::new("show")))
        .subcommand(
            Command::new("set-yield")
                .about("Default annual NISA yield used by `goal set`")
                .arg(req("rate", "Percent, e.g. 5.00")),
        )
}

pub fn build_cli() -> Command {
    Command::new("kakeibo")
        .version(clap::crate_version!())
        .about("Household budget, monthly asset records, and savings-goal projection")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("SQLite file (env: KAKEIBO_DB)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Household member to act for (env: KAKEIBO_USER)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(category_cmd())
        .subcommand(expense_cmd())
        .subcommand(budget_cmd())
        .subcommand(income_cmd())
        .subcommand(card_cmd())
        .subcommand(nisa_cmd())
        .subcommand(goal_cmd())
        .subcommand(record_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check stored records for inconsistencies"))
        .subcommand(config_cmd())
}
