//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

pub(crate) fn command() -> Command {
    Command::new("uigen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Schema-guaranteed generation of UI component configs and source")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file (defaults to ./uigen.toml when present)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .arg(
            Arg::new("max-attempts")
                .long("max-attempts")
                .global(true)
                .value_parser(value_parser!(u32).range(1..))
                .help("Attempt ceiling per request"),
        )
        .subcommand(Command::new("kinds").about("List artifact kinds"))
        .subcommand(
            Command::new("describe")
                .about("Print the prompt description of a config kind")
                .arg(kind_arg())
                .arg(
                    Arg::new("example")
                        .long("example")
                        .action(ArgAction::SetTrue)
                        .help("Print a valid example value instead"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a config value without generating")
                .arg(kind_arg())
                .arg(input_arg("JSON file to validate (stdin when omitted)")),
        )
        .subcommand(
            Command::new("check")
                .about("Check TSX source, optionally against a provider's vocabulary")
                .arg(
                    Arg::new("provider")
                        .long("provider")
                        .help("Provider id (mui, chakra, antd, mantine)"),
                )
                .arg(input_arg("TSX file to check (stdin when omitted)")),
        )
        .subcommand(
            Command::new("config")
                .about("Generate an updated component config")
                .arg(kind_arg())
                .arg(intent_arg())
                .arg(current_arg("JSON file with the current config")),
        )
        .subcommand(
            Command::new("code")
                .about("Generate one source per component library")
                .arg(intent_arg())
                .arg(
                    Arg::new("provider")
                        .long("provider")
                        .short('p')
                        .required(true)
                        .action(ArgAction::Append)
                        .help("Provider id; repeat for several"),
                )
                .arg(current_arg("JSON file mapping provider id to current source")),
        )
        .subcommand(
            Command::new("component")
                .about("Rewrite a single component")
                .arg(intent_arg())
                .arg(current_arg("TSX file with the current source")),
        )
        .subcommand(
            Command::new("history")
                .about("Show recorded config generations")
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .default_value("20")
                        .value_parser(value_parser!(usize))
                        .help("Most recent records to show"),
                ),
        )
}

fn kind_arg() -> Arg {
    Arg::new("kind")
        .required(true)
        .help("Config kind, e.g. progress or icon-button")
}

fn intent_arg() -> Arg {
    Arg::new("intent")
        .required(true)
        .help("Requested change in natural language")
}

fn current_arg(help: &'static str) -> Arg {
    Arg::new("current")
        .long("current")
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

fn input_arg(help: &'static str) -> Arg {
    Arg::new("file")
        .value_parser(value_parser!(PathBuf))
        .help(help)
}
