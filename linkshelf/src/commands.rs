use crate::CLAP_STYLING;
use clap::{arg, command};
use linkshelf::config::{API_URL_ENV, DEFAULT_TIMEOUT};
use linkshelf::parse_category_arg;

fn category_arg() -> clap::Arg {
    arg!(-c --"category" <CATEGORY>)
        .required(false)
        .help("Category label, e.g. Programación, Finanzas or programming, finance")
        .value_parser(parse_category_arg)
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkshelf")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkshelf")
        .about("Save, categorize and browse links through the links API")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"api-url" <URL>)
                .required(false)
                .global(true)
                .env(API_URL_ENV)
                .help("Base URL of the links API (default: http://127.0.0.1:5000)"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .global(true)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value(DEFAULT_TIMEOUT),
        )
        .arg(
            arg!(--"log-file" <PATH>)
                .required(false)
                .global(true)
                .help("Write logs to this file (the TUI logs nowhere else)"),
        )
        .subcommand_required(false)
        .subcommand(command!("ui").about("Launch the interactive link manager (default)"))
        .subcommand(command!("list").about("List saved links, newest first"))
        .subcommand(command!("stats").about("Show link counts per category"))
        .subcommand(
            command!("add")
                .about("Save a new link")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The URL to save"),
                )
                .arg(
                    arg!(-t --"title" <TITLE>)
                        .required(false)
                        .help("Title for the link (default: suggested by the server)"),
                )
                .arg(category_arg())
                .arg(
                    arg!(--"no-analyze")
                        .required(false)
                        .help("Don't ask the server for a title and category first")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("edit")
                .about("Change a saved link")
                .arg(
                    arg!(--"id" <ID>)
                        .required(true)
                        .help("Id of the link to change"),
                )
                .arg(arg!(-u --"url" <URL>).required(false).help("New URL"))
                .arg(arg!(-t --"title" <TITLE>).required(false).help("New title"))
                .arg(category_arg()),
        )
        .subcommand(
            command!("delete")
                .about("Delete a saved link")
                .arg(
                    arg!(--"id" <ID>)
                        .required(true)
                        .help("Id of the link to delete"),
                )
                .arg(
                    arg!(-y --"yes")
                        .required(false)
                        .help("Don't ask for confirmation")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("analyze")
                .about("Ask the server for a title and category for a URL")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The URL to analyze"),
                ),
        )
        .subcommand(
            command!("import")
                .about("Save every URL in a newline-delimited file")
                .arg(
                    arg!(-f --"file" <PATH>)
                        .required(true)
                        .help("Path to a newline-delimited file of URLs")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(category_arg()),
        )
}
