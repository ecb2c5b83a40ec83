use colored::Colorize;
use commands::command_argument_builder;
use linkshelf::config::Config;
use linkshelf::handlers::{
    handle_add, handle_analyze, handle_delete, handle_edit, handle_import, handle_list,
    handle_stats, handle_ui, print_banner,
};
use linkshelf_core::{LinkService, Outcome};
use std::sync::Arc;

mod commands;
mod logging;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    // Global args are read where they are guaranteed to be propagated
    let global_args = chosen_command
        .subcommand()
        .map(|(_, sub)| sub)
        .unwrap_or(&chosen_command);
    let config = Config::from_matches(global_args);

    let interactive = matches!(chosen_command.subcommand(), None | Some(("ui", _)));
    if let Err(e) = logging::init(config.log_file.as_deref(), interactive) {
        eprintln!("{} Could not open log file: {}", "⚠".yellow(), e);
    }

    // Show banner unless --quiet flag is set; the TUI has its own header
    if !config.quiet && !interactive {
        print_banner();
    }

    let api = match config.api_client() {
        Ok(api) => api,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Using API at {}", api.base_url());
    let service = Arc::new(LinkService::new(api));

    let outcome = match chosen_command.subcommand() {
        None | Some(("ui", _)) => handle_ui(service.clone()).await,
        Some(("list", _)) => handle_list(&service).await,
        Some(("stats", _)) => handle_stats(&service).await,
        Some(("add", primary_command)) => handle_add(&service, primary_command).await,
        Some(("edit", primary_command)) => handle_edit(&service, primary_command).await,
        Some(("delete", primary_command)) => handle_delete(&service, primary_command).await,
        Some(("analyze", primary_command)) => handle_analyze(&service, primary_command).await,
        Some(("import", primary_command)) => handle_import(&service, primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if outcome == Outcome::Failed {
        std::process::exit(1);
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
