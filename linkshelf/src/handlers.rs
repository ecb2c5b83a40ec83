use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use linkshelf_core::category::{CATEGORY_OPTIONS, default_category};
use linkshelf_core::draft::{DraftTarget, LinkDraft, is_web_url};
use linkshelf_core::report::{generate_link_report, generate_stats_report};
use linkshelf_core::service::delete_prompt;
use linkshelf_core::{Category, Link, LinkService, MessageKind, Outcome};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};

// Helper functions for argument parsing

/// Parse a `--category` value: a wire label or the English name, any case.
pub fn parse_category_arg(value: &str) -> Result<Category, String> {
    Category::parse(value).ok_or_else(|| {
        let options: Vec<&str> = CATEGORY_OPTIONS.iter().map(|c| c.as_str()).collect();
        format!(
            "unknown category '{}' (expected one of: {})",
            value,
            options.join(", ")
        )
    })
}

/// Load and parse URLs from a newline-delimited file
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read links file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, adding http:// when it has no scheme
pub fn parse_url_line(line: &str) -> Option<String> {
    if is_web_url(line) {
        return Some(line.to_string());
    }

    if !line.contains("://") {
        let with_scheme = format!("http://{}", line);
        if is_web_url(&with_scheme) {
            return Some(with_scheme);
        }
    }

    eprintln!("{} Skipping invalid URL '{}'", "⚠".yellow(), line);
    None
}

/// Apply the fields given on the command line to an existing link.
pub fn merge_edit(
    link: &Link,
    url: Option<&str>,
    title: Option<&str>,
    category: Option<Category>,
) -> LinkDraft {
    let mut draft = LinkDraft::from_link(link);
    if let Some(url) = url {
        draft.url = url.to_string();
    }
    if let Some(title) = title {
        draft.title = title.to_string();
    }
    if let Some(category) = category {
        draft.category = category;
    }
    draft
}

/// Whether a `[y/N]` answer (already trimmed and lowercased) accepts.
pub fn is_confirmation(response: &str) -> bool {
    matches!(response, "y" | "yes")
}

// Output helpers

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> io::Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}

pub fn print_banner() {
    print_divider();
    println!("{}", "  LINKSHELF".bright_white().bold());
    println!(
        "  {}",
        format!("v{} - your saved links, from the terminal", env!("CARGO_PKG_VERSION")).dimmed()
    );
    print_divider();
    println!();
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());
    spinner
}

/// Print the store's current message with a ✓ or ✗.
fn print_message(service: &LinkService) {
    let store = service.lock();
    if let Some(message) = store.message() {
        match message.kind {
            MessageKind::Success => println!("{} {}", "✓".green().bold(), message.text),
            MessageKind::Error => eprintln!("{} {}", "✗".red().bold(), message.text.red()),
        }
    }
}

async fn fetch_with_spinner(service: &LinkService, message: &str) -> Outcome {
    let spinner = spinner(message);
    let outcome = service.fetch_all().await;
    spinner.finish_and_clear();
    if outcome == Outcome::Failed {
        print_message(service);
    }
    outcome
}

// Subcommand handlers

pub async fn handle_ui(service: Arc<LinkService>) -> Outcome {
    let handle = Handle::current();
    match tokio::task::spawn_blocking(move || linkshelf_tui::run(service, handle)).await {
        Ok(Ok(())) => Outcome::Succeeded,
        Ok(Err(e)) => {
            eprintln!("Error running TUI: {}", e);
            Outcome::Failed
        }
        Err(e) => {
            eprintln!("Error running TUI: {}", e);
            Outcome::Failed
        }
    }
}

pub async fn handle_list(service: &LinkService) -> Outcome {
    let outcome = fetch_with_spinner(service, "Fetching links...").await;
    if outcome == Outcome::Succeeded {
        print!("{}", generate_link_report(service.lock().sorted_links()));
    }
    outcome
}

pub async fn handle_stats(service: &LinkService) -> Outcome {
    let outcome = fetch_with_spinner(service, "Fetching statistics...").await;
    if outcome == Outcome::Succeeded {
        let store = service.lock();
        print!("{}", generate_stats_report(store.stats(), store.total_links()));
    }
    outcome
}

pub async fn handle_add(service: &LinkService, args: &ArgMatches) -> Outcome {
    let Some(url) = args.get_one::<String>("url") else {
        return Outcome::Skipped;
    };
    let title = args.get_one::<String>("title");
    let category = args.get_one::<Category>("category").copied();

    service.update_store(|store| *store.form_mut() = LinkDraft::new(url.as_str()));

    // Let the server suggest whatever the user left out
    if (title.is_none() || category.is_none()) && !args.get_flag("no-analyze") {
        let spinner = spinner("Analyzing URL...");
        let analyzed = service.analyze(url, DraftTarget::Create).await;
        spinner.finish_and_clear();
        debug!("Analysis before create: {:?}", analyzed);
    }

    let draft = service.update_store(|store| {
        let form = store.form_mut();
        if let Some(title) = title {
            form.title = title.clone();
        }
        if let Some(category) = category {
            form.category = category;
        }
        form.clone()
    });

    let spinner = spinner("Saving link...");
    let outcome = service.create(draft).await;
    spinner.finish_and_clear();

    match outcome {
        Outcome::Skipped => eprintln!("{} A URL is required", "✗".red().bold()),
        _ => print_message(service),
    }
    outcome
}

pub async fn handle_edit(service: &LinkService, args: &ArgMatches) -> Outcome {
    let Some(id) = args.get_one::<String>("id") else {
        return Outcome::Skipped;
    };
    let url = args.get_one::<String>("url").map(String::as_str);
    let title = args.get_one::<String>("title").map(String::as_str);
    let category = args.get_one::<Category>("category").copied();

    if url.is_none() && title.is_none() && category.is_none() {
        eprintln!(
            "{} Nothing to change: pass --url, --title or --category",
            "✗".red().bold()
        );
        return Outcome::Skipped;
    }

    if fetch_with_spinner(service, "Fetching links...").await == Outcome::Failed {
        return Outcome::Failed;
    }

    let draft = service.update_store(|store| {
        let link = store.find_link(id).cloned()?;
        store.start_edit(&link);
        let draft = merge_edit(&link, url, title, category);
        *store.active_draft_mut() = draft.clone();
        Some(draft)
    });
    let Some(draft) = draft else {
        eprintln!("{} No link with id '{}'", "✗".red().bold(), id);
        return Outcome::Failed;
    };

    let spinner = spinner("Saving changes...");
    let outcome = service.update(draft).await;
    spinner.finish_and_clear();
    print_message(service);
    outcome
}

pub async fn handle_delete(service: &LinkService, args: &ArgMatches) -> Outcome {
    let Some(id) = args.get_one::<String>("id") else {
        return Outcome::Skipped;
    };
    let assume_yes = args.get_flag("yes");

    // The label is only for the prompt; a failed lookup falls back to the id
    if service.fetch_all().await == Outcome::Failed {
        warn!("Could not fetch links before deleting {}", id);
    }
    let label = service
        .lock()
        .find_link(id)
        .map(|l| l.display_title().to_string())
        .unwrap_or_else(|| id.clone());

    // Read the answer off the runtime workers; remove() only sees the result
    let confirmed = assume_yes || {
        let question = format!("{} [y/N]:", delete_prompt(&label));
        match tokio::task::spawn_blocking(move || print_prompt(&question)).await {
            Ok(Ok(response)) => is_confirmation(&response),
            Ok(Err(e)) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
            Err(e) => {
                warn!("Confirmation prompt failed: {}", e);
                false
            }
        }
    };

    let outcome = service.remove(id, &label, |_| confirmed).await;

    match outcome {
        Outcome::Skipped => println!("{} Delete cancelled.", "→".blue()),
        _ => print_message(service),
    }
    outcome
}

pub async fn handle_analyze(service: &LinkService, args: &ArgMatches) -> Outcome {
    let Some(url) = args.get_one::<String>("url") else {
        return Outcome::Skipped;
    };

    let spinner = spinner("Analyzing URL...");
    let outcome = service.analyze(url, DraftTarget::Create).await;
    spinner.finish_and_clear();

    match outcome {
        Outcome::Skipped => {
            eprintln!("{} '{}' is not an http(s) URL", "✗".red().bold(), url);
        }
        Outcome::Failed => {
            eprintln!("{} Could not analyze '{}'", "✗".red().bold(), url);
        }
        Outcome::Succeeded => {
            let store = service.lock();
            let form = store.form();
            println!("{} {}", "→".blue(), url.bright_white());
            if form.title.is_empty() {
                println!("  {} {}", "title:".blue(), "(none suggested)".dimmed());
            } else {
                println!("  {} {}", "title:".blue(), form.title.bright_white());
            }
            println!("  {} {}", "category:".blue(), form.category);
        }
    }
    outcome
}

pub async fn handle_import(service: &LinkService, args: &ArgMatches) -> Outcome {
    let Some(path) = args.get_one::<PathBuf>("file") else {
        return Outcome::Skipped;
    };
    let category = args
        .get_one::<Category>("category")
        .copied()
        .unwrap_or_else(default_category);

    let urls = match load_urls_from_file(path) {
        Ok(urls) => urls,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return Outcome::Failed;
        }
    };

    println!("{} Importing {} link(s) as {}", "→".blue(), urls.len(), category);

    let progress = ProgressBar::new(urls.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut created = 0usize;
    let mut failed = 0usize;
    for url in &urls {
        progress.set_message(url.clone());
        let outcome = service
            .create(LinkDraft::new(url.as_str()).with_category(category))
            .await;
        let text = service
            .lock()
            .message()
            .map(|m| m.text.clone())
            .unwrap_or_default();

        match outcome {
            Outcome::Succeeded => {
                created += 1;
                progress.println(format!("{} {}", "✓".green(), text));
            }
            _ => {
                failed += 1;
                progress.println(format!("{} {}: {}", "✗".red(), url, text));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    // One refresh for the whole batch
    let batch = if created > 0 {
        Outcome::Succeeded
    } else {
        Outcome::Skipped
    };
    service.resync(batch).await;

    println!();
    print_divider();
    println!(
        "  {} created, {} failed",
        created.to_string().green().bold(),
        failed.to_string().red().bold()
    );
    print_divider();

    if failed > 0 {
        Outcome::Failed
    } else {
        Outcome::Succeeded
    }
}
