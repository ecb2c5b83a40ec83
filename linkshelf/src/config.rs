use clap::ArgMatches;
use linkshelf_core::ApiClient;
use linkshelf_core::ApiError;
use std::path::PathBuf;

pub const API_URL_ENV: &str = "LINKSHELF_API_URL";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT: &str = "10";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub log_file: Option<PathBuf>,
    pub quiet: bool,
}

impl Config {
    /// Read the global arguments. `--api-url` also picks up
    /// `LINKSHELF_API_URL` from the environment through clap.
    pub fn from_matches(args: &ArgMatches) -> Self {
        Self {
            api_url: resolve_api_url(args.get_one::<String>("api-url").map(String::as_str)),
            timeout_secs: args.get_one::<u64>("timeout").copied().unwrap_or(10),
            log_file: args
                .get_one::<String>("log-file")
                .map(|p| expand_path(p)),
            quiet: args.get_flag("quiet"),
        }
    }

    pub fn api_client(&self) -> Result<ApiClient, ApiError> {
        ApiClient::with_timeout(&self.api_url, self.timeout_secs)
    }
}

/// The given url, else the one baked in at build time, else the local default.
pub fn resolve_api_url(given: Option<&str>) -> String {
    given
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .or(option_env!("LINKSHELF_API_URL"))
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
