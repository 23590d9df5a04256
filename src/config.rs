//! Command-line and environment configuration.
//!
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use url::Url;

use crate::app::form::UsernamePrefix;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Parser, Debug, Clone)]
#[command(name = "usrapi-manager", version, about = "TUI to manage user records over a REST API")]
pub struct Config {
    /// Base URL of the REST resource; requests go to `<base>/users`.
    #[arg(long, env = "USRAPI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Theme file (key = #RRGGBB lines); created with defaults when missing.
    #[arg(long, env = "USRAPI_THEME", default_value = "theme.conf")]
    pub theme: PathBuf,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long, env = "USRAPI_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug, -vvvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Reproduce the legacy edit form, which writes the USER- prefix into the
    /// username on every edit.
    #[arg(long, env = "USRAPI_COMPAT_USERNAME_PREFIX")]
    pub compat_username_prefix: bool,
}

impl Config {
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::ERROR,
            1 => tracing::Level::WARN,
            2 => tracing::Level::INFO,
            3 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn username_prefix(&self) -> UsernamePrefix {
        if self.compat_username_prefix {
            UsernamePrefix::Compat
        } else {
            UsernamePrefix::DisplayOnly
        }
    }
}
