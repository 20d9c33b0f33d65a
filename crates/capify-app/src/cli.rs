//! CLI argument definitions for the capify binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// capify: chat assistant that assembles transactions from free-form messages.
///
/// Reads one event per line from stdin: `/command`, `#token` for a button
/// press, or plain text. Prefix a line with `@user` to speak as someone else.
#[derive(Parser, Debug)]
#[command(name = "capify", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// User id for lines without an `@user` prefix.
    #[arg(short = 'u', long = "user", default_value = "local")]
    pub user: String,

    /// Display name used when greeting the default user.
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Print every draft as JSON when input ends.
    #[arg(long = "dump-sessions")]
    pub dump_sessions: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > CAPIFY_CONFIG env var > platform default (~/.capify/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("CAPIFY_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log filter directive.
    ///
    /// Priority: --log-level flag > RUST_LOG env var > config file value.
    pub fn resolve_log_level(&self, config_level: Option<&str>) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(filter) = std::env::var("RUST_LOG") {
            if !filter.trim().is_empty() {
                return filter;
            }
        }
        config_level.unwrap_or("info").to_string()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".capify").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".capify").join("config.toml");
    }
    PathBuf::from("config.toml")
}
