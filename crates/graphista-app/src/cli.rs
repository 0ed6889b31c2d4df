//! CLI argument definitions for the Graphista terminal client.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Graphista — a conversational client for a natural-language knowledge graph.
#[derive(Parser, Debug)]
#[command(name = "graphista", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the reasoning backend.
    #[arg(short = 'b', long = "backend-url")]
    pub backend_url: Option<String>,

    /// Recognition language tag (e.g. fr-FR).
    #[arg(long = "language")]
    pub language: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Expose the structured debug snapshot on render failures.
    #[arg(long = "show-debug")]
    pub show_debug: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > GRAPHISTA_CONFIG env var > ~/.graphista/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("GRAPHISTA_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Overlay the flag values onto the loaded configuration.
    pub fn apply(&self, config: &mut graphista_core::GraphistaConfig) {
        if let Some(ref url) = self.backend_url {
            config.backend.base_url = url.clone();
        }
        if let Some(ref language) = self.language {
            config.speech.language = language.clone();
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
        if self.show_debug {
            config.viz.show_debug = true;
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".graphista").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".graphista").join("config.toml");
    }
    PathBuf::from("config.toml")
}
