// src/config.rs

//! Configuration for the presentation core.
//!
//! Settings are deserialized from an optional JSON file named by
//! `SURFACE_PRESENTER_CONFIG`. Every section carries `#[serde(default)]`, so a
//! partial file only overrides what it names. `SURFACE_PRESENTER_VERBOSE`
//! switches on stage-by-stage initialization diagnostics without a file.

use anyhow::{bail, Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "SURFACE_PRESENTER_CONFIG";
/// Environment variable enabling verbose initialization diagnostics.
pub const VERBOSE_ENV: &str = "SURFACE_PRESENTER_VERBOSE";

/// Process-wide configuration, loaded on first use.
///
/// A config that fails to load or validate is reported and replaced by the
/// defaults.
pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    Config::load().unwrap_or_else(|err| {
        warn!("Failed to load configuration, using defaults: {:#}", err);
        Config::default()
    })
});

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window creation settings.
    pub window: WindowConfig,
    /// EGL context negotiation settings.
    pub context: ContextConfig,
    /// Diagnostic output settings.
    pub diagnostics: DiagnosticsConfig,
}

// --- Window Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Toplevel title shown by the compositor.
    pub title: String,
    /// xdg-shell application id.
    pub app_id: String,
    /// Width used when the compositor leaves the size to the client.
    pub fallback_width: u32,
    /// Height used when the compositor leaves the size to the client.
    pub fallback_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "surface-presenter".to_string(),
            app_id: "surface-presenter".to_string(),
            fallback_width: 1280,
            fallback_height: 720,
        }
    }
}

// --- Context Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContextConfig {
    /// Requested `EGL_CONTEXT_CLIENT_VERSION`. Also selects the renderable
    /// type bit used for config selection. Only version 1 gets the
    /// fixed-function baseline.
    pub client_version: i32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        ContextConfig { client_version: 1 }
    }
}

// --- Diagnostics Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Log every initialization stage at info level.
    pub verbose: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        DiagnosticsConfig {
            verbose: cfg!(feature = "verbose-init"),
        }
    }
}

impl Config {
    /// Loads the configuration from the environment.
    ///
    /// Reads the file named by `SURFACE_PRESENTER_CONFIG` if set, applies the
    /// `SURFACE_PRESENTER_VERBOSE` override, and validates the result.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Config::default(),
        };

        if let Ok(value) = std::env::var(VERBOSE_ENV) {
            config.diagnostics.verbose = parse_flag(&value)
                .with_context(|| format!("Invalid value for {}", VERBOSE_ENV))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parses a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Rejects settings the core cannot honor.
    pub fn validate(&self) -> Result<()> {
        if !(1..=3).contains(&self.context.client_version) {
            bail!(
                "context.client_version must be 1, 2 or 3 (got {})",
                self.context.client_version
            );
        }
        if self.window.fallback_width == 0 || self.window.fallback_height == 0 {
            bail!(
                "window fallback size must be non-zero (got {}x{})",
                self.window.fallback_width,
                self.window.fallback_height
            );
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean flag, got '{}'", other),
    }
}
