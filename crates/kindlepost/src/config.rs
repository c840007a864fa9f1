//! Process configuration.
//!
//! Loaded once at startup from an optional TOML file in the home
//! directory (or an explicit `--config` path), then overridden by
//! environment variables, and passed into the pipeline by reference.
//! The delivery core never reads any of this ambiently.

use anyhow::{Context, Result};
use kindlepost_smtp::DeliveryConfig;
use serde::Deserialize;
use std::path::Path;

/// File name looked up in the home directory when no explicit config
/// path is given.
pub const CONFIG_FILE: &str = ".kindlepost.toml";

/// Settings for message construction and delivery.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Envelope sender and From header address.
    pub sender: String,
    /// Subject header of the generated message.
    pub subject: String,
    /// Hostname the client announces in EHLO/HELO.
    pub client_hostname: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sender: "kindlepost@localhost".to_string(),
            subject: "For kindle".to_string(),
            client_hostname: "localhost".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the given path, or from
    /// `$HOME/.kindlepost.toml` when present, falling back to defaults.
    /// `KINDLEPOST_SENDER`, `KINDLEPOST_SUBJECT`, and
    /// `KINDLEPOST_HOSTNAME` environment variables override file values.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be read, or if
    /// any file fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match dirs::home_dir().map(|home| home.join(CONFIG_FILE)) {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    fn apply_env(&mut self) {
        if let Ok(sender) = std::env::var("KINDLEPOST_SENDER") {
            self.sender = sender;
        }
        if let Ok(subject) = std::env::var("KINDLEPOST_SUBJECT") {
            self.subject = subject;
        }
        if let Ok(hostname) = std::env::var("KINDLEPOST_HOSTNAME") {
            self.client_hostname = hostname;
        }
    }

    /// Maps the settings onto the delivery pipeline's parameters.
    #[must_use]
    pub fn delivery(&self) -> DeliveryConfig {
        DeliveryConfig {
            sender: self.sender.clone(),
            client_hostname: self.client_hostname.clone(),
            ..DeliveryConfig::default()
        }
    }
}
