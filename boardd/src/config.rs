// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Layered configuration: built-in defaults, then an optional TOML file at
//! a `dirs`-resolved path, then CLI flags, each layer overriding the last.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use clap::{Args, Parser};
use serde::{Deserialize, Serialize};

use crate::error::BoarddError;

pub enum ConfigPaths {
    TopLevelFolderName,
    ConfigFileName,
}

impl Display for ConfigPaths {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConfigPaths::TopLevelFolderName => "boardd",
            ConfigPaths::ConfigFileName => "config.toml",
        };
        write!(f, "{name}")
    }
}

/// Where the config file lives: `$XDG_CONFIG_HOME/boardd/config.toml` (or
/// the platform equivalent via [`dirs::config_dir`]).
#[must_use]
pub fn try_get_config_file_path() -> Option<PathBuf> {
    let folder = dirs::config_dir()?.join(ConfigPaths::TopLevelFolderName.to_string());
    Some(folder.join(ConfigPaths::ConfigFileName.to_string()))
}

/// Values loaded from the TOML config file. Every field is optional: an
/// absent file, or an absent field within it, falls through to
/// [`BoardSettings::defaults`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    pub listen_addr: Option<String>,
    pub render_width: Option<usize>,
    pub door_idle_timeout_secs: Option<u64>,
    pub ai_retry_attempts: Option<usize>,
    pub ai_retry_delay_ms: Option<u64>,
    pub ai_endpoint: Option<String>,
    pub broker_subscription_cap: Option<usize>,
    pub heartbeat_interval_secs: Option<u64>,
}

/// CLI flags (spec's Ambient Stack "Configuration": `clap`, derive API,
/// `wrap_help`). Every flag overrides both the built-in default and
/// whatever the TOML file supplied.
#[derive(Debug, Parser)]
#[command(bin_name = "boardd")]
#[command(about = "📟 A retro terminal bulletin-board server 📟")]
#[command(version)]
#[command(
    help_template = "{about}\nVersion: {bin} {version}\n\n{usage-heading} {usage}\n\n{all-args}\n"
)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[arg(
        long,
        help = "Path to a TOML config file (defaults to the platform config dir)"
    )]
    pub config_file: Option<PathBuf>,

    #[arg(long, short = 'v', help = "Enable debug logging to stderr")]
    pub verbose: bool,

    #[arg(long, help = "Write rolling logs under this directory instead of stderr only")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigOverrides {
    #[arg(long, help = "Address to listen on, e.g. 127.0.0.1:2300")]
    pub listen_addr: Option<String>,

    #[arg(long, help = "Terminal/stream render width in columns")]
    pub render_width: Option<usize>,

    #[arg(long, help = "Door session idle timeout in seconds")]
    pub door_idle_timeout_secs: Option<u64>,

    #[arg(long, help = "AI completion retry attempts after the first try")]
    pub ai_retry_attempts: Option<usize>,

    #[arg(long, help = "Delay between AI completion retries, in milliseconds")]
    pub ai_retry_delay_ms: Option<u64>,

    #[arg(long, help = "HTTP endpoint for the AI completion provider")]
    pub ai_endpoint: Option<String>,

    #[arg(long, help = "Per-client notification subscription cap")]
    pub broker_subscription_cap: Option<usize>,

    #[arg(long, help = "Broker heartbeat interval in seconds")]
    pub heartbeat_interval_secs: Option<u64>,
}

/// Fully resolved settings the binary runs with, after merging defaults,
/// the TOML file, and CLI flags (later layers win).
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSettings {
    pub listen_addr: String,
    pub render_width: usize,
    pub door_idle_timeout_secs: u64,
    pub ai_retry_attempts: usize,
    pub ai_retry_delay_ms: u64,
    pub ai_endpoint: String,
    pub broker_subscription_cap: usize,
    pub heartbeat_interval_secs: u64,
}

impl BoardSettings {
    /// Built-in defaults (spec §6.2 width default of 80; §5 rate-limit
    /// defaults; §4.F retry default of 2).
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            listen_addr: "127.0.0.1:2300".to_string(),
            render_width: 80,
            door_idle_timeout_secs: 300,
            ai_retry_attempts: 2,
            ai_retry_delay_ms: 500,
            ai_endpoint: "http://localhost:11434/api/generate".to_string(),
            broker_subscription_cap: board_core::broker::PER_CLIENT_SUBSCRIPTION_CAP,
            heartbeat_interval_secs: board_core::broker::HEARTBEAT_INTERVAL_SECS,
        }
    }

    fn apply_file(mut self, file: ConfigFile) -> Self {
        if let Some(v) = file.listen_addr {
            self.listen_addr = v;
        }
        if let Some(v) = file.render_width {
            self.render_width = v;
        }
        if let Some(v) = file.door_idle_timeout_secs {
            self.door_idle_timeout_secs = v;
        }
        if let Some(v) = file.ai_retry_attempts {
            self.ai_retry_attempts = v;
        }
        if let Some(v) = file.ai_retry_delay_ms {
            self.ai_retry_delay_ms = v;
        }
        if let Some(v) = file.ai_endpoint {
            self.ai_endpoint = v;
        }
        if let Some(v) = file.broker_subscription_cap {
            self.broker_subscription_cap = v;
        }
        if let Some(v) = file.heartbeat_interval_secs {
            self.heartbeat_interval_secs = v;
        }
        self
    }

    fn apply_cli(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(v) = &overrides.listen_addr {
            self.listen_addr = v.clone();
        }
        if let Some(v) = overrides.render_width {
            self.render_width = v;
        }
        if let Some(v) = overrides.door_idle_timeout_secs {
            self.door_idle_timeout_secs = v;
        }
        if let Some(v) = overrides.ai_retry_attempts {
            self.ai_retry_attempts = v;
        }
        if let Some(v) = overrides.ai_retry_delay_ms {
            self.ai_retry_delay_ms = v;
        }
        if let Some(v) = &overrides.ai_endpoint {
            self.ai_endpoint = v.clone();
        }
        if let Some(v) = overrides.broker_subscription_cap {
            self.broker_subscription_cap = v;
        }
        if let Some(v) = overrides.heartbeat_interval_secs {
            self.heartbeat_interval_secs = v;
        }
        self
    }

    /// Loads the TOML file named by `config_file`, or the platform default
    /// path if unset, then layers `overrides` on top. A missing file is
    /// not an error — it just means every value falls through to
    /// [`Self::defaults`].
    pub fn load(config_file: Option<&PathBuf>, overrides: &ConfigOverrides) -> Result<Self, BoarddError> {
        let path = config_file.cloned().or_else(try_get_config_file_path);

        let file = match path {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| BoarddError::Config(format!("reading {}: {e}", path.display())))?;
                toml::from_str(&text)
                    .map_err(|e| BoarddError::Config(format!("parsing {}: {e}", path.display())))?
            }
            _ => ConfigFile::default(),
        };

        Ok(Self::defaults().apply_file(file).apply_cli(overrides))
    }
}
