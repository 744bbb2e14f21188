// Runtime configuration. Values come from the environment first and can be
// overridden by command-line flags (see `cli::Args::apply_to`).

use crate::archive::ArchiveNaming;
use std::time::Duration;

pub const DEFAULT_UPLOAD_URL: &str = "https://transfer.sh/";

/// How long transfer.sh keeps uploads. Only used to display a date.
pub const RETENTION_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub upload_url: String,
    /// No timeout unless one is configured.
    pub timeout: Option<Duration>,
    pub retention_days: i64,
    pub naming: ArchiveNaming,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            timeout: None,
            retention_days: RETENTION_DAYS,
            naming: ArchiveNaming::Minute,
        }
    }
}

impl Config {
    /// Build a config from `TRANSFER_URL` and `TRANSFER_TIMEOUT` (seconds),
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(url) = lookup("TRANSFER_URL").filter(|u| !u.trim().is_empty()) {
            config.upload_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("TRANSFER_TIMEOUT") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Some(Duration::from_secs(secs)),
                _ => log::warn!("ignoring TRANSFER_TIMEOUT={raw:?}, expected a positive number of seconds"),
            }
        }
        config
    }
}
