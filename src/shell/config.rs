// Runtime configuration read from the environment.
//
// Keys
// - SUPER_CALENDAR_INTERVAL_SECS: seconds between regeneration runs (default 300).
// - SUPER_CALENDAR_USER_TZ: timezone of the acting user.
// - SUPER_CALENDAR_DEFAULT_TZ: system default timezone.
// - SUPER_CALENDAR_SEED: JSON seed with models, records and configurators.

use anyhow::Context;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub regenerate_interval: Duration,
    pub user_timezone: Option<String>,
    pub default_timezone: Option<String>,
    pub seed_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let interval_secs = match read("SUPER_CALENDAR_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("SUPER_CALENDAR_INTERVAL_SECS is not a number: {raw}"))?,
            None => DEFAULT_INTERVAL_SECS,
        };
        if interval_secs == 0 {
            anyhow::bail!("SUPER_CALENDAR_INTERVAL_SECS must be greater than zero");
        }

        Ok(Self {
            regenerate_interval: Duration::from_secs(interval_secs),
            user_timezone: read("SUPER_CALENDAR_USER_TZ"),
            default_timezone: read("SUPER_CALENDAR_DEFAULT_TZ"),
            seed_path: read("SUPER_CALENDAR_SEED").map(PathBuf::from),
        })
    }
}
