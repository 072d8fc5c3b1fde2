//! Cache configuration

use std::str::FromStr;

use crate::clock::{Clock, LocalClock, UtcClock};
use crate::error::{Error, Result};
use crate::key::KeyPolicy;

/// Environment variable selecting the [`KeyPolicy`] (`identity` | `args`)
pub const ENV_KEY_POLICY: &str = "DAYCACHE_KEY_POLICY";

/// Environment variable selecting the [`TimeZone`] (`local` | `utc`)
pub const ENV_TIME_ZONE: &str = "DAYCACHE_TIME_ZONE";

/// Environment variable enabling miss de-duplication (`true` | `false`)
pub const ENV_DEDUPE_MISSES: &str = "DAYCACHE_DEDUPE_MISSES";

/// Time zone in which calendar days are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZone {
    /// Process local time zone
    #[default]
    Local,
    /// UTC
    Utc,
}

impl TimeZone {
    /// System clock for this time zone
    pub fn clock(self) -> Box<dyn Clock> {
        match self {
            TimeZone::Local => Box::new(LocalClock),
            TimeZone::Utc => Box::new(UtcClock),
        }
    }
}

impl FromStr for TimeZone {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(TimeZone::Local),
            "utc" => Ok(TimeZone::Utc),
            _ => Err(Error::InvalidConfig {
                var: "time zone".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Settings for a [`DayCache`](crate::DayCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheConfig {
    key_policy: KeyPolicy,
    time_zone: TimeZone,
    dedupe_misses: bool,
}

impl CacheConfig {
    /// Defaults: identity-only keys, local time, no miss de-duplication
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `DAYCACHE_*` environment variables; unset ones keep defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` in place of the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_KEY_POLICY) {
            config.key_policy = parse_var(ENV_KEY_POLICY, &value)?;
        }
        if let Some(value) = lookup(ENV_TIME_ZONE) {
            config.time_zone = parse_var(ENV_TIME_ZONE, &value)?;
        }
        if let Some(value) = lookup(ENV_DEDUPE_MISSES) {
            config.dedupe_misses = parse_flag(ENV_DEDUPE_MISSES, &value)?;
        }

        Ok(config)
    }

    /// Set the key policy
    pub fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }

    /// Set the time zone used for date-stamps
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Hold the store lock while computing, so concurrent misses on one
    /// key compute once
    ///
    /// The lock is the whole cache's: while any computation runs, all other
    /// access (hits on unrelated identities, `len`, `keys`) waits for it.
    pub fn with_dedupe_misses(mut self, dedupe_misses: bool) -> Self {
        self.dedupe_misses = dedupe_misses;
        self
    }

    /// Key policy
    pub fn key_policy(&self) -> KeyPolicy {
        self.key_policy
    }

    /// Time zone used for date-stamps
    pub fn time_zone(&self) -> TimeZone {
        self.time_zone
    }

    /// Whether concurrent misses are de-duplicated
    pub fn dedupe_misses(&self) -> bool {
        self.dedupe_misses
    }
}

fn parse_var<T: FromStr>(var: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::InvalidConfig {
        var: var.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidConfig {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}
