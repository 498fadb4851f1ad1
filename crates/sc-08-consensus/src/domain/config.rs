//! Fork-choice configuration

use std::time::Duration;

/// Operational limits for the fork registry and its sweeper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkChoiceConfig {
    /// Maximum forks held at once
    pub max_forks: usize,
    /// Announced forks older than this are evicted
    pub announced_fork_ttl: Duration,
    /// Announced forks nobody re-announced for this long are evicted
    pub announce_idle_timeout: Duration,
    /// Downloading forks with no appended block for this long are evicted
    pub download_stall_timeout: Duration,
    /// Sweeper period
    pub sweep_interval: Duration,
}

impl Default for ForkChoiceConfig {
    fn default() -> Self {
        Self {
            max_forks: 256,
            announced_fork_ttl: Duration::from_secs(120),
            announce_idle_timeout: Duration::from_secs(30),
            download_stall_timeout: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(10),
        }
    }
}

impl ForkChoiceConfig {
    /// Defaults overridden from `SC_*` environment variables.
    ///
    /// Unparseable or zero values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(max) = env_u64("SC_MAX_FORKS") {
            config.max_forks = max as usize;
        }
        if let Some(secs) = env_u64("SC_ANNOUNCED_FORK_TTL_SECS") {
            config.announced_fork_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("SC_ANNOUNCE_IDLE_TIMEOUT_SECS") {
            config.announce_idle_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("SC_DOWNLOAD_STALL_TIMEOUT_SECS") {
            config.download_stall_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("SC_SWEEP_INTERVAL_SECS") {
            config.sweep_interval = Duration::from_secs(secs);
        }

        config
    }

    pub fn with_max_forks(mut self, max: usize) -> Self {
        self.max_forks = max;
        self
    }

    pub fn with_announced_fork_ttl(mut self, ttl: Duration) -> Self {
        self.announced_fork_ttl = ttl;
        self
    }

    pub fn with_announce_idle_timeout(mut self, timeout: Duration) -> Self {
        self.announce_idle_timeout = timeout;
        self
    }

    pub fn with_download_stall_timeout(mut self, timeout: Duration) -> Self {
        self.download_stall_timeout = timeout;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid configuration override");
            None
        }
        Ok(value) => Some(value),
    }
}
