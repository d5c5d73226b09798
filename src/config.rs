//! Scheduler Configuration
//!
//! Tunables for host selection and load probing, with environment variable overrides.

use std::time::Duration;

/// Host selection settings
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Maximum outstanding load queries per search (env: SCHED_CONCURRENCY)
    pub concurrency: usize,

    /// Probing stops once `desired * enough_rate` semi-idle hosts answered (env: SCHED_ENOUGH_RATE)
    pub enough_rate: usize,

    /// Load average at or below which a host counts as idle
    pub idle_load: f32,

    /// Load average at or below which a host counts as semi-idle
    pub semi_idle_load: f32,

    /// Shuffle matching candidates before probing (env: SCHED_SHUFFLE)
    pub shuffle_candidates: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            enough_rate: 4,
            idle_load: 0.1,
            semi_idle_load: 0.5,
            shuffle_candidates: false,
        }
    }
}

impl SchedulerConfig {
    /// Create configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("SCHED_CONCURRENCY")
            && let Ok(parsed) = value.parse::<usize>()
            && parsed > 0
        {
            config.concurrency = parsed;
        }

        if let Ok(value) = std::env::var("SCHED_ENOUGH_RATE")
            && let Ok(parsed) = value.parse::<usize>()
            && parsed > 0
        {
            config.enough_rate = parsed;
        }

        if let Ok(value) = std::env::var("SCHED_SHUFFLE") {
            config.shuffle_candidates = matches!(value.as_str(), "1" | "true" | "yes");
        }

        config
    }
}

/// Load query transport settings
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Default UDP port of storage-node load responders (env: LOAD_PROBE_PORT)
    pub port: u16,

    /// Wait per query attempt (env: LOAD_PROBE_TIMEOUT_MS)
    pub timeout: Duration,

    /// Query attempts before a host is reported as unreachable
    pub attempts: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            port: 600,
            timeout: Duration::from_secs(1),
            attempts: 3,
        }
    }
}

impl ProbeConfig {
    /// Create configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("LOAD_PROBE_PORT")
            && let Ok(parsed) = value.parse::<u16>()
        {
            config.port = parsed;
        }

        if let Ok(value) = std::env::var("LOAD_PROBE_TIMEOUT_MS")
            && let Ok(parsed) = value.parse::<u64>()
        {
            config.timeout = Duration::from_millis(parsed);
        }

        config
    }
}
