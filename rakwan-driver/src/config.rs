//! Driver tuning

use embassy_time::Duration;
use rakwan_core::config::DriverTimings;

/// Transaction channel capacity in bytes
pub const CHANNEL_CAPACITY: usize = 512;

/// Timing knobs for the engine and ingestion loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Ingestion delay when the UART has nothing to read
    pub poll_interval: Duration,
    /// Bounded wait for the exclusivity lock
    pub lock_timeout: Duration,
    /// Per-read wait on the transaction channel
    pub read_timeout: Duration,
    /// Ingestion retry delay while the channel is full
    pub backoff: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::from(&DriverTimings::default())
    }
}

impl From<&DriverTimings> for DriverConfig {
    fn from(t: &DriverTimings) -> Self {
        Self {
            poll_interval: Duration::from_millis(t.poll_interval_ms as u64),
            lock_timeout: Duration::from_millis(t.lock_timeout_ms as u64),
            read_timeout: Duration::from_millis(t.read_timeout_ms as u64),
            backoff: Duration::from_millis(t.backoff_ms as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let config = DriverConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(10));
        assert_eq!(config.lock_timeout, Duration::from_millis(1000));
        assert_eq!(config.read_timeout, Duration::from_millis(100));
    }
}
