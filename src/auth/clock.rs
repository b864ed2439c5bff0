//! Timestamp source for request signing.
//!
//! Every signed request carries a `CB-ACCESS-TIMESTAMP` in whole seconds since
//! the UNIX epoch. The exchange rejects timestamps too far from its own clock,
//! so the source is injectable for tests and for callers correcting skew.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for providing request timestamps.
pub trait Clock: Send + Sync {
    /// Seconds since the UNIX epoch, truncated.
    fn unix_seconds(&self) -> u64;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn unix_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// A clock frozen at a settable instant.
///
/// Useful in tests and for signing with a server-provided timestamp.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicU64,
}

impl FixedClock {
    /// Create a clock reporting `unix_seconds`.
    pub fn new(unix_seconds: u64) -> Self {
        Self {
            now: AtomicU64::new(unix_seconds),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, unix_seconds: u64) {
        self.now.store(unix_seconds, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn unix_seconds(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_truncates_to_seconds() {
        let before = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        let now = SystemClock::new().unix_seconds();
        let after = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        assert!(before <= now && now <= after);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(1_700_000_000);
        assert_eq!(clock.unix_seconds(), 1_700_000_000);
        clock.set(1_700_000_042);
        assert_eq!(clock.unix_seconds(), 1_700_000_042);
    }
}
