//! Clock abstraction and timestamp formatting.
//!
//! Record timestamps, health responses and notification headers all read
//! the time through `Clock`, so tests can pin it with `TestClock`.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, Local, SecondsFormat};

/// Clock abstraction for time operations.
///
/// Production code uses `RealClock`, tests inject `TestClock`.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current system time for timestamps.
    fn now_system(&self) -> SystemTime;
}

/// Real clock implementation using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl Clock for RealClock {
    fn now_system(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl RealClock {
    /// Creates a new real clock instance.
    pub fn new() -> Self {
        Self
    }
}

/// Test clock for deterministic time control.
///
/// Clones share the same time, so a clock handed to the service can be
/// advanced from the test.
#[derive(Debug, Clone)]
pub struct TestClock {
    /// System time as nanoseconds since UNIX_EPOCH
    system_ns: Arc<AtomicU64>,
}

impl TestClock {
    /// Creates a new test clock starting at current time.
    pub fn new() -> Self {
        Self::with_start_time(SystemTime::now())
    }

    /// Creates a test clock starting at a specific time.
    pub fn with_start_time(start: SystemTime) -> Self {
        Self { system_ns: Arc::new(AtomicU64::new(nanos_since_epoch(start))) }
    }

    /// Advances the clock by the specified duration.
    pub fn advance(&self, duration: Duration) {
        let duration_ns = u64::try_from(duration.as_nanos().min(u128::from(u64::MAX))).unwrap_or(0);

        self.system_ns.fetch_add(duration_ns, Ordering::AcqRel);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now_system(&self) -> SystemTime {
        let ns = self.system_ns.load(Ordering::Acquire);
        UNIX_EPOCH + Duration::from_nanos(ns)
    }
}

fn nanos_since_epoch(time: SystemTime) -> u64 {
    let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(since_epoch.as_nanos().min(u128::from(u64::MAX))).unwrap_or(0)
}

/// Formats `time` as an ISO-8601 local timestamp with offset and
/// microseconds, e.g. `2026-10-19T09:30:00.000000+02:00`.
pub fn iso_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time).to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Formats `time` as a 12-hour wall clock reading, e.g. `09:30 AM`.
pub fn wall_clock(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Timelike};

    use super::*;

    #[test]
    fn test_clock_advances() {
        let clock = TestClock::new();
        let start = clock.now_system();

        clock.advance(Duration::from_secs(60));

        assert_eq!(clock.now_system().duration_since(start).unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn clones_share_time() {
        let clock = TestClock::with_start_time(UNIX_EPOCH + Duration::from_secs(2000));
        let handle = clock.clone();

        clock.advance(Duration::from_secs(5));

        assert_eq!(handle.now_system(), UNIX_EPOCH + Duration::from_secs(2005));
    }

    #[test]
    fn iso_timestamp_round_trips_through_rfc3339() {
        let time = UNIX_EPOCH + Duration::from_secs(1_760_866_200);

        let text = iso_timestamp(time);
        let parsed = DateTime::<FixedOffset>::parse_from_rfc3339(&text).unwrap();

        assert_eq!(SystemTime::from(parsed), time);
        assert!(text.contains('.'), "microseconds should be present: {text}");
    }

    #[test]
    fn wall_clock_uses_twelve_hour_format() {
        let time = UNIX_EPOCH + Duration::from_secs(1_760_866_200);
        let local = DateTime::<Local>::from(time);

        let text = wall_clock(time);

        assert_eq!(text.len(), 8);
        assert!(text.ends_with("AM") || text.ends_with("PM"));
        assert_eq!(&text[..2], format!("{:02}", local.hour12().1));
    }
}
