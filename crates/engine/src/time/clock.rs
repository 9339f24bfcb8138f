use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Point in time measured from the owning clock's origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const ORIGIN: Timestamp = Timestamp(Duration::ZERO);

    pub const fn from_origin(offset: Duration) -> Self {
        Self(offset)
    }

    pub fn since_origin(self) -> Duration {
        self.0
    }

    /// Time from `earlier` to `self`, zero when `earlier` is in the future.
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    pub fn saturating_add(self, duration: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(duration))
    }
}

pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> Timestamp;

    /// Blocks for `duration`. A zero duration returns immediately.
    fn sleep(&self, duration: Duration);

    fn elapsed_since(&self, earlier: Timestamp) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

/// Monotonic wall clock backed by `Instant` and `thread::sleep`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(Instant::now().saturating_duration_since(self.origin))
    }

    fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        thread::sleep(duration);
    }
}

/// Clock whose time only moves when told to. `sleep` advances the stored
/// time instead of blocking.
#[derive(Debug, Default)]
pub struct FakeClock {
    now: Mutex<Timestamp>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.lock();
        *now = now.saturating_add(duration);
    }

    /// Advances by `seconds`; negative or non-finite values are ignored.
    pub fn advance_seconds(&self, seconds: f64) {
        if let Ok(duration) = Duration::try_from_secs_f64(seconds) {
            self.advance(duration);
        }
    }

    pub fn set(&self, when: Timestamp) {
        *self.lock() = when;
    }

    /// Total time since the clock's origin.
    pub fn elapsed(&self) -> Duration {
        self.lock().since_origin()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Timestamp> {
        // Poisoning only means another holder panicked; the timestamp is still valid.
        self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Timestamp {
        *self.lock()
    }

    fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn fake_clock_starts_at_origin() {
        let clock = FakeClock::new();
        assert_eq!(clock.now(), Timestamp::ORIGIN);
        assert_eq!(clock.elapsed_seconds(), 0.0);
    }

    #[test]
    fn fake_sleep_advances_exactly() {
        let clock = FakeClock::new();
        clock.sleep(Duration::from_millis(16));
        clock.sleep(Duration::from_millis(4));
        assert_eq!(clock.elapsed(), Duration::from_millis(20));
    }

    #[test]
    fn fake_sleep_of_zero_is_a_no_op() {
        let clock = FakeClock::new();
        clock.sleep(Duration::ZERO);
        assert_eq!(clock.now(), Timestamp::ORIGIN);
    }

    #[test]
    fn advance_seconds_ignores_negative_input() {
        let clock = FakeClock::new();
        clock.advance_seconds(1.5);
        clock.advance_seconds(-3.0);
        assert!((clock.elapsed_seconds() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn set_overwrites_and_elapsed_since_saturates() {
        let clock = FakeClock::new();
        clock.advance(Duration::from_secs(5));
        let later = clock.now();
        clock.set(Timestamp::from_origin(Duration::from_secs(2)));

        assert_eq!(clock.elapsed(), Duration::from_secs(2));
        assert_eq!(clock.elapsed_since(later), Duration::ZERO);
    }

    #[test]
    fn fake_clock_can_be_advanced_from_another_thread() {
        let clock = Arc::new(FakeClock::new());
        let remote = Arc::clone(&clock);
        std::thread::spawn(move || remote.advance(Duration::from_secs(3)))
            .join()
            .expect("advance thread");
        assert_eq!(clock.elapsed(), Duration::from_secs(3));
    }

    #[test]
    fn system_clock_is_monotonic_and_sleeps() {
        let clock = SystemClock::new();
        let start = clock.now();
        clock.sleep(Duration::from_millis(5));
        let elapsed = clock.elapsed_since(start);
        assert!(elapsed >= Duration::from_millis(5));
        assert!(clock.now() >= start);
    }
}
