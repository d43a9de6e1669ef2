//! Time source abstraction.
//!
//! The registry never calls `Instant::now()` directly.  It asks a [`Clock`],
//! which in production is [`SystemClock`] and in tests is [`ManualClock`].
//! With a manual clock a test can register a device, jump 31 seconds into
//! the future, and observe the request timeout fire without sleeping.
//!
//! # Why `Instant` and not wall-clock time?
//!
//! `Instant` is monotonic: it never jumps backwards when the system clock is
//! adjusted by NTP or by the user.  All timeouts here are relative ("30
//! seconds after the request"), so a monotonic source is the right fit.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A source of the current monotonic time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Production clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Starts at the instant it was created and advances exclusively through
/// [`ManualClock::advance`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use presence_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(30));
/// assert_eq!(clock.now() - start, Duration::from_secs(30));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Instant>,
}

impl ManualClock {
    /// Creates a manual clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Instant::now()),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_does_not_move_on_its_own() {
        let clock = ManualClock::new();
        let first = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.now(), first);
    }

    #[test]
    fn test_manual_clock_advance_accumulates() {
        // Arrange
        let clock = ManualClock::new();
        let start = clock.now();

        // Act
        clock.advance(Duration::from_secs(10));
        clock.advance(Duration::from_millis(500));

        // Assert
        assert_eq!(clock.now() - start, Duration::from_millis(10_500));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
