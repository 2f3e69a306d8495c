use std::ops::Add;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};

/// A wall-clock reading paired with a monotonic instant.
///
/// Timestamps come from the wall reading. Durations come from the monotonic
/// one, so adjusting the system time never changes how much time has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    wall: DateTime<Utc>,
    mono: Instant,
}

impl Moment {
    #[must_use]
    pub fn new(wall: DateTime<Utc>, mono: Instant) -> Self {
        Self { wall, mono }
    }

    #[must_use]
    pub fn wall(&self) -> DateTime<Utc> {
        self.wall
    }

    #[must_use]
    pub fn mono(&self) -> Instant {
        self.mono
    }

    /// Monotonic time from `earlier` to `self`, never negative.
    #[must_use]
    pub fn since(&self, earlier: Moment) -> Duration {
        let span = self.mono.saturating_duration_since(earlier.mono);
        Duration::from_std(span).unwrap_or(Duration::MAX)
    }

    /// The same instant with only the wall reading moved by `delta`.
    #[must_use]
    pub fn with_wall_shifted(self, delta: Duration) -> Self {
        Self {
            wall: self.wall + delta,
            mono: self.mono,
        }
    }
}

impl Add<Duration> for Moment {
    type Output = Moment;

    fn add(self, delta: Duration) -> Moment {
        Moment {
            wall: self.wall + delta,
            mono: shift_instant(self.mono, delta),
        }
    }
}

fn shift_instant(instant: Instant, delta: Duration) -> Instant {
    match delta.to_std() {
        Ok(forward) => instant.checked_add(forward).unwrap_or(instant),
        Err(_) => (-delta)
            .to_std()
            .ok()
            .and_then(|back| instant.checked_sub(back))
            .unwrap_or(instant),
    }
}

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(Moment),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(Moment::new(at, Instant::now()))
    }

    /// Returns the current wall time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.moment().wall()
    }

    /// Returns both the wall and the monotonic reading.
    #[must_use]
    pub fn moment(&self) -> Moment {
        match self {
            Clock::Default => Moment::new(Utc::now(), Instant::now()),
            Clock::Fixed(m) => *m,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(m) = self {
            *m = *m + delta;
        }
    }

    /// If this is a fixed clock, move only its wall reading, the way a
    /// system time adjustment would. Monotonic time is unaffected.
    pub fn adjust_wall(&mut self, delta: Duration) {
        if let Clock::Fixed(m) = self {
            *m = m.with_wall_shifted(delta);
        }
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Formats a duration as `MM:SS`, truncating partial seconds.
///
/// Minutes are not wrapped, so 75 minutes renders as `75:00`.
#[must_use]
pub fn format_clock(duration: Duration) -> String {
    let total_secs = duration.num_seconds().max(0);
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

/// Returns a `Moment` whose wall reading is the deterministic test timestamp.
#[must_use]
pub fn fixed_moment() -> Moment {
    fixed_clock().moment()
}
