use chrono::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use quiz_core::Moment;

//
// ─── COUNTDOWN ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Idle,
    Running {
        started_at: Moment,
        budget: Duration,
    },
    Expired {
        budget: Duration,
    },
    Stopped {
        elapsed: Duration,
        budget: Duration,
    },
}

/// Result of recomputing a running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining: Duration },
    /// Reported once, on the tick where the budget runs out.
    Expired,
    /// The timer is idle, stopped, or already reported expiry.
    Inactive,
}

/// Per-subject countdown driven by explicit `now` values.
///
/// The timer never reads a clock itself; callers pass the `Moment` from
/// their `Clock` so fixed clocks can drive it in tests. Elapsed time is taken
/// from the monotonic reading only, so wall clock adjustments cannot extend
/// or shorten the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectTimer {
    state: TimerState,
}

impl Default for SubjectTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectTimer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
        }
    }

    /// Begin counting down `budget` from `now`, replacing any previous run.
    pub fn start(&mut self, now: Moment, budget: Duration) {
        self.state = TimerState::Running {
            started_at: now,
            budget,
        };
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self.state, TimerState::Expired { .. })
    }

    /// Time left at `now`, never negative. Zero when idle.
    #[must_use]
    pub fn remaining(&self, now: Moment) -> Duration {
        match self.state {
            TimerState::Idle | TimerState::Expired { .. } => Duration::zero(),
            TimerState::Running { started_at, budget } => {
                (budget - now.since(started_at)).max(Duration::zero())
            }
            TimerState::Stopped { elapsed, budget } => (budget - elapsed).max(Duration::zero()),
        }
    }

    pub fn tick(&mut self, now: Moment) -> TickOutcome {
        let TimerState::Running { budget, .. } = self.state else {
            return TickOutcome::Inactive;
        };
        let remaining = self.remaining(now);
        if remaining > Duration::zero() {
            return TickOutcome::Running { remaining };
        }
        self.state = TimerState::Expired { budget };
        TickOutcome::Expired
    }

    /// Stop the timer and return the time used, capped at the budget.
    ///
    /// Stopping an expired timer returns exactly the budget. Stopping twice
    /// returns the first result again.
    pub fn stop(&mut self, now: Moment) -> Duration {
        let (elapsed, budget) = match self.state {
            TimerState::Idle => (Duration::zero(), Duration::zero()),
            TimerState::Running { started_at, budget } => {
                (now.since(started_at).min(budget), budget)
            }
            TimerState::Expired { budget } => (budget, budget),
            TimerState::Stopped { elapsed, budget } => (elapsed, budget),
        };
        self.state = TimerState::Stopped { elapsed, budget };
        elapsed
    }
}

//
// ─── TICK SCHEDULER ────────────────────────────────────────────────────────────
//

/// A scheduler tick, tagged with the timer generation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub generation: u64,
}

/// Background task sending one `TimerTick` per period.
///
/// Dropping or stopping the handle aborts the task, so no tick is sent after
/// it is gone.
#[derive(Debug)]
pub struct TickHandle {
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Spawn the tick task on the current Tokio runtime.
    ///
    /// The first tick is sent one `period` after spawning.
    #[must_use]
    pub fn spawn(
        generation: u64,
        period: std::time::Duration,
        sender: UnboundedSender<TimerTick>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sender.send(TimerTick { generation }).is_err() {
                    break;
                }
            }
        });
        Self { task }
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_moment;
    use tokio::sync::mpsc;

    const BUDGET_MS: i64 = 300_000;

    fn budget() -> Duration {
        Duration::milliseconds(BUDGET_MS)
    }

    #[test]
    fn counts_down_and_expires_exactly_once() {
        let start = fixed_moment();
        let mut timer = SubjectTimer::new();
        timer.start(start, budget());

        assert_eq!(
            timer.tick(start + Duration::seconds(1)),
            TickOutcome::Running {
                remaining: Duration::milliseconds(BUDGET_MS - 1_000)
            }
        );

        let mut expiries = 0;
        for second in 2..=310 {
            let now = start + Duration::seconds(second);
            if timer.tick(now) == TickOutcome::Expired {
                expiries += 1;
                assert_eq!(timer.remaining(now), Duration::zero());
            }
        }
        assert_eq!(expiries, 1);
        assert!(timer.is_expired());
        assert_eq!(timer.stop(start + Duration::seconds(400)), budget());
    }

    #[test]
    fn stop_caps_elapsed_at_budget() {
        let start = fixed_moment();
        let mut timer = SubjectTimer::new();
        timer.start(start, budget());
        assert_eq!(timer.stop(start + Duration::minutes(9)), budget());
    }

    #[test]
    fn stop_before_expiry_returns_elapsed_and_freezes() {
        let start = fixed_moment();
        let mut timer = SubjectTimer::new();
        timer.start(start, budget());

        let elapsed = timer.stop(start + Duration::seconds(90));
        assert_eq!(elapsed, Duration::seconds(90));
        assert_eq!(timer.remaining(start + Duration::hours(1)), Duration::seconds(210));
        assert_eq!(timer.tick(start + Duration::hours(1)), TickOutcome::Inactive);
        assert_eq!(timer.stop(start + Duration::hours(1)), elapsed);
    }

    #[test]
    fn clock_stepping_backwards_counts_as_no_time() {
        let start = fixed_moment();
        let mut timer = SubjectTimer::new();
        timer.start(start, budget());
        assert_eq!(timer.remaining(start + -Duration::seconds(30)), budget());
    }

    #[test]
    fn idle_timer_is_inactive() {
        let mut timer = SubjectTimer::new();
        assert_eq!(timer.tick(fixed_moment()), TickOutcome::Inactive);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_emits_one_tick_per_period_and_none_after_stop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = TickHandle::spawn(4, std::time::Duration::from_secs(1), tx.clone());

        tokio::time::sleep(std::time::Duration::from_millis(3_500)).await;
        let mut received = Vec::new();
        while let Ok(tick) = rx.try_recv() {
            received.push(tick);
        }
        assert_eq!(received, vec![TimerTick { generation: 4 }; 3]);

        handle.stop();
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_the_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = TickHandle::spawn(1, std::time::Duration::from_secs(1), tx.clone());
        drop(handle);

        tokio::time::sleep(std::time::Duration::from_secs(3)).await;
        assert!(rx.try_recv().is_err());
    }
}
