//! Auto-advance scheduling.
//!
//! [`CycleTimer`] is a repeating deadline keyed by a generation handle, so a
//! firing that raced with a clear or a re-arm can be recognised and dropped.
//! [`CycleScheduler`] layers the Stopped/Running/Halted state machine and the
//! hover pause on top of it. Neither owns a task: the controller sleeps until
//! [`CycleScheduler::next_deadline`] and reports the firing back.

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::config::{Direction, SliderConfig};

/// Identifies one arming of a [`CycleTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
    handle: TimerHandle,
    period: Duration,
    deadline: Instant,
}

/// Repeating timer with explicit, handle-checked cancellation.
#[derive(Debug, Default)]
pub struct CycleTimer {
    generation: u64,
    armed: Option<ArmedTimer>,
}

impl CycleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a new period, replacing any previous arming.
    pub fn arm(&mut self, period: Duration, now: Instant) -> TimerHandle {
        self.generation += 1;
        let handle = TimerHandle(self.generation);
        self.armed = Some(ArmedTimer {
            handle,
            period,
            deadline: now + period,
        });
        handle
    }

    pub fn clear(&mut self) -> Option<TimerHandle> {
        self.armed.take().map(|armed| armed.handle)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn is_current(&self, handle: TimerHandle) -> bool {
        self.armed.is_some_and(|armed| armed.handle == handle)
    }

    pub fn deadline(&self) -> Option<(TimerHandle, Instant)> {
        self.armed.map(|armed| (armed.handle, armed.deadline))
    }

    /// Accept a firing for `handle` and schedule the next one. A host that
    /// stalled past the following deadline gets one tick, then a full period,
    /// never a burst. Returns `false` for stale handles.
    pub fn fire(&mut self, handle: TimerHandle, now: Instant) -> bool {
        match self.armed.as_mut() {
            Some(armed) if armed.handle == handle => {
                let next = armed.deadline + armed.period;
                armed.deadline =
                    if next <= now { now + armed.period } else { next };
                true
            }
            _ => false,
        }
    }
}

/// Lifecycle of the auto-advance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timer armed. A later start may arm one.
    Stopped,
    /// Timer armed.
    Running {
        /// Direction each accepted firing advances in.
        direction: Direction,
    },
    /// Torn down. No further arming is possible.
    Halted,
}

/// Cycle state machine over a [`CycleTimer`], including the hover pause.
#[derive(Debug)]
pub struct CycleScheduler {
    timer: CycleTimer,
    state: SchedulerState,
    hover_paused: bool,
}

impl Default for CycleScheduler {
    fn default() -> Self {
        Self {
            timer: CycleTimer::new(),
            state: SchedulerState::Stopped,
            hover_paused: false,
        }
    }
}

impl CycleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    pub fn is_hover_paused(&self) -> bool {
        self.hover_paused
    }

    pub fn next_deadline(&self) -> Option<(TimerHandle, Instant)> {
        self.timer.deadline()
    }

    /// (Re)start the cycle. Any live timer is cleared first; a new one is
    /// armed only when cycling is enabled and possible. While a hover pause
    /// is in effect the scheduler stays stopped and the matching
    /// [`hover_leave`](Self::hover_leave) arms it instead.
    pub fn start(
        &mut self,
        direction: Direction,
        config: &SliderConfig,
        possible_to_cycle: bool,
        now: Instant,
    ) -> SchedulerState {
        if self.state == SchedulerState::Halted {
            return self.state;
        }
        self.timer.clear();

        if self.hover_paused {
            if config.is_pause_by_hover {
                trace!(?direction, "cycle start held by hover pause");
                self.state = SchedulerState::Stopped;
                return self.state;
            }
            self.hover_paused = false;
        }

        if config.is_cycling && possible_to_cycle && config.interval_ms > 0 {
            let period = Duration::from_millis(config.interval_ms);
            let handle = self.timer.arm(period, now);
            trace!(
                ?handle,
                ?direction,
                interval_ms = config.interval_ms,
                "cycle timer armed"
            );
            self.state = SchedulerState::Running { direction };
        } else {
            self.state = SchedulerState::Stopped;
        }
        self.state
    }

    /// Clear the timer without forgetting anything else.
    pub fn pause(&mut self) {
        if self.state == SchedulerState::Halted {
            return;
        }
        if let Some(handle) = self.timer.clear() {
            trace!(?handle, "cycle timer cleared");
        }
        self.state = SchedulerState::Stopped;
    }

    /// Pointer entered the viewport. The pause holds until
    /// [`hover_leave`](Self::hover_leave), across any restart in between.
    /// Returns `true` if a running cycle was paused.
    pub fn hover_enter(&mut self, config: &SliderConfig) -> bool {
        if !config.is_pause_by_hover || self.state == SchedulerState::Halted {
            return false;
        }
        self.hover_paused = true;
        if !self.is_running() {
            return false;
        }
        self.pause();
        true
    }

    /// Pointer left the viewport. Resumes with the configured direction only
    /// if a matching [`hover_enter`](Self::hover_enter) is holding the cycle.
    /// Returns `true` if a hover pause was released.
    pub fn hover_leave(
        &mut self,
        config: &SliderConfig,
        possible_to_cycle: bool,
        now: Instant,
    ) -> bool {
        if !self.hover_paused {
            return false;
        }
        self.hover_paused = false;
        self.start(config.direction, config, possible_to_cycle, now);
        true
    }

    /// Validate a firing. Returns the direction to advance in, or `None` if
    /// the handle is stale or the scheduler is not running.
    pub fn accept_tick(
        &mut self,
        handle: TimerHandle,
        now: Instant,
    ) -> Option<Direction> {
        let SchedulerState::Running { direction } = self.state else {
            return None;
        };
        if !self.timer.fire(handle, now) {
            trace!(?handle, "ignoring stale cycle tick");
            return None;
        }
        Some(direction)
    }

    /// Terminal teardown.
    pub fn stop(&mut self) {
        self.timer.clear();
        self.hover_paused = false;
        self.state = SchedulerState::Halted;
    }
}
