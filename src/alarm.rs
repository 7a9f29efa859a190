//! Software-managed periodic alarm.
//!
//! The gptimer runs with hardware auto-reload disabled, so every firing has to
//! program the next threshold by hand. The callback walks one full cycle of
//! this state machine per firing:
//!
//! ```text
//!            fire(count)           rearm(alarm_value)
//!  Armed ───────────────▶ Fired ─────────────────────▶ Rearmed
//!    ▲                                                    │
//!    └──────────────────── commit() ──────────────────────┘
//! ```
//!
//! The next threshold is `alarm_value + period`, never `count + period`:
//! dispatch latency shows up in the captured count but never in the schedule.

/// Tick count captured when the alarm fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerSample {
    pub ticks: u64,
}

impl TimerSample {
    pub const fn new(ticks: u64) -> Self {
        Self { ticks }
    }
}

/// What the hardware reports on an alarm event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlarmEvent {
    /// Counter value when the callback ran.
    pub count: u64,
    /// Threshold that triggered this firing.
    pub alarm_value: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlarmPhase {
    /// Waiting for the counter to reach `threshold`.
    Armed,
    /// Alarm fired, sample captured, next threshold not yet computed.
    Fired,
    /// Next threshold computed, waiting to be written to the timer.
    Rearmed,
}

/// Out-of-order transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    InvalidTransition { from: AlarmPhase, to: AlarmPhase },
}

/// Alarm threshold bookkeeping, owned by the alarm callback.
#[derive(Clone, Copy, Debug)]
pub struct AlarmSchedule {
    period: u64,
    threshold: u64,
    phase: AlarmPhase,
    firings: u64,
}

impl AlarmSchedule {
    /// Schedule whose first firing is one period after the counter starts.
    pub const fn new(period: u64) -> Self {
        Self {
            period,
            threshold: period,
            phase: AlarmPhase::Armed,
            firings: 0,
        }
    }

    /// Armed → Fired. Captures the sample to hand off.
    pub fn fire(&mut self, count: u64) -> Result<TimerSample, ScheduleError> {
        self.transition(AlarmPhase::Armed, AlarmPhase::Fired)?;
        self.firings += 1;
        Ok(TimerSample::new(count))
    }

    /// Fired → Rearmed. Returns the threshold to program.
    pub fn rearm(&mut self, alarm_value: u64) -> Result<u64, ScheduleError> {
        self.transition(AlarmPhase::Fired, AlarmPhase::Rearmed)?;
        self.threshold = alarm_value.wrapping_add(self.period);
        Ok(self.threshold)
    }

    /// Rearmed → Armed, once the new threshold is in the timer.
    pub fn commit(&mut self) -> Result<(), ScheduleError> {
        self.transition(AlarmPhase::Rearmed, AlarmPhase::Armed)
    }

    fn transition(&mut self, from: AlarmPhase, to: AlarmPhase) -> Result<(), ScheduleError> {
        if self.phase != from {
            return Err(ScheduleError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }

    #[inline]
    pub fn phase(&self) -> AlarmPhase {
        self.phase
    }

    /// Threshold currently armed (or about to be armed).
    #[inline]
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    #[inline]
    pub fn period(&self) -> u64 {
        self.period
    }

    /// Number of firings since start.
    #[inline]
    pub fn firings(&self) -> u64 {
        self.firings
    }
}
