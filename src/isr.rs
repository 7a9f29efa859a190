//! Interrupt-context producers.
//!
//! Each registration record binds its fixed context (line identifier, alarm
//! schedule) and a queue reference at registration time. The platform layer
//! passes a pointer to the record as the ISR argument and calls `fire`.
//!
//! # Rules
//!
//! - No allocation, no logging, no blocking
//! - One non-blocking send per firing, drop on full

use crate::alarm::{AlarmEvent, AlarmSchedule, ScheduleError, TimerSample};
use crate::led::EdgeEvent;
use crate::queue::{Handoff, IsrSend};

/// Registration record for one monitored input line.
pub struct EdgeSource<'q, Q> {
    queue: &'q Q,
    event: EdgeEvent,
}

impl<'q, Q: Handoff<EdgeEvent>> EdgeSource<'q, Q> {
    pub fn new(queue: &'q Q, gpio: u32) -> Self {
        Self {
            queue,
            event: EdgeEvent::new(gpio),
        }
    }

    /// ISR body: hand the bound line identifier to the LED task.
    ///
    /// Returns `false` if the event was dropped.
    #[inline]
    pub fn fire(&self) -> bool {
        self.queue.try_send(self.event)
    }

    pub fn gpio(&self) -> u32 {
        self.event.gpio
    }
}

/// What one alarm firing did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlarmFiring {
    /// Threshold programmed for the next firing.
    pub next: u64,
    /// The sample send woke the clock task; the callback should ask for a
    /// yield on exit.
    pub woken: bool,
}

/// Registration record for the periodic alarm.
pub struct AlarmSource<'q, Q> {
    queue: &'q Q,
    schedule: AlarmSchedule,
}

impl<'q, Q: Handoff<TimerSample>> AlarmSource<'q, Q> {
    pub fn new(queue: &'q Q, period_ticks: u64) -> Self {
        Self {
            queue,
            schedule: AlarmSchedule::new(period_ticks),
        }
    }

    /// Alarm callback body: capture, hand off, re-arm.
    ///
    /// `program` writes the next threshold to the timer. Its failure is not
    /// acted on; the schedule still advances.
    pub fn fire<F, E>(&mut self, event: AlarmEvent, program: F) -> Result<AlarmFiring, ScheduleError>
    where
        F: FnOnce(u64) -> Result<(), E>,
    {
        let sample = self.schedule.fire(event.count)?;
        let IsrSend { woken, .. } = self.queue.try_send_from_isr(sample);

        let next = self.schedule.rearm(event.alarm_value)?;
        let _ = program(next);
        self.schedule.commit()?;

        Ok(AlarmFiring { next, woken })
    }

    /// Threshold the first alarm must be configured with.
    pub fn first_threshold(&self) -> u64 {
        self.schedule.threshold()
    }

    pub fn schedule(&self) -> &AlarmSchedule {
        &self.schedule
    }
}
