//! Consumer tasks.
//!
//! Each task is a step type (`handle` one item, testable on the host) plus a
//! `run_*` loop that blocks on its queue forever. The loops are what `main`
//! spawns.

use embedded_hal::digital::{PinState, StatefulOutputPin};

use crate::alarm::TimerSample;
use crate::clock::ClockReadout;
use crate::context::ExerciseContext;
use crate::led::{EdgeEvent, EdgeOutcome, InputMap, LedController, LedLevel};
use crate::log_sink::{LogDrain, LogSink};
use crate::logging::{LogStream, TAG_IO, TAG_TMR};
use crate::queue::Handoff;
use crate::{rt_error, rt_info, rt_warn};

/// LED consumer: edge events in, output line driven.
pub struct LedTask<P> {
    controller: LedController,
    led: P,
}

impl<P: StatefulOutputPin> LedTask<P> {
    pub fn new(map: InputMap, led: P) -> Self {
        Self {
            controller: LedController::new(map),
            led,
        }
    }

    /// Handle one edge event: update state, drive the pin, log the level
    /// read back from the pin.
    ///
    /// The pin is driven even when the line is unknown and the state did not
    /// change. A pin failure is logged; the state update stands.
    pub fn handle<const N: usize>(
        &mut self,
        event: EdgeEvent,
        log: &LogStream<N>,
        now_us: i64,
    ) -> EdgeOutcome {
        let outcome = self.controller.handle(event);

        let driven = self
            .led
            .set_state(PinState::from(outcome.level.is_high()))
            .and_then(|()| self.led.is_set_high());

        let level = match driven {
            Ok(high) => LedLevel::from(high),
            Err(_) => {
                rt_error!(log, now_us, TAG_IO, "button {} pressed, LED pin write failed", event.gpio);
                return outcome;
            }
        };

        match outcome.command {
            Some(command) => rt_info!(
                log,
                now_us,
                TAG_IO,
                "button {} pressed, LED {} (level {})",
                event.gpio,
                command.as_str(),
                level.as_u8()
            ),
            None => rt_warn!(
                log,
                now_us,
                TAG_IO,
                "button {} pressed, LED unchanged (level {})",
                event.gpio,
                level.as_u8()
            ),
        };

        outcome
    }

    /// Current output state.
    pub fn level(&self) -> LedLevel {
        self.controller.level()
    }

    pub fn led(&self) -> &P {
        &self.led
    }
}

/// Clock consumer: timer samples in, `HH:MM:SS` logged.
pub struct ClockTask {
    ticks_per_second: u64,
}

impl ClockTask {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            ticks_per_second: u64::from(ticks_per_second),
        }
    }

    pub fn handle<const N: usize>(
        &mut self,
        sample: TimerSample,
        log: &LogStream<N>,
        now_us: i64,
    ) -> ClockReadout {
        let readout = ClockReadout::from_ticks(sample.ticks, self.ticks_per_second);
        rt_info!(log, now_us, TAG_TMR, "clock {}", readout);
        readout
    }
}

/// LED task body. Blocks on the edge queue forever.
pub fn run_led_task<E, T, P>(ctx: &ExerciseContext<'_, E, T>, led: P, now_us: fn() -> i64) -> !
where
    E: Handoff<EdgeEvent>,
    T: Handoff<TimerSample>,
    P: StatefulOutputPin,
{
    let mut task = LedTask::new(ctx.config.input_map(), led);
    loop {
        let event = ctx.edge_queue.recv();
        task.handle(event, ctx.log, now_us());
    }
}

/// Clock task body. Blocks on the timer queue forever.
pub fn run_clock_task<E, T>(ctx: &ExerciseContext<'_, E, T>, now_us: fn() -> i64) -> !
where
    E: Handoff<EdgeEvent>,
    T: Handoff<TimerSample>,
{
    let mut task = ClockTask::new(ctx.config.timer_resolution_hz);
    loop {
        let sample = ctx.timer_queue.recv();
        task.handle(sample, ctx.log, now_us());
    }
}

/// Log drain body. Polls the log stream, `idle` sleeps when nothing was
/// written.
pub fn run_log_drain<E, T, S>(
    ctx: &ExerciseContext<'_, E, T>,
    mut sink: S,
    now_us: fn() -> i64,
    idle: fn(),
) -> !
where
    E: Handoff<EdgeEvent>,
    T: Handoff<TimerSample>,
    S: LogSink,
{
    let mut drain = LogDrain::new(ctx.config.drop_report_interval_us);
    loop {
        if !drain.pass(ctx.log, || ctx.take_drop_counters(), &mut sink, now_us()) {
            idle();
        }
    }
}
