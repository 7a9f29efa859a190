//! General-purpose timer with a software re-armed alarm.

use alloc::boxed::Box;
use core::ffi::c_void;

use esp_idf_svc::sys::{self, esp};

use crate::alarm::{AlarmEvent, TimerSample};
use crate::config::ExerciseConfig;
use crate::error::SetupError;
use crate::isr::AlarmSource;
use crate::queue::Handoff;

/// Create, arm, enable and start the gptimer.
///
/// Hardware auto-reload stays off; `alarm_isr` programs every next threshold.
/// Every failure here is fatal.
pub fn start_alarm<Q>(config: &ExerciseConfig, queue: &'static Q) -> Result<(), SetupError>
where
    Q: Handoff<TimerSample> + Sync + 'static,
{
    let timer_config = sys::gptimer_config_t {
        clk_src: sys::soc_periph_gptimer_clk_src_t_GPTIMER_CLK_SRC_DEFAULT,
        direction: sys::gptimer_count_direction_t_GPTIMER_COUNT_UP,
        resolution_hz: config.timer_resolution_hz,
        ..Default::default()
    };

    let mut timer: sys::gptimer_handle_t = core::ptr::null_mut();
    // SAFETY: out-pointer is valid for the call
    esp!(unsafe { sys::gptimer_new_timer(&timer_config, &mut timer) })?;

    // Owned by the alarm ISR from here on.
    let source: &'static mut AlarmSource<'static, Q> =
        Box::leak(Box::new(AlarmSource::new(queue, config.alarm_period_ticks)));

    let alarm = sys::gptimer_alarm_config_t {
        alarm_count: source.first_threshold(),
        reload_count: 0,
        ..Default::default()
    };
    // SAFETY: timer handle is valid, config outlives the call
    esp!(unsafe { sys::gptimer_set_alarm_action(timer, &alarm) })?;

    let callbacks = sys::gptimer_event_callbacks_t {
        on_alarm: Some(alarm_isr::<Q>),
        ..Default::default()
    };
    // SAFETY: `source` is 'static and only touched by alarm_isr::<Q>
    esp!(unsafe {
        sys::gptimer_register_event_callbacks(
            timer,
            &callbacks,
            source as *mut AlarmSource<'static, Q> as *mut c_void,
        )
    })?;

    // SAFETY: timer handle is valid
    esp!(unsafe { sys::gptimer_enable(timer) })?;
    esp!(unsafe { sys::gptimer_start(timer) })?;

    Ok(())
}

/// Alarm callback. Interrupt context.
///
/// Returns `true` when the sample woke the clock task, so the driver yields
/// to it on ISR exit instead of at the next tick.
unsafe extern "C" fn alarm_isr<Q: Handoff<TimerSample> + 'static>(
    timer: sys::gptimer_handle_t,
    edata: *const sys::gptimer_alarm_event_data_t,
    user_ctx: *mut c_void,
) -> bool {
    // SAFETY: user_ctx is the AlarmSource<Q> registered in start_alarm, and
    // the driver never runs this callback concurrently with itself.
    let source = unsafe { &mut *(user_ctx as *mut AlarmSource<'static, Q>) };
    // SAFETY: driver passes valid event data for the duration of the call
    let edata = unsafe { &*edata };

    let event = AlarmEvent {
        count: edata.count_value,
        alarm_value: edata.alarm_value,
    };

    let fired = source.fire(event, |next| {
        let rearm = sys::gptimer_alarm_config_t {
            alarm_count: next,
            ..Default::default()
        };
        // SAFETY: ISR-safe driver call on the timer that fired
        esp!(unsafe { sys::gptimer_set_alarm_action(timer, &rearm) })
    });

    matches!(fired, Ok(firing) if firing.woken)
}
