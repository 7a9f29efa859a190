//! Hardware layer for the ESP32 (espidf target only).
//!
//! Thin wrappers around raw ESP-IDF drivers.
//! State decisions stay in `led`, `alarm` and `isr`; this layer is just I/O.

pub mod gpio;
pub mod gptimer;
pub mod queue;

pub use gpio::{configure_inputs, configure_led, LedPin};
pub use gptimer::start_alarm;
pub use queue::RtosQueue;

use esp_idf_svc::sys;

/// Microseconds since boot.
pub fn now_us() -> i64 {
    // SAFETY: esp_timer_get_time is always safe to call
    unsafe { sys::esp_timer_get_time() }
}

/// Yield for a few ticks; used by the log drain when it has nothing to do.
pub fn idle() {
    // SAFETY: called from task context only
    unsafe { sys::vTaskDelay(10) };
}
