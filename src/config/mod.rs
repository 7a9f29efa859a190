//! Module: config
//!
//! Purpose: Board and timing configuration for both exercises.
//!
//! Architecture:
//! - `ExerciseConfig::DEFAULT` mirrors the classroom wiring (buttons on
//!   GPIO 21/22/23, LED on GPIO 2, 1 MHz gptimer, 1 s alarm period)
//! - Values are plain `Copy` data, validated once at startup
//!
//! Safety: Safe. No unsafe blocks.

use crate::error::SetupError;
use crate::led::{InputMap, LedCommand};

/// Number of GPIO lines on the ESP32 (`GPIO_NUM_MAX`).
pub const GPIO_COUNT: u32 = 40;

/// Static configuration for the GPIO and timer exercises.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExerciseConfig {
    /// Button that forces the LED on.
    pub on_pin: u32,
    /// Button that forces the LED off.
    pub off_pin: u32,
    /// Button that inverts the LED.
    pub toggle_pin: u32,
    /// LED output.
    pub led_pin: u32,
    /// gptimer counting resolution in Hz (ticks per second).
    pub timer_resolution_hz: u32,
    /// Alarm period in ticks.
    pub alarm_period_ticks: u64,
    /// Depth of the GPIO edge queue.
    pub edge_queue_depth: u32,
    /// Depth of the timer sample queue.
    pub timer_queue_depth: u32,
    /// How often the log drain reports drop counters, in microseconds.
    pub drop_report_interval_us: i64,
    /// Stack size for each spawned task, in bytes.
    pub task_stack_size: usize,
}

impl ExerciseConfig {
    /// Classroom defaults.
    pub const DEFAULT: Self = Self {
        on_pin: 21,
        off_pin: 22,
        toggle_pin: 23,
        led_pin: 2,
        timer_resolution_hz: 1_000_000,
        alarm_period_ticks: 1_000_000,
        edge_queue_depth: 10,
        timer_queue_depth: 10,
        drop_report_interval_us: 10_000_000,
        task_stack_size: 4096,
    };

    /// Check the configuration before touching any peripheral.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.timer_resolution_hz == 0 {
            return Err(SetupError::InvalidConfig("timer resolution is zero"));
        }
        if self.alarm_period_ticks == 0 {
            return Err(SetupError::InvalidConfig("alarm period is zero"));
        }
        if self.edge_queue_depth == 0 || self.timer_queue_depth == 0 {
            return Err(SetupError::InvalidConfig("queue depth is zero"));
        }

        let pins = [self.on_pin, self.off_pin, self.toggle_pin, self.led_pin];
        if pins.iter().any(|&pin| pin >= GPIO_COUNT) {
            return Err(SetupError::InvalidConfig("pin out of range"));
        }
        for (i, a) in pins.iter().enumerate() {
            if pins[i + 1..].contains(a) {
                return Err(SetupError::InvalidConfig("pin assigned twice"));
            }
        }

        Ok(())
    }

    /// Line → command table used by the LED task.
    pub fn input_map(&self) -> InputMap {
        InputMap::new([
            (self.on_pin, LedCommand::On),
            (self.off_pin, LedCommand::Off),
            (self.toggle_pin, LedCommand::Toggle),
        ])
    }

    /// The three monitored input lines.
    pub fn input_pins(&self) -> [u32; 3] {
        [self.on_pin, self.off_pin, self.toggle_pin]
    }

    /// Bit mask of the input lines, as `gpio_config` expects it.
    pub fn input_pin_mask(&self) -> u64 {
        self.input_pins().iter().fold(0, |mask, pin| mask | (1u64 << pin))
    }
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
