//! # ISR Handoff Lab
//!
//! Two ESP32 classroom exercises sharing one shape:
//!
//! ```text
//! interrupt context          bounded FIFO          task context
//! ─────────────────          ────────────          ────────────
//! GPIO falling edge ──────▶ edge queue  ──────▶ LED task  (on / off / invert)
//! gptimer alarm     ──────▶ timer queue ──────▶ clock task (HH:MM:SS)
//! ```
//!
//! - Producers never block; a full queue drops the newest item and counts it
//! - Each queue has exactly one producer and one consumer
//! - Queues and the log stream live in [`ExerciseContext`], not in globals
//!
//! State decisions (`led`, `alarm`, `clock`, `isr`) are plain Rust and run on
//! the host. `hal` wires them to ESP-IDF and only builds for `espidf`.

#![cfg_attr(not(test), no_std)]

#[cfg(target_os = "espidf")]
extern crate alloc;

pub mod alarm;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod isr;
pub mod led;
pub mod log_sink;
pub mod logging;
pub mod queue;
pub mod tasks;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use alarm::{AlarmEvent, AlarmPhase, AlarmSchedule, ScheduleError, TimerSample};
pub use clock::ClockReadout;
pub use config::ExerciseConfig;
pub use context::{DropCounters, ExerciseContext};
pub use error::SetupError;
pub use isr::{AlarmFiring, AlarmSource, EdgeSource};
pub use led::{EdgeEvent, EdgeOutcome, InputMap, LedCommand, LedController, LedLevel};
pub use logging::{LogLevel, LogStream};
pub use queue::{Handoff, IsrSend, RingQueue};
pub use tasks::{ClockTask, LedTask};
