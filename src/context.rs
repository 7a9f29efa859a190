//! Startup context shared by tasks and interrupt registrations.
//!
//! Built once in `main`, promoted to `'static`, then handed out by reference.
//! The log ring is borrowed rather than owned: it is several kilobytes, so on
//! the board it sits in a `static` and never passes through a stack frame.

use crate::alarm::TimerSample;
use crate::config::ExerciseConfig;
use crate::led::EdgeEvent;
use crate::logging::LogStream;
use crate::queue::Handoff;

/// Snapshot of every drop counter in the system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropCounters {
    /// Log messages dropped since the last report.
    pub log: u32,
    /// Edge events dropped since boot.
    pub edge: u32,
    /// Timer samples dropped since boot.
    pub timer: u32,
}

/// Owner of both hand-off queues, borrowing the log stream.
pub struct ExerciseContext<'l, E, T> {
    pub config: ExerciseConfig,
    /// GPIO interrupt → LED task.
    pub edge_queue: E,
    /// Alarm callback → clock task.
    pub timer_queue: T,
    /// Tasks → log drain.
    pub log: &'l LogStream,
}

impl<'l, E, T> ExerciseContext<'l, E, T>
where
    E: Handoff<EdgeEvent>,
    T: Handoff<TimerSample>,
{
    pub fn new(config: ExerciseConfig, edge_queue: E, timer_queue: T, log: &'l LogStream) -> Self {
        Self {
            config,
            edge_queue,
            timer_queue,
            log,
        }
    }

    /// Read-only snapshot. The log count keeps growing until taken.
    pub fn drop_counters(&self) -> DropCounters {
        DropCounters {
            log: self.log.dropped(),
            edge: self.edge_queue.dropped(),
            timer: self.timer_queue.dropped(),
        }
    }

    /// Snapshot for a drop report: the log count is read and cleared
    /// atomically, queue counts are cumulative.
    pub fn take_drop_counters(&self) -> DropCounters {
        DropCounters {
            log: self.log.take_dropped(),
            edge: self.edge_queue.dropped(),
            timer: self.timer_queue.dropped(),
        }
    }
}
