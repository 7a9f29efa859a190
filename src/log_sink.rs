//! Log drain: formats queued entries and writes them to a byte sink.
//!
//! On the board the sink is the ESP-IDF console (UART0 through stdout).
//! Tests use an in-memory buffer.
//!
//! # Output format
//!
//! ```text
//! [   1000123] INFO IO: button 21 pressed, LED on (level 1)
//! [   2000045] INFO TMR: clock 00:00:02
//! [  10000002] WARN MAIN: dropped log=0 edge=3 timer=0
//! ```

use core::fmt::Write;

use crate::context::DropCounters;
use crate::logging::{LogEntry, LogLevel, LogStream, SliceWriter, TAG_MAIN};

/// Size of one formatted output line.
pub const LINE_BUF_LEN: usize = 160;

/// Byte sink for formatted log lines. Writing may block.
pub trait LogSink {
    fn write(&mut self, bytes: &[u8]);
}

/// Format log entry to a line.
///
/// Format: `[timestamp_us] LEVEL TAG: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = SliceWriter { buf, pos: 0 };

    let _ = write!(
        writer,
        "[{:10}] {} {}: {}\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.tag,
        entry.message()
    );

    writer.pos
}

/// Drain state: when drop counters were last reported.
pub struct LogDrain {
    report_interval_us: i64,
    last_report_us: i64,
    reported: DropCounters,
}

impl LogDrain {
    pub fn new(report_interval_us: i64) -> Self {
        Self {
            report_interval_us,
            last_report_us: 0,
            reported: DropCounters::default(),
        }
    }

    /// Write every pending entry to `sink`, then report drops if the
    /// interval elapsed and something new was dropped.
    ///
    /// `take_drops` runs only when a report is due, so the log count it takes
    /// covers everything dropped up to the report itself.
    ///
    /// Returns `true` if anything was written.
    pub fn pass<S, F, const N: usize>(
        &mut self,
        log: &LogStream<N>,
        take_drops: F,
        sink: &mut S,
        now_us: i64,
    ) -> bool
    where
        S: LogSink,
        F: FnOnce() -> DropCounters,
    {
        let mut line = [0u8; LINE_BUF_LEN];
        let mut work_done = false;

        while let Some(entry) = log.drain() {
            let len = format_log_entry(&entry, &mut line);
            sink.write(&line[..len]);
            work_done = true;
        }

        if now_us - self.last_report_us >= self.report_interval_us {
            let drops = take_drops();
            let fresh = drops.log > 0
                || drops.edge != self.reported.edge
                || drops.timer != self.reported.timer;

            if fresh {
                let len = format_drop_report(&drops, now_us, &mut line);
                sink.write(&line[..len]);
                self.reported = drops;
                work_done = true;
            }

            self.last_report_us = now_us;
        }

        work_done
    }
}

fn format_drop_report(drops: &DropCounters, now_us: i64, buf: &mut [u8]) -> usize {
    let mut writer = SliceWriter { buf, pos: 0 };
    let _ = write!(
        writer,
        "[{:10}] {} {}: dropped log={} edge={} timer={}\n",
        now_us,
        LogLevel::Warn.as_str(),
        TAG_MAIN,
        drops.log,
        drops.edge,
        drops.timer
    );
    writer.pos
}
