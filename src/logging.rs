//! Non-blocking diagnostic logging.
//!
//! ```text
//! LED / clock tasks        LogStream            Log drain task
//! ─────────────────        ─────────            ──────────────
//!
//! rt_info!() ──────────▶ [L0][L1][L2] ──────▶ console
//! non-blocking             lock-free           blocking ok
//! ```
//!
//! # Rules
//!
//! - Interrupt handlers never log, not even through this stream
//! - Tasks log through `rt_*!` macros, which never block or allocate
//! - Messages may be dropped if the ring is full; drops are counted

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Tag for the GPIO exercise.
pub const TAG_IO: &str = "IO";
/// Tag for the timer exercise.
pub const TAG_TMR: &str = "TMR";
/// Tag for startup and housekeeping.
pub const TAG_MAIN: &str = "MAIN";

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in microseconds since boot.
    pub timestamp_us: i64,
    pub level: LogLevel,
    /// Subsystem tag (`TAG_IO`, `TAG_TMR`, ...).
    pub tag: &'static str,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        tag: "",
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text. Truncation can split a UTF-8 sequence; the valid prefix
    /// is returned in that case.
    pub fn message(&self) -> &str {
        let bytes = &self.msg[..self.len as usize];
        match core::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
        }
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free log ring: any number of producers, one drain.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    /// Per-slot publication marker: `claim index + 1` once the entry is written.
    published: [AtomicU32; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: Producers claim distinct slots through compare_exchange on
// write_idx; the single drain only reads slots whose marker is published.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        const UNPUBLISHED: AtomicU32 = AtomicU32::new(0);

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            published: [UNPUBLISHED; N],
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue a message. Never blocks.
    ///
    /// Returns `false` if the ring was full and the message was dropped.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, tag: &'static str, msg: &[u8]) -> bool {
        let read = self.read_idx.load(Ordering::Acquire);
        let mut write = self.write_idx.load(Ordering::Relaxed);

        // Claim a slot only if one is free, so a full ring does not advance
        // write_idx past entries the drain has not seen yet.
        loop {
            if write.wrapping_sub(read) >= N as u32 {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self.write_idx.compare_exchange_weak(
                write,
                write.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => write = current,
            }
        }

        let idx = (write as usize) & Self::MASK;
        let len = msg.len().min(MAX_MSG_LEN);

        // SAFETY: compare_exchange handed this slot to exactly one producer.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.tag = tag;
            entry.len = len as u8;
            entry.msg[..len].copy_from_slice(&msg[..len]);
        }
        self.published[idx].store(write.wrapping_add(1), Ordering::Release);

        true
    }

    /// Take the oldest entry.
    ///
    /// Returns `None` if the ring is empty or the oldest slot is still being
    /// written by its producer.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;
        if self.published[idx].load(Ordering::Acquire) != read.wrapping_add(1) {
            return None;
        }

        // SAFETY: Single consumer, slot published by its producer.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Messages dropped since the last `take_dropped`.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Read and clear the drop counter in one step, so a drop that races the
    /// report lands in the next one.
    #[inline]
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }

    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer, truncating at the end.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = SliceWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// `fmt::Write` over a fixed slice. Excess output is discarded.
pub(crate) struct SliceWriter<'a> {
    pub(crate) buf: &'a mut [u8],
    pub(crate) pos: usize,
}

impl core::fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let to_write = bytes.len().min(self.buf.len() - self.pos);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Non-blocking log macro.
///
/// ```ignore
/// rt_log!(LogLevel::Info, ctx.log, now_us, TAG_IO, "button {} pressed", gpio);
/// ```
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $timestamp:expr, $tag:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, $tag, &buf[..len])
    }};
}

#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $timestamp:expr, $tag:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $tag, $($arg)*)
    };
}

#[macro_export]
macro_rules! rt_warn {
    ($stream:expr, $timestamp:expr, $tag:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $tag, $($arg)*)
    };
}

#[macro_export]
macro_rules! rt_error {
    ($stream:expr, $timestamp:expr, $tag:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $tag, $($arg)*)
    };
}

#[macro_export]
macro_rules! rt_debug {
    ($stream:expr, $timestamp:expr, $tag:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $tag, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Info, TAG_IO, b"LED on"));
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_us, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.tag, "IO");
        assert_eq!(entry.message(), "LED on");
        assert!(stream.drain().is_none());
    }

    #[test]
    fn test_full_ring_drops_and_keeps_oldest() {
        let stream = LogStream::<4>::new();
        for i in 0..4 {
            assert!(stream.push(i, LogLevel::Info, TAG_TMR, b"x"));
        }
        assert!(!stream.push(4, LogLevel::Info, TAG_TMR, b"y"));
        assert_eq!(stream.dropped(), 1);
        assert_eq!(stream.pending(), 4);

        assert_eq!(stream.drain().unwrap().timestamp_us, 0);
        assert!(stream.push(5, LogLevel::Info, TAG_TMR, b"z"));

        assert_eq!(stream.take_dropped(), 1);
        assert_eq!(stream.dropped(), 0);
    }

    #[test]
    fn test_take_dropped_keeps_later_drops() {
        let stream = LogStream::<2>::new();
        for i in 0..3 {
            stream.push(i, LogLevel::Info, TAG_IO, b"x");
        }
        assert_eq!(stream.take_dropped(), 1);

        stream.push(3, LogLevel::Info, TAG_IO, b"y");
        stream.push(4, LogLevel::Info, TAG_IO, b"z");
        assert_eq!(stream.take_dropped(), 2);
        assert_eq!(stream.take_dropped(), 0);
    }

    #[test]
    fn test_long_message_truncated() {
        let stream = LogStream::<4>::new();
        let long = [b'a'; MAX_MSG_LEN + 10];
        stream.push(0, LogLevel::Debug, TAG_MAIN, &long);
        assert_eq!(stream.drain().unwrap().len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_macro_formats() {
        let stream = LogStream::<4>::new();
        assert!(crate::rt_info!(stream, 7, TAG_IO, "button {} pressed", 21));
        assert_eq!(stream.drain().unwrap().message(), "button 21 pressed");

        assert!(crate::rt_debug!(stream, 8, TAG_TMR, "next alarm at {}", 2_000_000));
        let entry = stream.drain().unwrap();
        assert_eq!(entry.level, LogLevel::Debug);
        assert_eq!(entry.message(), "next alarm at 2000000");
    }

    #[test]
    fn test_format_to_buffer_truncates() {
        let mut buf = [0u8; 4];
        let len = format_to_buffer(&mut buf, format_args!("clock {}", 1));
        assert_eq!(&buf[..len], b"cloc");
    }

    #[test]
    fn test_concurrent_producers() {
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<64>::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let stream = Arc::clone(&stream);
                thread::spawn(move || {
                    for j in 0..10 {
                        crate::rt_info!(stream, j, TAG_MAIN, "t{} m{}", t, j);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut count = 0;
        while stream.drain().is_some() {
            count += 1;
        }
        assert_eq!(count, 40);
    }
}
