//! Bounded hand-off queues between interrupt and task context.
//!
//! ```text
//! ISR / alarm callback        Handoff<T>          Task
//! ────────────────────        ──────────          ────
//!
//! try_send() ──────────▶ [E0][E1][E2] ──────▶ recv()
//! never blocks             bounded FIFO       blocks forever
//! drops newest if full
//! ```
//!
//! # Rules
//!
//! - Exactly one producer and one consumer per queue
//! - The producer never blocks, a full queue drops the newest item
//! - Every drop is counted, the consumer never sees a gap marker
//! - Delivered items keep production order

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicU32, Ordering};

/// Outcome of a send from interrupt context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IsrSend {
    /// `false` if the queue was full and the item was dropped.
    pub sent: bool,
    /// A task blocked on the queue was woken and should run on ISR exit.
    pub woken: bool,
}

/// Interrupt-to-task hand-off channel.
pub trait Handoff<T: Copy> {
    /// Queue an item without blocking.
    ///
    /// Safe to call from interrupt context. Returns `false` if the queue was
    /// full and the item was dropped.
    fn try_send(&self, item: T) -> bool;

    /// `try_send` for callbacks that report a pending context switch to
    /// their caller. Queues without a scheduler never wake anyone.
    fn try_send_from_isr(&self, item: T) -> IsrSend {
        IsrSend {
            sent: self.try_send(item),
            woken: false,
        }
    }

    /// Block until an item is available.
    fn recv(&self) -> T;

    /// Items dropped by `try_send` since creation.
    fn dropped(&self) -> u32;
}

/// Lock-free single-producer single-consumer ring.
///
/// `N` must be a power of two. Used on the host and wherever a FreeRTOS queue
/// is not available; `recv` spins until the producer publishes.
pub struct RingQueue<T: Copy, const N: usize> {
    slots: UnsafeCell<MaybeUninit<[T; N]>>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: Single producer owns slots in [read, write+N), single consumer owns
// the slot at read. Publication is ordered through write_idx/read_idx.
unsafe impl<T: Copy + Send, const N: usize> Sync for RingQueue<T, N> {}
unsafe impl<T: Copy + Send, const N: usize> Send for RingQueue<T, N> {}

impl<T: Copy, const N: usize> RingQueue<T, N> {
    const MASK: usize = N - 1;

    /// Create an empty queue.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Queue capacity must be power of 2");

        Self {
            slots: UnsafeCell::new(MaybeUninit::uninit()),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Pop the oldest item, if any.
    #[inline]
    pub fn try_recv(&self) -> Option<T> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        // SAFETY: The slot at `read` was published by the producer's Release
        // store and is not rewritten until read_idx moves past it.
        let item = unsafe { self.slot_ptr(read).read() };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(item)
    }

    /// Number of items waiting.
    #[inline]
    pub fn len(&self) -> usize {
        let read = self.read_idx.load(Ordering::Acquire);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    fn slot_ptr(&self, idx: u32) -> *mut T {
        let base = self.slots.get().cast::<T>();
        // SAFETY: masked index is always within the N-element array.
        unsafe { base.add(idx as usize & Self::MASK) }
    }
}

impl<T: Copy, const N: usize> Handoff<T> for RingQueue<T, N> {
    #[inline]
    fn try_send(&self, item: T) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: Single producer; the consumer has released this slot.
        unsafe { self.slot_ptr(write).write(item) };

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    fn recv(&self) -> T {
        loop {
            if let Some(item) = self.try_recv() {
                return item;
            }
            core::hint::spin_loop();
        }
    }

    #[inline]
    fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<T: Copy, const N: usize> Default for RingQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let q = RingQueue::<u32, 4>::new();
        assert!(q.try_send(21));
        assert!(q.try_send(22));
        assert!(q.try_send(23));

        assert_eq!(q.try_recv(), Some(21));
        assert_eq!(q.try_recv(), Some(22));
        assert_eq!(q.try_recv(), Some(23));
        assert_eq!(q.try_recv(), None);
    }

    #[test]
    fn test_full_queue_drops_newest() {
        let q = RingQueue::<u32, 2>::new();
        assert!(q.try_send(1));
        assert!(q.try_send(2));
        assert!(!q.try_send(3));
        assert_eq!(q.dropped(), 1);

        assert_eq!(q.try_recv(), Some(1));
        assert_eq!(q.try_recv(), Some(2));
        assert_eq!(q.try_recv(), None);
    }

    #[test]
    fn test_isr_send_never_wakes() {
        let q = RingQueue::<u32, 2>::new();
        assert_eq!(q.capacity(), 2);
        assert_eq!(q.try_send_from_isr(1), IsrSend { sent: true, woken: false });
        assert_eq!(q.try_send_from_isr(2), IsrSend { sent: true, woken: false });
        assert_eq!(q.try_send_from_isr(3), IsrSend { sent: false, woken: false });
        assert_eq!(q.dropped(), 1);
    }

    #[test]
    fn test_index_wrap() {
        let q = RingQueue::<u64, 2>::new();
        for i in 0..10u64 {
            assert!(q.try_send(i));
            assert_eq!(q.recv(), i);
        }
        assert!(q.is_empty());
        assert_eq!(q.dropped(), 0);
    }
}
