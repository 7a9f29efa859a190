//! FreeRTOS queue behind the `Handoff` trait.

use core::ffi::c_void;
use core::marker::PhantomData;
use core::mem::{size_of, MaybeUninit};
use core::ptr;
use core::sync::atomic::{AtomicU32, Ordering};

use esp_idf_svc::hal::delay::BLOCK;
use esp_idf_svc::hal::interrupt;
use esp_idf_svc::sys;

use crate::error::SetupError;
use crate::queue::{Handoff, IsrSend};

const QUEUE_TYPE_BASE: u8 = 0;
const QUEUE_SEND_TO_BACK: sys::BaseType_t = 0;
const PD_TRUE: sys::BaseType_t = 1;

/// Fixed-depth FreeRTOS queue carrying `T` by value.
pub struct RtosQueue<T> {
    handle: sys::QueueHandle_t,
    dropped: AtomicU32,
    _item: PhantomData<T>,
}

// SAFETY: FreeRTOS queues are safe to use from any task or ISR.
unsafe impl<T: Send> Send for RtosQueue<T> {}
unsafe impl<T: Send> Sync for RtosQueue<T> {}

impl<T: Copy> RtosQueue<T> {
    pub fn new(depth: u32) -> Result<Self, SetupError> {
        // SAFETY: plain allocation call
        let handle = unsafe {
            sys::xQueueGenericCreate(depth, size_of::<T>() as u32, QUEUE_TYPE_BASE)
        };
        if handle.is_null() {
            return Err(SetupError::QueueAlloc);
        }

        Ok(Self {
            handle,
            dropped: AtomicU32::new(0),
            _item: PhantomData,
        })
    }
}

impl<T: Copy> Handoff<T> for RtosQueue<T> {
    fn try_send(&self, item: T) -> bool {
        let item_ptr = &item as *const T as *const c_void;

        // SAFETY: queue item size is size_of::<T>(); FreeRTOS copies the item
        let sent = unsafe {
            if interrupt::active() {
                sys::xQueueGenericSendFromISR(
                    self.handle,
                    item_ptr,
                    ptr::null_mut(),
                    QUEUE_SEND_TO_BACK,
                )
            } else {
                sys::xQueueGenericSend(self.handle, item_ptr, 0, QUEUE_SEND_TO_BACK)
            }
        };

        if sent != PD_TRUE {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    fn try_send_from_isr(&self, item: T) -> IsrSend {
        let mut woken: sys::BaseType_t = 0;

        // SAFETY: queue item size is size_of::<T>(); FreeRTOS copies the item.
        // Only valid in interrupt context.
        let sent = unsafe {
            sys::xQueueGenericSendFromISR(
                self.handle,
                &item as *const T as *const c_void,
                &mut woken,
                QUEUE_SEND_TO_BACK,
            )
        } == PD_TRUE;

        if !sent {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        IsrSend {
            sent,
            woken: woken == PD_TRUE,
        }
    }

    fn recv(&self) -> T {
        let mut slot = MaybeUninit::<T>::uninit();
        loop {
            // SAFETY: slot has room for one item; task context only
            let received = unsafe {
                sys::xQueueReceive(self.handle, slot.as_mut_ptr() as *mut c_void, BLOCK)
            };
            if received == PD_TRUE {
                // SAFETY: FreeRTOS copied a full item into slot
                return unsafe { slot.assume_init() };
            }
        }
    }

    fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<T> Drop for RtosQueue<T> {
    fn drop(&mut self) {
        // SAFETY: handle came from xQueueGenericCreate
        unsafe { sys::vQueueDelete(self.handle) };
    }
}
