//! GPIO setup: three falling-edge button inputs and one LED output.

use alloc::boxed::Box;
use core::ffi::c_void;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, StatefulOutputPin};
use esp_idf_svc::sys::{self, esp, EspError};

use crate::config::ExerciseConfig;
use crate::error::SetupError;
use crate::isr::EdgeSource;
use crate::led::EdgeEvent;
use crate::queue::Handoff;

/// Configure the button lines and register one edge ISR per line.
///
/// Each registration record is leaked: handlers stay installed for the
/// lifetime of the firmware.
pub fn configure_inputs<Q>(config: &ExerciseConfig, queue: &'static Q) -> Result<(), SetupError>
where
    Q: Handoff<EdgeEvent> + Sync + 'static,
{
    let inputs = sys::gpio_config_t {
        pin_bit_mask: config.input_pin_mask(),
        mode: sys::gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: sys::gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: sys::gpio_int_type_t_GPIO_INTR_NEGEDGE,
        ..Default::default()
    };
    // SAFETY: config struct outlives the call
    esp!(unsafe { sys::gpio_config(&inputs) })?;

    // SAFETY: installed once, before any handler is added
    esp!(unsafe { sys::gpio_install_isr_service(0) })?;

    for gpio in config.input_pins() {
        let source: &'static EdgeSource<'static, Q> = Box::leak(Box::new(EdgeSource::new(queue, gpio)));
        // SAFETY: `source` is 'static and only read by edge_isr::<Q>
        esp!(unsafe {
            sys::gpio_isr_handler_add(
                gpio as sys::gpio_num_t,
                Some(edge_isr::<Q>),
                source as *const EdgeSource<'static, Q> as *mut c_void,
            )
        })?;
    }

    Ok(())
}

/// Shared-service GPIO handler. Interrupt context.
unsafe extern "C" fn edge_isr<Q: Handoff<EdgeEvent> + 'static>(arg: *mut c_void) {
    // SAFETY: arg is the EdgeSource<Q> registered in configure_inputs
    let source = unsafe { &*(arg as *const EdgeSource<'static, Q>) };
    source.fire();
}

/// Configure the LED line as a plain output, driven low.
pub fn configure_led(config: &ExerciseConfig) -> Result<LedPin, SetupError> {
    let output = sys::gpio_config_t {
        pin_bit_mask: 1u64 << config.led_pin,
        mode: sys::gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: sys::gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: sys::gpio_int_type_t_GPIO_INTR_DISABLE,
        ..Default::default()
    };
    // SAFETY: config struct outlives the call
    esp!(unsafe { sys::gpio_config(&output) })?;

    let mut pin = LedPin {
        gpio: config.led_pin as sys::gpio_num_t,
        level: false,
    };
    pin.write(false).map_err(|e| SetupError::Esp(e.0))?;
    Ok(pin)
}

/// LED output line. Owned by the LED task.
///
/// The pin is output-only, so the level it reports is the last level written.
pub struct LedPin {
    gpio: sys::gpio_num_t,
    level: bool,
}

impl LedPin {
    fn write(&mut self, high: bool) -> Result<(), PinError> {
        // SAFETY: pin configured as output in configure_led
        esp!(unsafe { sys::gpio_set_level(self.gpio, u32::from(high)) }).map_err(PinError)?;
        self.level = high;
        Ok(())
    }
}

/// Driver failure on the LED line.
#[derive(Debug)]
pub struct PinError(pub EspError);

impl embedded_hal::digital::Error for PinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for LedPin {
    type Error = PinError;
}

impl OutputPin for LedPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

impl StatefulOutputPin for LedPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level)
    }
}
