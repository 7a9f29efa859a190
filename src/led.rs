//! Module: led
//!
//! Purpose: Decide the LED state from button edge events.
//!
//! Architecture:
//! - `EdgeEvent` is what the GPIO interrupt writes into the queue
//! - `InputMap` turns a line identifier into a `LedCommand`
//! - `LedController` owns the output state; only the LED task touches it
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// Falling edge seen on a monitored input line.
///
/// Carries only the GPIO number the interrupt was registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEvent {
    pub gpio: u32,
}

impl EdgeEvent {
    pub const fn new(gpio: u32) -> Self {
        Self { gpio }
    }
}

/// Logical output level (0 or 1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum LedLevel {
    #[default]
    Low = 0,
    High = 1,
}

impl LedLevel {
    /// `1 - level`.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            LedLevel::Low => LedLevel::High,
            LedLevel::High => LedLevel::Low,
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn is_high(self) -> bool {
        self == LedLevel::High
    }
}

impl From<bool> for LedLevel {
    fn from(high: bool) -> Self {
        if high {
            LedLevel::High
        } else {
            LedLevel::Low
        }
    }
}

/// What a known input line does to the LED.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedCommand {
    /// Force the LED on.
    On,
    /// Force the LED off.
    Off,
    /// Invert the LED.
    Toggle,
}

impl LedCommand {
    /// Next level after applying this command to `level`.
    #[inline]
    pub fn apply(self, level: LedLevel) -> LedLevel {
        match self {
            LedCommand::On => LedLevel::High,
            LedCommand::Off => LedLevel::Low,
            LedCommand::Toggle => level.toggled(),
        }
    }

    /// Word used in the diagnostic log.
    pub fn as_str(self) -> &'static str {
        match self {
            LedCommand::On => "on",
            LedCommand::Off => "off",
            LedCommand::Toggle => "inverted",
        }
    }
}

/// Line identifier → command table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputMap {
    entries: [(u32, LedCommand); 3],
}

impl InputMap {
    pub const fn new(entries: [(u32, LedCommand); 3]) -> Self {
        Self { entries }
    }

    /// Command bound to `gpio`, or `None` for an unmonitored line.
    pub fn command_for(&self, gpio: u32) -> Option<LedCommand> {
        self.entries
            .iter()
            .find(|(pin, _)| *pin == gpio)
            .map(|(_, command)| *command)
    }
}

/// Result of handling one edge event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeOutcome {
    pub event: EdgeEvent,
    /// `None` when the line is not in the input map.
    pub command: Option<LedCommand>,
    pub level: LedLevel,
}

/// LED state owned by the consumer task.
pub struct LedController {
    map: InputMap,
    level: LedLevel,
}

impl LedController {
    pub fn new(map: InputMap) -> Self {
        Self {
            map,
            level: LedLevel::Low,
        }
    }

    /// Apply an edge event to the state.
    ///
    /// Unknown lines leave the level untouched.
    pub fn handle(&mut self, event: EdgeEvent) -> EdgeOutcome {
        let command = self.map.command_for(event.gpio);
        if let Some(command) = command {
            self.level = command.apply(self.level);
        }

        EdgeOutcome {
            event,
            command,
            level: self.level,
        }
    }

    /// Current output state.
    #[inline]
    pub fn level(&self) -> LedLevel {
        self.level
    }
}
