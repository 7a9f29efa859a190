//! LED task tests

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, StatefulOutputPin};
use isr_handoff_lab::logging::{LogLevel, LogStream};
use isr_handoff_lab::{EdgeEvent, ExerciseConfig, LedCommand, LedLevel, LedTask};

#[derive(Debug)]
struct MockError;

impl embedded_hal::digital::Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output pin that records every write.
#[derive(Default)]
struct MockLed {
    high: bool,
    writes: Vec<bool>,
    fail: bool,
}

impl ErrorType for MockLed {
    type Error = MockError;
}

impl OutputPin for MockLed {
    fn set_low(&mut self) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.high = false;
        self.writes.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.high = true;
        self.writes.push(true);
        Ok(())
    }
}

impl StatefulOutputPin for MockLed {
    fn is_set_high(&mut self) -> Result<bool, MockError> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, MockError> {
        Ok(!self.high)
    }
}

const ON: u32 = 21;
const OFF: u32 = 22;
const TOGGLE: u32 = 23;

fn make_task() -> LedTask<MockLed> {
    LedTask::new(ExerciseConfig::DEFAULT.input_map(), MockLed::default())
}

fn last_message(log: &LogStream<16>) -> (LogLevel, String) {
    let mut last = None;
    while let Some(entry) = log.drain() {
        last = Some((entry.level, entry.message().to_string()));
    }
    last.expect("no log entry")
}

#[test]
fn test_on_toggle_off_scenario() {
    let mut task = make_task();
    let log = LogStream::<16>::new();

    let outcome = task.handle(EdgeEvent::new(ON), &log, 1);
    assert_eq!(outcome.level, LedLevel::High);
    assert!(task.led().high);
    assert_eq!(last_message(&log).1, "button 21 pressed, LED on (level 1)");

    let outcome = task.handle(EdgeEvent::new(TOGGLE), &log, 2);
    assert_eq!(outcome.level, LedLevel::Low);
    assert!(!task.led().high);
    assert_eq!(last_message(&log).1, "button 23 pressed, LED inverted (level 0)");

    let outcome = task.handle(EdgeEvent::new(OFF), &log, 3);
    assert_eq!(outcome.level, LedLevel::Low);
    assert_eq!(last_message(&log).1, "button 22 pressed, LED off (level 0)");
}

#[test]
fn test_unknown_line_drives_pin_and_warns() {
    let mut task = make_task();
    let log = LogStream::<16>::new();

    task.handle(EdgeEvent::new(ON), &log, 1);
    let outcome = task.handle(EdgeEvent::new(5), &log, 2);

    assert_eq!(outcome.command, None);
    assert_eq!(task.level(), LedLevel::High);
    // Pin is still written with the unchanged level
    assert_eq!(task.led().writes, vec![true, true]);

    let (level, msg) = last_message(&log);
    assert_eq!(level, LogLevel::Warn);
    assert_eq!(msg, "button 5 pressed, LED unchanged (level 1)");
}

#[test]
fn test_final_state_is_fold_of_commands() {
    let lines = [ON, OFF, TOGGLE];
    let mut seed: u32 = 0x1234_5678;

    for _ in 0..50 {
        let mut task = make_task();
        let log = LogStream::<16>::new();
        let mut expected = LedLevel::Low;

        for _ in 0..40 {
            // LCG: Numerical Recipes constants
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let gpio = lines[(seed >> 16) as usize % lines.len()];

            let command = ExerciseConfig::DEFAULT.input_map().command_for(gpio).unwrap();
            expected = command.apply(expected);

            task.handle(EdgeEvent::new(gpio), &log, 0);
            while log.drain().is_some() {}
        }

        assert_eq!(task.level(), expected);
        assert_eq!(task.led().high, expected.is_high());
    }
}

#[test]
fn test_toggle_twice_restores_state() {
    for start in [ON, OFF] {
        let mut task = make_task();
        let log = LogStream::<16>::new();
        task.handle(EdgeEvent::new(start), &log, 0);
        let before = task.level();

        task.handle(EdgeEvent::new(TOGGLE), &log, 1);
        task.handle(EdgeEvent::new(TOGGLE), &log, 2);
        assert_eq!(task.level(), before);
    }
}

#[test]
fn test_pin_failure_logged_state_kept() {
    let led = MockLed { fail: true, ..MockLed::default() };
    let mut task = LedTask::new(ExerciseConfig::DEFAULT.input_map(), led);
    let log = LogStream::<16>::new();

    let outcome = task.handle(EdgeEvent::new(ON), &log, 1);
    assert_eq!(outcome.command, Some(LedCommand::On));
    assert_eq!(task.level(), LedLevel::High);

    let (level, msg) = last_message(&log);
    assert_eq!(level, LogLevel::Error);
    assert!(msg.contains("write failed"));
}
