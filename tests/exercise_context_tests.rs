//! End-to-end hand-off through the shared context

use std::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use isr_handoff_lab::log_sink::{LogDrain, LogSink};
use isr_handoff_lab::logging::TAG_MAIN;
use isr_handoff_lab::{
    rt_info, AlarmEvent, AlarmSource, ClockTask, DropCounters, EdgeEvent, EdgeSource,
    ExerciseConfig, ExerciseContext, Handoff, LedLevel, LedTask, LogStream, RingQueue,
    TimerSample,
};

type Context<'l> = ExerciseContext<'l, RingQueue<EdgeEvent, 4>, RingQueue<TimerSample, 4>>;

#[derive(Default)]
struct Led(bool);

impl ErrorType for Led {
    type Error = Infallible;
}

impl OutputPin for Led {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0 = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0 = true;
        Ok(())
    }
}

impl StatefulOutputPin for Led {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0)
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0)
    }
}

#[derive(Default)]
struct Capture(Vec<u8>);

impl LogSink for Capture {
    fn write(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }
}

fn make_context(log: &LogStream) -> Context<'_> {
    ExerciseContext::new(ExerciseConfig::DEFAULT, RingQueue::new(), RingQueue::new(), log)
}

#[test]
fn test_buttons_to_console() {
    let log = LogStream::new();
    let ctx = make_context(&log);
    let config = ctx.config;
    let lines = config.input_pins().map(|gpio| EdgeSource::new(&ctx.edge_queue, gpio));
    let mut task = LedTask::new(config.input_map(), Led::default());

    // A, C, B pressed in one burst before the task runs
    lines[0].fire();
    lines[2].fire();
    lines[1].fire();

    let mut levels = Vec::new();
    for t in 0..3 {
        let event = ctx.edge_queue.recv();
        levels.push(task.handle(event, ctx.log, 1_000 * t).level);
    }
    assert_eq!(levels, vec![LedLevel::High, LedLevel::Low, LedLevel::Low]);

    let mut sink = Capture::default();
    let mut drain = LogDrain::new(config.drop_report_interval_us);
    drain.pass(ctx.log, || ctx.take_drop_counters(), &mut sink, 5_000);

    let text = String::from_utf8(sink.0).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("INFO IO: button 21 pressed, LED on (level 1)"));
    assert!(lines[1].ends_with("INFO IO: button 23 pressed, LED inverted (level 0)"));
    assert!(lines[2].ends_with("INFO IO: button 22 pressed, LED off (level 0)"));
}

#[test]
fn test_alarm_to_clock() {
    let log = LogStream::new();
    let ctx = make_context(&log);
    let mut source = AlarmSource::new(&ctx.timer_queue, ctx.config.alarm_period_ticks);
    let mut task = ClockTask::new(ctx.config.timer_resolution_hz);

    let mut alarm_value = source.first_threshold();
    let mut shown = Vec::new();
    for _ in 0..3 {
        let event = AlarmEvent { count: alarm_value + 40, alarm_value };
        alarm_value = source.fire(event, |_| Ok::<(), ()>(())).unwrap().next;

        let sample = ctx.timer_queue.recv();
        shown.push(task.handle(sample, ctx.log, 0).to_string());
    }

    assert_eq!(shown, vec!["00:00:01", "00:00:02", "00:00:03"]);
    assert_eq!(ctx.log.pending(), 3);
}

#[test]
fn test_drop_counters_reported() {
    let log = LogStream::new();
    let ctx = make_context(&log);
    let source = EdgeSource::new(&ctx.edge_queue, 23);

    // Capacity 4: the last two presses are lost
    for _ in 0..6 {
        source.fire();
    }
    assert_eq!(
        ctx.drop_counters(),
        DropCounters { log: 0, edge: 2, timer: 0 }
    );

    let mut sink = Capture::default();
    let mut drain = LogDrain::new(ctx.config.drop_report_interval_us);
    assert!(drain.pass(ctx.log, || ctx.take_drop_counters(), &mut sink, 10_000_000));

    let text = String::from_utf8(sink.0).unwrap();
    assert!(text.contains("WARN MAIN: dropped log=0 edge=2 timer=0"));
}

static BOOT_LOG: LogStream = LogStream::new();

#[test]
fn test_context_over_static_log() {
    let ctx: Context<'static> = make_context(&BOOT_LOG);

    // The ring stays in static storage; the context only holds a reference
    assert!(core::mem::size_of::<Context<'static>>() < core::mem::size_of::<LogStream>() / 8);

    rt_info!(ctx.log, 0, TAG_MAIN, "starting");
    assert_eq!(BOOT_LOG.pending(), 1);
    assert_eq!(BOOT_LOG.drain().unwrap().message(), "starting");
}

#[test]
fn test_log_drops_taken_at_report() {
    let log = LogStream::<64>::new();
    let ctx = make_context(&log);
    for i in 0..70 {
        rt_info!(ctx.log, i, TAG_MAIN, "burst {}", i);
    }
    assert_eq!(ctx.drop_counters().log, 6);

    let mut sink = Capture::default();
    let mut drain = LogDrain::new(ctx.config.drop_report_interval_us);
    assert!(drain.pass(ctx.log, || ctx.take_drop_counters(), &mut sink, 10_000_000));

    let text = String::from_utf8(sink.0).unwrap();
    assert_eq!(text.lines().count(), 65);
    assert!(text.contains("WARN MAIN: dropped log=6 edge=0 timer=0"));
    assert_eq!(ctx.drop_counters(), DropCounters::default());
}
