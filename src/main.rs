//! ISR Handoff Lab - firmware entry point
//!
//! Startup, in order:
//! 1. Validate the configuration
//! 2. Build the context (both queues, borrowing the static log stream)
//! 3. Spawn the log drain, LED and clock tasks
//! 4. Configure the GPIO inputs and start the gptimer alarm
//!
//! Any setup failure aborts startup. `main` returns once everything runs;
//! the tasks keep going.

#[cfg(target_os = "espidf")]
mod firmware {
    use std::io::Write;
    use std::thread;

    use static_cell::StaticCell;

    use isr_handoff_lab::hal::{self, RtosQueue};
    use isr_handoff_lab::log_sink::LogSink;
    use isr_handoff_lab::logging::{LogStream, TAG_MAIN};
    use isr_handoff_lab::tasks::{run_clock_task, run_led_task, run_log_drain};
    use isr_handoff_lab::{rt_info, EdgeEvent, ExerciseConfig, ExerciseContext, SetupError, TimerSample};

    type Context = ExerciseContext<'static, RtosQueue<EdgeEvent>, RtosQueue<TimerSample>>;

    /// Built at compile time; too large for the main task's stack.
    static LOG: LogStream = LogStream::new();
    static CONTEXT: StaticCell<Context> = StaticCell::new();

    /// ESP-IDF console (UART0 via stdout).
    struct ConsoleSink(std::io::Stdout);

    impl LogSink for ConsoleSink {
        fn write(&mut self, bytes: &[u8]) {
            let _ = self.0.write_all(bytes);
            let _ = self.0.flush();
        }
    }

    fn spawn<F>(name: &str, stack_size: usize, body: F) -> Result<(), SetupError>
    where
        F: FnOnce() + Send + 'static,
    {
        thread::Builder::new()
            .name(name.into())
            .stack_size(stack_size)
            .spawn(body)
            .map(|_| ())
            .map_err(|_| SetupError::TaskSpawn)
    }

    pub fn start() -> Result<(), SetupError> {
        esp_idf_svc::sys::link_patches();

        let config = ExerciseConfig::DEFAULT;
        config.validate()?;

        let ctx: &'static Context = CONTEXT.init(ExerciseContext::new(
            config,
            RtosQueue::new(config.edge_queue_depth)?,
            RtosQueue::new(config.timer_queue_depth)?,
            &LOG,
        ));

        rt_info!(ctx.log, hal::now_us(), TAG_MAIN, "{} starting", env!("VERSION_STRING"));

        spawn("log_drain", config.task_stack_size, move || {
            run_log_drain(ctx, ConsoleSink(std::io::stdout()), hal::now_us, hal::idle)
        })?;

        let led = hal::configure_led(&config)?;
        spawn("led_task", config.task_stack_size, move || {
            run_led_task(ctx, led, hal::now_us)
        })?;
        spawn("clock_task", config.task_stack_size, move || {
            run_clock_task(ctx, hal::now_us)
        })?;

        hal::configure_inputs(&config, &ctx.edge_queue)?;
        hal::start_alarm(&config, &ctx.timer_queue)?;

        rt_info!(
            ctx.log,
            hal::now_us(),
            TAG_MAIN,
            "buttons on GPIO {:?}, LED on GPIO {}, alarm every {} ticks",
            config.input_pins(),
            config.led_pin,
            config.alarm_period_ticks
        );

        Ok(())
    }
}

#[cfg(target_os = "espidf")]
fn main() -> Result<(), isr_handoff_lab::SetupError> {
    firmware::start()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!(
        "{}: firmware image only; build for the espidf target to flash it",
        env!("VERSION_STRING")
    );
}
