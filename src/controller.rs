/*!
 # Time-synchronized relay state machine

 The controller owns the whole control flow: it forces the output into a
 known-safe OFF state, blocks until the time source reports a completed
 synchronization, then samples the clock once a minute and drives the relay
 to match the configured daily window. Commands are only issued when the
 desired state actually changes.

 Errors from the output driver propagate to the caller; the binary decides
 what a fatal error means (abort and let the service manager restart).
*/

use chrono::Timelike;
use tokio::time;
use tracing::{info, instrument};

use crate::config::ControllerConfig;
use crate::output::OutputDriver;
use crate::schedule::{hhmm, RelayState, ScheduleWindow};
use crate::time_source::{SyncStatus, TimeSource};
use crate::Result;

/// Drives a single relay from a daily schedule window.
///
/// Single-threaded and cooperative: every wait is a plain timed sleep, there
/// are no concurrent tasks and no cancellation path. Once [`run`] is entered
/// the controller loops until the process terminates or an output write
/// fails.
///
/// [`run`]: ScheduleController::run
pub struct ScheduleController<T, O> {
    config: ControllerConfig,
    window: ScheduleWindow,
    time_source: T,
    output: O,
    /// Last state actually applied to the output; `None` until the first
    /// evaluation, so the first tick always issues a command.
    last_applied: Option<RelayState>,
}

impl<T: TimeSource, O: OutputDriver> ScheduleController<T, O> {
    /// Builds a controller, validating the schedule window in `config`.
    pub fn new(config: ControllerConfig, time_source: T, output: O) -> Result<Self> {
        let window = config.window()?;
        Ok(Self {
            config,
            window,
            time_source,
            output,
            last_applied: None,
        })
    }

    /// Puts the physical output into a known-safe state.
    ///
    /// Configures the line as an output and drives it low before any
    /// scheduling decision is made, so the relay starts released regardless
    /// of whether time ever becomes available.
    #[instrument(skip(self))]
    pub fn initialize(&mut self) -> Result<()> {
        info!(
            "Setting up control pin {} and turning relay off",
            self.config.control_pin
        );
        self.output.configure_as_output()?;
        self.output.set_level(false)?;
        Ok(())
    }

    /// Blocks until the time source reports a completed synchronization.
    ///
    /// Polls the sync status once per `sync_poll_interval`, logging every
    /// attempt. There is deliberately no timeout: the schedule is meaningless
    /// without trusted time, so an unreachable time server stalls startup
    /// forever and leaves the relay in its safe OFF state.
    #[instrument(skip(self))]
    pub async fn wait_for_sync(&self) {
        loop {
            let status = self.time_source.sync_status();
            if status == SyncStatus::Completed {
                break;
            }
            info!("Awaiting initial time sync (status now {}) ...", status);
            time::sleep(self.config.sync_poll_interval).await;
        }
        // One announcement of the synchronized time for operator visibility.
        info!("Sync'd time: {}", self.time_source.now().format("%c"));
    }

    /// Runs one sampling iteration: read the clock, compute the desired
    /// state, and command the output if it differs from the last applied
    /// state. Valid only after [`wait_for_sync`](Self::wait_for_sync).
    pub fn tick(&mut self) -> Result<()> {
        let now = self.time_source.now();
        let now_hhmm = hhmm(now.hour(), now.minute());
        let desired = self.window.desired_state(now_hhmm);
        if self.last_applied != Some(desired) {
            let previous = self
                .last_applied
                .map_or("unknown".to_string(), |s| s.to_string());
            info!(
                "At {:04} setting relay state to {} ({}), previously {}",
                now_hhmm,
                desired,
                desired.level_value(),
                previous
            );
            self.output.set_level(desired.level())?;
            self.last_applied = Some(desired);
        }
        Ok(())
    }

    /// The main control loop. Never returns `Ok`; the only exit is an
    /// unrecoverable output error.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Entering control loop with {}s cadence",
            self.config.poll_interval.as_secs()
        );
        loop {
            self.tick()?;
            time::sleep(self.config.poll_interval).await;
        }
    }
}
