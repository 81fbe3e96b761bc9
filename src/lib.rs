/*!
 # Schedule-Controlled Relay Switch

 A Rust library for driving a single relay from a daily wall-clock schedule.
 The relay is switched ON while the local time-of-day sits inside a configured
 window and OFF otherwise, but only after the system clock has been set from a
 trusted network time source at least once.

 ## Features

 * Daily ON/OFF window with minute resolution (HHMM encoding)
 * Blocks until wall-clock time is trustworthy before scheduling
 * Idempotent output commands (one write per state transition)
 * Pluggable time source and output driver for deterministic testing
 * Linux sysfs GPIO adapter for real hardware

 ## Example

 ```rust,no_run
 use sched_relay::*;

 #[tokio::main]
 async fn main() -> Result<()> {
     // Initialize tracing for logs
     tracing_subscriber::fmt::init();

     let config = ControllerConfig::default();
     let mut controller = ScheduleController::new(
         config.clone(),
         SystemTimeSource::new(),
         SysfsGpio::new(config.control_pin),
     )?;

     // Drive the relay forever; returns only on an unrecoverable output error
     controller.initialize()?;
     controller.wait_for_sync().await;
     controller.run().await
 }
 ```
*/

use thiserror::Error;

/// Custom error types for the relay scheduler library
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to export the GPIO line to userspace
    #[error("Could not export GPIO pin {pin}: {source}")]
    GpioExport {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    /// Failed to configure the GPIO line as an output
    #[error("Could not configure GPIO pin {pin} as output: {source}")]
    GpioConfigure {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a logic level to the GPIO line
    #[error("Could not write level {level} to GPIO pin {pin}: {source}")]
    GpioWrite {
        pin: u32,
        level: u8,
        #[source]
        source: std::io::Error,
    },

    /// A schedule boundary is not a valid HHMM time-of-day
    #[error("Invalid HHMM time {0}: expected hour 00-23 and minute 00-59")]
    InvalidHhmm(u16),

    /// Other errors
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

// Import needed for Result type extension
pub type Result<T> = std::result::Result<T, Error>;

// Re-export modules
pub mod config;
pub mod controller;
pub mod output;
pub mod schedule;
pub mod time_source;

// Re-export key types
pub use config::ControllerConfig;
pub use controller::ScheduleController;
pub use output::{OutputDriver, SysfsGpio};
pub use schedule::{RelayState, ScheduleWindow};
pub use time_source::{SyncStatus, SystemTimeSource, TimeSource};
