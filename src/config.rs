/*!
 # Controller configuration

 Explicit configuration value object for the schedule controller. Everything
 the controller needs is collected here at construction time; there are no
 implicit globals.
*/

use std::time::Duration;

use crate::schedule::ScheduleWindow;
use crate::Result;

/// Configuration for a [`ScheduleController`](crate::ScheduleController).
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// GPIO line driving the relay (active-high)
    pub control_pin: u32,
    /// Timezone applied via the `TZ` environment mechanism (e.g. "Europe/Lisbon")
    pub timezone: String,
    /// HHMM time at which the relay turns on (exclusive boundary)
    pub on_time: u16,
    /// HHMM time at which the relay turns off (exclusive boundary)
    pub off_time: u16,
    /// Cadence of the main control loop
    pub poll_interval: Duration,
    /// Cadence of the time-sync status poll during startup
    pub sync_poll_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            control_pin: 4,
            timezone: "UTC".to_string(),
            on_time: 800,
            off_time: 2000,
            poll_interval: Duration::from_secs(60),
            sync_poll_interval: Duration::from_secs(1),
        }
    }
}

impl ControllerConfig {
    /// Validates the schedule boundaries and builds the daily window.
    pub fn window(&self) -> Result<ScheduleWindow> {
        ScheduleWindow::new(self.on_time, self.off_time)
    }
}
