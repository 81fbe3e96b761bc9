use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use sched_relay::*;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GPIO line driving the relay (active-high)
    #[arg(short, long, default_value_t = 4)]
    pin: u32,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scheduler daemon (the default)
    Run {
        /// Timezone applied via the TZ environment mechanism
        #[arg(long, default_value = "UTC")]
        tz: String,
        /// HHMM time at which the relay turns on
        #[arg(long, default_value_t = 800)]
        on_time: u16,
        /// HHMM time at which the relay turns off
        #[arg(long, default_value_t = 2000)]
        off_time: u16,
        /// Seconds between schedule samples
        #[arg(long, default_value_t = 60)]
        poll_interval: u64,
        /// Seconds between time-sync polls during startup
        #[arg(long, default_value_t = 1)]
        sync_poll_interval: u64,
    },
    /// Force the relay on (wiring check)
    On,
    /// Force the relay off (wiring check)
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with env-filter overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| EnvFilter::new("sched_relay=info,schedrelay=info")),
        )
        .compact()
        .init();

    // Initialize color-eyre for pretty error reporting
    color_eyre::install()?;

    let cli = Cli::parse();
    debug!("Parsed command line arguments");

    match cli.command.unwrap_or(Commands::Run {
        tz: "UTC".to_string(),
        on_time: 800,
        off_time: 2000,
        poll_interval: 60,
        sync_poll_interval: 1,
    }) {
        Commands::Run {
            tz,
            on_time,
            off_time,
            poll_interval,
            sync_poll_interval,
        } => {
            let config = ControllerConfig {
                control_pin: cli.pin,
                timezone: tz,
                on_time,
                off_time,
                poll_interval: Duration::from_secs(poll_interval),
                sync_poll_interval: Duration::from_secs(sync_poll_interval),
            };
            run_daemon(config).await?;
        }
        Commands::On => {
            force_level(cli.pin, true)?;
        }
        Commands::Off => {
            force_level(cli.pin, false)?;
        }
    }

    Ok(())
}

/// Runs the schedule controller forever.
///
/// Any error reaching this function is unrecoverable by policy (a relay in
/// an undefined state is unsafe): the process exits nonzero and the service
/// manager or watchdog restarts it.
async fn run_daemon(config: ControllerConfig) -> Result<()> {
    info!(
        "Starting relay scheduler on pin {} with window {:04}-{:04} ({})",
        config.control_pin, config.on_time, config.off_time, config.timezone
    );

    // Apply the timezone before the first clock read
    std::env::set_var("TZ", &config.timezone);

    let output = SysfsGpio::new(config.control_pin);
    let mut controller =
        match ScheduleController::new(config, SystemTimeSource::new(), output) {
            Ok(controller) => controller,
            Err(e) => {
                error!("Invalid schedule configuration: {}", e);
                return Err(e.into());
            }
        };

    controller.initialize()?;
    controller.wait_for_sync().await;
    controller.run().await?;
    Ok(())
}

/// Drives the relay to a fixed level and exits. Useful for checking wiring
/// without waiting for the schedule.
fn force_level(pin: u32, high: bool) -> Result<()> {
    let mut gpio = SysfsGpio::new(pin);
    gpio.configure_as_output()?;
    gpio.set_level(high)?;
    info!("Relay on pin {} forced {}", pin, if high { "ON" } else { "OFF" });
    Ok(())
}
