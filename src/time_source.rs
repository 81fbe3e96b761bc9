/*!
 # Wall-clock time source abstraction

 The controller never reads the clock directly; it goes through the
 [`TimeSource`] trait so tests can script time and the daemon can wrap the
 OS clock. The trait mirrors what a network-synchronized clock provides: a
 readiness flag plus the current local time.
*/

use chrono::{Datelike, Local, NaiveDateTime};

/// Readiness of the external time-synchronization subsystem.
///
/// Mirrors the states an SNTP-style client moves through: `Reset` before the
/// first exchange, `InProgress` while a smooth adjustment is underway,
/// `Completed` once the clock has been set from the network at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No synchronization has happened yet
    Reset,
    /// A time adjustment is currently being applied
    InProgress,
    /// The clock has been set from a trusted source at least once
    Completed,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Reset => write!(f, "reset"),
            SyncStatus::InProgress => write!(f, "in-progress"),
            SyncStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Source of local wall-clock time for the schedule controller.
pub trait TimeSource {
    /// Non-blocking, side-effect-free readiness query.
    fn sync_status(&self) -> SyncStatus;

    /// Current local wall-clock time.
    ///
    /// Only meaningful once [`sync_status`](Self::sync_status) has returned
    /// [`SyncStatus::Completed`].
    fn now(&self) -> NaiveDateTime;
}

/// A clock freshly booted without a battery-backed RTC reads the Unix epoch;
/// any year at or past this one means NTP (or the OS) has set it.
const SYNCED_YEAR_FLOOR: i32 = 2020;

/// [`TimeSource`] over the operating system clock.
///
/// The OS (via systemd-timesyncd, chrony or similar) owns the actual NTP
/// exchange; this adapter only decides whether the clock looks set yet. A
/// never-synchronized clock still reads 1970, so the readiness check is a
/// plausibility test on the year.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn sync_status(&self) -> SyncStatus {
        if Local::now().year() >= SYNCED_YEAR_FLOOR {
            SyncStatus::Completed
        } else {
            SyncStatus::Reset
        }
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
