/*!
 # Daily scheduling window for the relay

 This module holds the pure scheduling logic: the HHMM time-of-day encoding,
 the ON/OFF window and the mapping from a sampled time to the desired relay
 state. No I/O happens here; the controller applies the result.
*/

use crate::{Error, Result};

/// The two observable states of the relay output line.
///
/// The line is active-high: `On` drives logic level 1 (relay energized),
/// `Off` drives logic level 0 (relay released). The "never evaluated yet"
/// pre-state is represented by `Option<RelayState>` at the call sites, not
/// by a third variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Relay de-energized, output at logic level 0
    Off,
    /// Relay energized, output at logic level 1
    On,
}

impl RelayState {
    /// Logic level to drive on the output line for this state
    pub fn level(self) -> bool {
        matches!(self, RelayState::On)
    }

    /// Numeric level value, as reported in transition logs
    pub fn level_value(self) -> u8 {
        self.level() as u8
    }
}

impl std::fmt::Display for RelayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayState::Off => write!(f, "OFF"),
            RelayState::On => write!(f, "ON"),
        }
    }
}

/// Encodes an hour/minute pair as an HHMM integer (e.g. 14:05 -> 1405).
///
/// This is the representation used for the numeric range comparison against
/// the schedule boundaries.
pub fn hhmm(hour: u32, minute: u32) -> u16 {
    (hour * 100 + minute) as u16
}

/// A daily ON/OFF window with minute resolution.
///
/// Both boundaries are HHMM-encoded times of day. The window is exclusive on
/// both ends: the relay is ON strictly between `on_time` and `off_time`, and
/// OFF at exactly either boundary.
///
/// A window must not cross midnight: with `on_time >= off_time` the strict
/// comparison never holds and the relay stays OFF all day. Construction flags
/// this but does not reject it, so the behavior stays reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    /// HHMM time at which the window opens (exclusive)
    pub on_time: u16,
    /// HHMM time at which the window closes (exclusive)
    pub off_time: u16,
}

impl ScheduleWindow {
    /// Creates a window after validating both boundaries as HHMM encodings.
    pub fn new(on_time: u16, off_time: u16) -> Result<Self> {
        for t in [on_time, off_time] {
            if t > 2359 || t % 100 > 59 {
                return Err(Error::InvalidHhmm(t));
            }
        }
        if on_time >= off_time {
            // Midnight-crossing windows are not supported; the relay would
            // never turn on. Warn rather than fail so the operator sees it.
            tracing::warn!(
                on_time,
                off_time,
                "Schedule window never opens (on_time >= off_time); relay will stay OFF"
            );
        }
        Ok(Self { on_time, off_time })
    }

    /// Desired relay state for the given HHMM time-of-day.
    ///
    /// Pure function of the sampled time and this window: ON iff
    /// `on_time < now < off_time`, strict on both sides.
    pub fn desired_state(&self, now_hhmm: u16) -> RelayState {
        if self.on_time < now_hhmm && now_hhmm < self.off_time {
            RelayState::On
        } else {
            RelayState::Off
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> ScheduleWindow {
        ScheduleWindow::new(800, 2000).unwrap()
    }

    #[test]
    fn hhmm_encoding() {
        assert_eq!(hhmm(0, 0), 0);
        assert_eq!(hhmm(14, 5), 1405);
        assert_eq!(hhmm(23, 59), 2359);
    }

    #[test]
    fn off_before_window_opens() {
        assert_eq!(window().desired_state(759), RelayState::Off);
    }

    #[test]
    fn on_inside_window() {
        assert_eq!(window().desired_state(801), RelayState::On);
        assert_eq!(window().desired_state(1200), RelayState::On);
        assert_eq!(window().desired_state(1959), RelayState::On);
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(window().desired_state(800), RelayState::Off);
        assert_eq!(window().desired_state(2000), RelayState::Off);
    }

    #[test]
    fn off_after_window_closes() {
        assert_eq!(window().desired_state(2001), RelayState::Off);
        assert_eq!(window().desired_state(2359), RelayState::Off);
    }

    #[test]
    fn matches_range_predicate_over_full_day() {
        let w = window();
        for hour in 0..24u32 {
            for minute in 0..60u32 {
                let t = hhmm(hour, minute);
                let expected = if w.on_time < t && t < w.off_time {
                    RelayState::On
                } else {
                    RelayState::Off
                };
                assert_eq!(w.desired_state(t), expected, "at {:04}", t);
            }
        }
    }

    #[test]
    fn desired_state_is_idempotent() {
        let w = window();
        for t in [0, 759, 800, 801, 1959, 2000, 2359] {
            assert_eq!(w.desired_state(t), w.desired_state(t));
        }
    }

    #[test]
    fn rejects_invalid_hhmm() {
        assert!(matches!(
            ScheduleWindow::new(2400, 2000),
            Err(Error::InvalidHhmm(2400))
        ));
        assert!(matches!(
            ScheduleWindow::new(800, 1975),
            Err(Error::InvalidHhmm(1975))
        ));
    }

    #[test]
    fn inverted_window_is_accepted_but_never_opens() {
        // ON 22:00 .. 06:00 would cross midnight; the strict comparison
        // evaluates OFF at every sample.
        let w = ScheduleWindow::new(2200, 600).unwrap();
        for t in [0, 300, 600, 1200, 2200, 2300, 2359] {
            assert_eq!(w.desired_state(t), RelayState::Off);
        }
    }

    #[test]
    fn relay_state_levels() {
        assert!(RelayState::On.level());
        assert!(!RelayState::Off.level());
        assert_eq!(RelayState::On.level_value(), 1);
        assert_eq!(RelayState::Off.level_value(), 0);
        assert_eq!(RelayState::On.to_string(), "ON");
        assert_eq!(RelayState::Off.to_string(), "OFF");
    }
}
