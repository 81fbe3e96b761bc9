/*!
 # Digital output driver abstraction

 The controller drives the relay through the [`OutputDriver`] trait. The
 shipped implementation, [`SysfsGpio`], talks to the Linux sysfs GPIO
 interface; tests substitute a recording mock.
*/

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::{Error, Result};

/// A single digital output line.
///
/// `set_level` is expected to be idempotent and immediate; there is no
/// asynchronous completion to wait for.
pub trait OutputDriver {
    /// Configures the line as an output. Must be called before `set_level`.
    fn configure_as_output(&mut self) -> Result<()>;

    /// Drives the line to the given logic level (true = high).
    fn set_level(&mut self, high: bool) -> Result<()>;
}

/// [`OutputDriver`] over the Linux sysfs GPIO interface.
///
/// Exports the pin through `/sys/class/gpio/export`, sets its direction to
/// `out` and writes `1`/`0` to the value file. Re-exporting a pin that is
/// already exported (EBUSY) is accepted, so a restart after a crash does not
/// fail on a leftover export.
pub struct SysfsGpio {
    pin: u32,
    base: PathBuf,
}

impl SysfsGpio {
    pub fn new(pin: u32) -> Self {
        Self::with_base(pin, PathBuf::from("/sys/class/gpio"))
    }

    /// Uses an alternate sysfs root. Test hook.
    pub fn with_base(pin: u32, base: PathBuf) -> Self {
        Self { pin, base }
    }

    fn pin_path(&self, file: &str) -> PathBuf {
        self.base.join(format!("gpio{}", self.pin)).join(file)
    }

    fn export(&self) -> io::Result<()> {
        let mut f = match fs::OpenOptions::new()
            .write(true)
            .open(self.base.join("export"))
        {
            Ok(f) => f,
            // No export file means the pin directories are managed elsewhere
            // (or we are pointed at a test fixture); nothing to do.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        match f.write_all(self.pin.to_string().as_bytes()) {
            Ok(()) => Ok(()),
            // EBUSY: already exported.
            Err(e) if e.raw_os_error() == Some(16) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl OutputDriver for SysfsGpio {
    fn configure_as_output(&mut self) -> Result<()> {
        debug!("Configuring GPIO pin {} as output", self.pin);
        self.export().map_err(|source| Error::GpioExport {
            pin: self.pin,
            source,
        })?;
        fs::write(self.pin_path("direction"), b"out").map_err(|source| Error::GpioConfigure {
            pin: self.pin,
            source,
        })?;
        Ok(())
    }

    fn set_level(&mut self, high: bool) -> Result<()> {
        let level = high as u8;
        trace!("Writing level {} to GPIO pin {}", level, self.pin);
        fs::write(self.pin_path("value"), if high { b"1" } else { b"0" }).map_err(|source| {
            Error::GpioWrite {
                pin: self.pin,
                level,
                source,
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fixture(pin: u32) -> (tempfile::TempDir, SysfsGpio) {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(format!("gpio{pin}"))).unwrap();
        let gpio = SysfsGpio::with_base(pin, dir.path().to_path_buf());
        (dir, gpio)
    }

    #[test]
    fn configure_writes_direction() {
        let (dir, mut gpio) = fixture(4);
        gpio.configure_as_output().unwrap();
        let direction = fs::read_to_string(dir.path().join("gpio4/direction")).unwrap();
        assert_eq!(direction, "out");
    }

    #[test]
    fn set_level_writes_value_file() {
        let (dir, mut gpio) = fixture(4);
        gpio.configure_as_output().unwrap();

        gpio.set_level(true).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("gpio4/value")).unwrap(),
            "1"
        );

        gpio.set_level(false).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("gpio4/value")).unwrap(),
            "0"
        );
    }

    #[test]
    fn missing_pin_directory_is_a_configure_error() {
        let dir = tempdir().unwrap();
        let mut gpio = SysfsGpio::with_base(7, dir.path().to_path_buf());
        match gpio.configure_as_output() {
            Err(Error::GpioConfigure { pin: 7, .. }) => {}
            other => panic!("expected GpioConfigure error, got {other:?}"),
        }
    }
}
