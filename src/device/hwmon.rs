//! hwmon-backed GPU fan device.
//!
//! Owns the `pwm1_enable`, `temp1_input` and `pwm1` channels of one hwmon
//! directory and remembers the state they had before we took over.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::device::FanDevice;
use crate::error::{FanError, Result};
use crate::temperature::Temperature;

// =============================================================================
// Constants
// =============================================================================

/// Fan control mode channel.
pub const MODE_CHANNEL: &str = "pwm1_enable";

/// Temperature sensor channel (millidegrees Celsius).
pub const TEMP_CHANNEL: &str = "temp1_input";

/// Duty cycle channel (0-255).
pub const DUTY_CHANNEL: &str = "pwm1";

// =============================================================================
// PWM Mode
// =============================================================================

/// Fan control mode as exposed by `pwm1_enable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmMode {
    /// Fan control disabled (fan runs at full speed on amdgpu).
    Disabled = 0,
    /// Duty cycle driven through `pwm1`.
    Manual = 1,
    /// Firmware-controlled fan curve.
    Automatic = 2,
}

impl TryFrom<u8> for PwmMode {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(PwmMode::Disabled),
            1 => Ok(PwmMode::Manual),
            2 => Ok(PwmMode::Automatic),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for PwmMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PwmMode::Disabled => write!(f, "Disabled"),
            PwmMode::Manual => write!(f, "Manual"),
            PwmMode::Automatic => write!(f, "Automatic"),
        }
    }
}

/// Channel values captured before the first write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalState {
    pub mode: PwmMode,
    pub duty: u8,
}

// =============================================================================
// Channel
// =============================================================================

/// One open sysfs attribute.
///
/// Every read starts at offset 0 so it returns the current value; every
/// write truncates and replaces the whole content.
#[derive(Debug)]
struct Channel {
    path: PathBuf,
    file: File,
}

impl Channel {
    fn open(dir: &Path, name: &str, writable: bool) -> Result<Self> {
        let path = dir.join(name);
        let file = OpenOptions::new()
            .read(true)
            .write(writable)
            .open(&path)
            .map_err(|source| FanError::DeviceOpen {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    fn read_raw(&mut self) -> std::io::Result<String> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut content = String::new();
        self.file.read_to_string(&mut content)?;
        Ok(content)
    }

    fn read(&mut self) -> Result<String> {
        self.read_raw().map_err(|source| FanError::ChannelRead {
            path: self.path.clone(),
            source,
        })
    }

    fn parse<T: std::str::FromStr>(&self, content: &str) -> Result<T> {
        content
            .trim()
            .parse()
            .map_err(|_| FanError::InvalidChannelValue {
                path: self.path.clone(),
                value: content.trim().to_string(),
            })
    }

    fn write_raw(&mut self, content: &str) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.set_len(0)?;
        self.file.write_all(content.as_bytes())?;
        self.file.flush()
    }

    fn write(&mut self, value: u8) -> Result<()> {
        self.write_raw(&format!("{}\n", value))
            .map_err(|source| FanError::ChannelWrite {
                path: self.path.clone(),
                source,
            })
    }
}

// =============================================================================
// HwmonDevice
// =============================================================================

/// GPU fan control surface backed by a hwmon directory.
///
/// # Example
///
/// ```no_run
/// use gpu_fan_control::device::{FanDevice, HwmonDevice, PwmMode};
///
/// let mut gpu = HwmonDevice::open("/sys/class/hwmon/hwmon2")?;
/// println!("GPU at {}", gpu.read_temperature()?);
///
/// gpu.set_mode(PwmMode::Manual)?;
/// gpu.set_duty(128)?;
/// gpu.restore()?;
/// # Ok::<(), gpu_fan_control::error::FanError>(())
/// ```
#[derive(Debug)]
pub struct HwmonDevice {
    dir: PathBuf,
    mode: Channel,
    temperature: Channel,
    duty: Channel,
    original: OriginalState,
}

impl HwmonDevice {
    /// Open the three channels in `dir` and capture the current mode and duty.
    ///
    /// Nothing is written here, so a failure leaves the hardware untouched.
    ///
    /// # Errors
    /// Returns `DeviceOpen` if a channel cannot be opened or read, and
    /// `InvalidChannelValue` if the captured mode or duty is not understood.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        let mut mode = Channel::open(&dir, MODE_CHANNEL, true)?;
        let temperature = Channel::open(&dir, TEMP_CHANNEL, false)?;
        let mut duty = Channel::open(&dir, DUTY_CHANNEL, true)?;

        let original = OriginalState {
            mode: capture_mode(&mut mode)?,
            duty: capture(&mut duty)?,
        };

        info!(
            "Acquired {} (original mode: {}, duty: {})",
            dir.display(),
            original.mode,
            original.duty
        );

        Ok(Self {
            dir,
            mode,
            temperature,
            duty,
            original,
        })
    }

    /// Directory this device was opened from.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// State captured when the device was opened.
    pub fn original_state(&self) -> OriginalState {
        self.original
    }

    /// Read the mode channel back.
    pub fn read_mode(&mut self) -> Result<PwmMode> {
        let content = self.mode.read()?;
        let raw: u8 = self.mode.parse(&content)?;
        PwmMode::try_from(raw).map_err(|_| FanError::InvalidChannelValue {
            path: self.mode.path.clone(),
            value: content.trim().to_string(),
        })
    }

    /// Read the duty channel back.
    pub fn read_duty(&mut self) -> Result<u8> {
        let content = self.duty.read()?;
        self.duty.parse(&content)
    }
}

fn capture(channel: &mut Channel) -> Result<u8> {
    let content = channel.read_raw().map_err(|source| FanError::DeviceOpen {
        path: channel.path.clone(),
        source,
    })?;
    channel.parse(&content)
}

fn capture_mode(channel: &mut Channel) -> Result<PwmMode> {
    let raw = capture(channel)?;
    PwmMode::try_from(raw).map_err(|value| FanError::InvalidChannelValue {
        path: channel.path.clone(),
        value: value.to_string(),
    })
}

impl FanDevice for HwmonDevice {
    fn read_temperature(&mut self) -> Result<Temperature> {
        let content = self.temperature.read()?;
        let millicelsius: i64 = self.temperature.parse(&content)?;
        Ok(Temperature::from_millicelsius(millicelsius))
    }

    fn set_mode(&mut self, mode: PwmMode) -> Result<()> {
        debug!("Setting fan mode to {}", mode);
        self.mode.write(mode as u8)
    }

    fn set_duty(&mut self, duty: u8) -> Result<()> {
        self.duty.write(duty)
    }

    /// Write back the original duty, then the original mode.
    ///
    /// The mode is written even if the duty write fails, so the firmware
    /// gets control back; the first error is returned. Safe to call more
    /// than once; each call re-applies the same values.
    fn restore(&mut self) -> Result<()> {
        let OriginalState { mode, duty } = self.original;
        let duty_result = self.duty.write(duty);
        if let Err(e) = &duty_result {
            warn!("Could not restore duty {}: {}", duty, e);
        }
        let mode_result = self.mode.write(mode as u8);

        duty_result.and(mode_result)?;
        info!("Restored fan mode {} with duty {}", mode, duty);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
