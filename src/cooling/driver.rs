//! Control loop driver.
//!
//! Takes manual control of a [`FanDevice`], feeds each temperature reading
//! through the [`FanController`] and writes the result back until a stop
//! message arrives. Whatever ends the loop, the device is restored before
//! [`Driver::run`] returns.

use std::io::Write;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::Thresholds;
use crate::cooling::controller::{ControlOutput, FanController};
use crate::device::{FanDevice, PwmMode};
use crate::error::Result;
use crate::temperature::Temperature;

/// Lifecycle of the driver.
///
/// Threshold parsing happens before a `Driver` exists, so a driver starts
/// out in `DeviceAcquired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    DeviceAcquired,
    Running,
    Restoring,
    Exited,
}

impl std::fmt::Display for DriverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DriverState::DeviceAcquired => "DeviceAcquired",
            DriverState::Running => "Running",
            DriverState::Restoring => "Restoring",
            DriverState::Exited => "Exited",
        };
        write!(f, "{}", name)
    }
}

/// Owns the device and the controller for one control session.
pub struct Driver<D: FanDevice> {
    device: D,
    controller: FanController,
    state: DriverState,
    ticks: u64,
    status_failed: bool,
}

impl<D: FanDevice> Driver<D> {
    /// Wrap an already acquired device.
    pub fn new(device: D, thresholds: Thresholds) -> Self {
        Self {
            device,
            controller: FanController::new(thresholds),
            state: DriverState::DeviceAcquired,
            ticks: 0,
            status_failed: false,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of completed control iterations.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Run the control loop until `stop` receives a message or disconnects.
    ///
    /// A status line is written to `out` after every tick. The wait between
    /// ticks is `interval` unless a stop message cuts it short.
    ///
    /// # Errors
    /// Returns the first device error hit inside the loop, or the restore
    /// error if the loop itself ended cleanly. The device is restored in
    /// both cases.
    pub fn run<W: Write>(
        &mut self,
        stop: &Receiver<()>,
        interval: Duration,
        out: &mut W,
    ) -> Result<()> {
        let result = self.control_loop(stop, interval, out);
        if let Err(e) = &result {
            error!("Control loop failed: {}", e);
        }

        self.transition(DriverState::Restoring);
        let restored = self.device.restore();
        self.transition(DriverState::Exited);

        match (result, restored) {
            (Ok(()), restored) => restored,
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(restore_err)) => {
                error!("Restoring the fan failed as well: {}", restore_err);
                Err(e)
            }
        }
    }

    fn control_loop<W: Write>(
        &mut self,
        stop: &Receiver<()>,
        interval: Duration,
        out: &mut W,
    ) -> Result<()> {
        self.device.set_mode(PwmMode::Manual)?;
        self.transition(DriverState::Running);
        info!(
            "Controlling fan between {} every {}ms",
            self.controller.thresholds(),
            interval.as_millis()
        );

        loop {
            let output = self.tick()?;
            self.report(output, out);

            match stop.recv_timeout(interval) {
                Ok(()) => {
                    info!("Stop requested after {} ticks", self.ticks);
                    return Ok(());
                }
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Stop channel closed, shutting down");
                    return Ok(());
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }

    /// One iteration: read, compute, write.
    fn tick(&mut self) -> Result<(Temperature, ControlOutput)> {
        let temperature = self.device.read_temperature()?;
        let output = self.controller.update(temperature);
        self.device.set_duty(output.pwm)?;
        self.ticks += 1;

        debug!(
            "tick {}: {} mK → smoothed {} (pwm {})",
            self.ticks,
            temperature.millikelvin(),
            output.smoothed,
            output.pwm
        );
        Ok((temperature, output))
    }

    fn report<W: Write>(
        &mut self,
        (temperature, output): (Temperature, ControlOutput),
        out: &mut W,
    ) {
        if let Err(e) = writeln!(
            out,
            "[{:5}] 🌡️ {:>6} | Fan: {:3}% (PWM {:3})",
            self.ticks,
            temperature.to_string(),
            output.percent(),
            output.pwm
        ) {
            if self.status_failed {
                debug!("Failed to write status line: {}", e);
            } else {
                warn!("Failed to write status line: {}", e);
                self.status_failed = true;
            }
        }
    }

    fn transition(&mut self, next: DriverState) {
        debug!("Driver state {} → {}", self.state, next);
        self.state = next;
    }
}
