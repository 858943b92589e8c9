//! GPU Fan Control CLI
//!
//! Takes manual control of an AMD GPU fan and drives it from the GPU
//! temperature until interrupted, then hands control back to the firmware.

use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gpu_fan_control::FanError;
use gpu_fan_control::config::UPDATE_INTERVAL;
use gpu_fan_control::cooling::Driver;
use gpu_fan_control::device::{DEFAULT_SYSFS_ROOT, HwmonDevice, find_hwmon};
use gpu_fan_control::storage::{self, StoredThresholds};
use gpu_fan_control::utils::parsing::{parse_millicelsius, resolve_thresholds};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Temperature-driven fan control for AMD GPUs
#[derive(Parser, Debug)]
#[command(name = "gpu-fan-control")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
TEMP must be an integer in millidegrees Celsius.
GPU fans will be off when the GPU temperature is below the lower TEMP.
GPU fans will be at full speed when the GPU temperature is above the higher TEMP.
Fans are proportionally controlled between those values.
Without TEMP arguments the thresholds saved with --save are used.")]
struct Args {
    /// First threshold temperature (m°C)
    #[arg(
        value_name = "TEMP",
        value_parser = parse_millicelsius,
        allow_negative_numbers = true,
        requires = "second"
    )]
    first: Option<i64>,

    /// Second threshold temperature (m°C)
    #[arg(
        value_name = "TEMP",
        value_parser = parse_millicelsius,
        allow_negative_numbers = true
    )]
    second: Option<i64>,

    /// Remember the given thresholds for later runs without arguments
    #[arg(long, requires = "second")]
    save: bool,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    init_logging();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_exit_status(&e));
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            match hint_for(&e) {
                Hint::Usage => eprintln!("\n{}", Args::command().render_usage()),
                Hint::Permission => {
                    eprintln!("💡 Fan control needs write access to hwmon. Try running as root.")
                }
                Hint::None => {}
            }
            ExitCode::from(FAILURE_STATUS)
        }
    }
}

/// Exit status for startup or fatal loop failures.
const FAILURE_STATUS: u8 = 1;

/// Extra guidance printed after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hint {
    Usage,
    Permission,
    None,
}

/// `--help`/`--version` exit 0, every real parse error exits 1.
fn parse_exit_status(e: &clap::Error) -> u8 {
    if e.use_stderr() { FAILURE_STATUS } else { 0 }
}

fn hint_for(e: &anyhow::Error) -> Hint {
    match e.downcast_ref::<FanError>() {
        Some(FanError::InvalidArgument(_) | FanError::DegenerateRange(..)) => Hint::Usage,
        Some(err) if err.is_permission_denied() => Hint::Permission,
        _ => Hint::None,
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// Fan Control
// =============================================================================

fn run(args: &Args) -> Result<()> {
    // Thresholds
    let given = args.first.zip(args.second);
    let stored = if given.is_none() {
        storage::load_thresholds().context("Failed to load saved thresholds")?
    } else {
        None
    };
    let thresholds = resolve_thresholds(given, stored)?;

    if args.save {
        let path = storage::save_thresholds(&StoredThresholds::from(&thresholds))
            .context("Failed to save thresholds")?;
        info!("Saved thresholds to {}", path.display());
    }

    // Device
    let path = find_hwmon(DEFAULT_SYSFS_ROOT).context("Failed to locate GPU fan")?;
    let device = HwmonDevice::open(&path)
        .with_context(|| format!("Failed to open fan controls in {}", path.display()))?;

    // Signal handlers go in only once there is something to restore
    let (stop_tx, stop_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .context("Failed to set termination handler")?;

    info!(
        "GPU fan control v{} started ({}, Ctrl+C to stop)",
        env!("CARGO_PKG_VERSION"),
        thresholds
    );

    let mut driver = Driver::new(device, thresholds);
    let mut stdout = std::io::stdout().lock();
    driver
        .run(&stop_rx, UPDATE_INTERVAL, &mut stdout)
        .context("Fan control stopped")?;

    info!("✅ Fan control stopped after {} cycles.", driver.ticks());
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("gpu-fan-control").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_thresholds() {
        let args = parse(&["-5000", "80000"]).unwrap();
        assert_eq!(args.first.zip(args.second), Some((-5_000, 80_000)));
        assert!(!args.save);

        let args = parse(&[]).unwrap();
        assert_eq!(args.first.zip(args.second), None);
    }

    #[test]
    fn test_parse_errors_exit_one() {
        for bad in [
            &["30000"][..],
            &["warm", "80000"][..],
            &["--save"][..],
            &["1", "2", "3"][..],
        ] {
            let err = parse(bad).unwrap_err();
            assert_eq!(parse_exit_status(&err), 1, "args: {:?}", bad);
        }
    }

    #[test]
    fn test_help_and_version_exit_zero() {
        for flag in ["--help", "--version"] {
            let err = parse(&[flag]).unwrap_err();
            assert_eq!(parse_exit_status(&err), 0, "flag: {}", flag);
        }
    }

    #[test]
    fn test_threshold_errors_print_usage() {
        let err = anyhow::Error::from(FanError::DegenerateRange(40_000, 40_000));
        assert_eq!(hint_for(&err), Hint::Usage);

        let err = anyhow::Error::from(FanError::InvalidArgument("missing".into()))
            .context("Failed to resolve thresholds");
        assert_eq!(hint_for(&err), Hint::Usage);
    }

    #[test]
    fn test_permission_denied_prints_hint() {
        let err = anyhow::Error::from(FanError::DeviceOpen {
            path: PathBuf::from("/sys/class/hwmon/hwmon1/pwm1"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        })
        .context("Failed to open fan controls");
        assert_eq!(hint_for(&err), Hint::Permission);

        let err = anyhow::Error::from(FanError::DeviceNotFound(PathBuf::from("/")));
        assert_eq!(hint_for(&err), Hint::None);
    }
}
