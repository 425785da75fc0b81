use crate::config::FanConfig;
use crate::error::FanError;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const MIN_DUTY: f64 = 0.4;
pub const MAX_DUTY: f64 = 1.0;
const RAMP_START_C: f64 = 45.0;
const FULL_SPEED_C: f64 = 65.0;

/// Fan duty for a temperature: floor below 45°C, full speed from 65°C, linear in between.
pub fn duty_cycle(temp_c: f64) -> f64 {
    let duty = if temp_c < RAMP_START_C {
        MIN_DUTY
    } else if temp_c >= FULL_SPEED_C {
        MAX_DUTY
    } else {
        0.2 + (temp_c - RAMP_START_C) * (0.8 / (FULL_SPEED_C - RAMP_START_C))
    };
    duty.clamp(MIN_DUTY, MAX_DUTY)
}

pub trait FanOutput {
    /// `duty` is in `[0, 1]`.
    fn set_duty(&mut self, duty: f64) -> Result<(), FanError>;
}

/// Stand-in when no fan is wired up.
#[derive(Debug, Default)]
pub struct NullFan;

impl FanOutput for NullFan {
    fn set_duty(&mut self, duty: f64) -> Result<(), FanError> {
        debug!("No fan configured, ignoring duty {duty:.2}");
        Ok(())
    }
}

impl<F: FanOutput + ?Sized> FanOutput for Box<F> {
    fn set_duty(&mut self, duty: f64) -> Result<(), FanError> {
        (**self).set_duty(duty)
    }
}

/// A Linux sysfs PWM channel, exported on open and released on drop.
#[derive(Debug)]
pub struct SysfsPwm {
    chip: PathBuf,
    channel: u32,
    channel_dir: PathBuf,
    period_ns: u64,
}

impl SysfsPwm {
    pub fn open(config: &FanConfig) -> Result<Self, FanError> {
        let channel_dir = config.chip.join(format!("pwm{}", config.channel));
        if !channel_dir.is_dir() {
            write_attr(&config.chip.join("export"), config.channel)?;
            if !channel_dir.is_dir() {
                return Err(FanError::ChannelMissing(channel_dir));
            }
        }

        let period_ns = config.period_ns.max(1);
        let mut pwm = Self {
            chip: config.chip.clone(),
            channel: config.channel,
            channel_dir,
            period_ns,
        };
        // duty_cycle may never exceed period, so zero it before changing the period.
        write_attr(&pwm.channel_dir.join("duty_cycle"), 0)?;
        write_attr(&pwm.channel_dir.join("period"), period_ns)?;
        pwm.set_duty(MIN_DUTY)?;
        write_attr(&pwm.channel_dir.join("enable"), 1)?;
        info!("Fan PWM ready on {}", pwm.channel_dir.display());
        Ok(pwm)
    }
}

impl FanOutput for SysfsPwm {
    fn set_duty(&mut self, duty: f64) -> Result<(), FanError> {
        let duty_ns = (self.period_ns as f64 * duty.clamp(0.0, 1.0)).round() as u64;
        write_attr(&self.channel_dir.join("duty_cycle"), duty_ns)
    }
}

impl Drop for SysfsPwm {
    fn drop(&mut self) {
        let released = write_attr(&self.channel_dir.join("enable"), 0)
            .and_then(|()| write_attr(&self.chip.join("unexport"), self.channel));
        match released {
            Ok(()) => info!("Fan PWM released"),
            Err(e) => error!("Error releasing fan PWM: {e}"),
        }
    }
}

fn write_attr(path: &Path, value: impl ToString) -> Result<(), FanError> {
    std::fs::write(path, value.to_string()).map_err(|source| FanError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Applies the fan curve once per tick; write failures are logged, never propagated.
pub struct FanController<F> {
    output: F,
    last_duty: Option<f64>,
}

impl<F: FanOutput> FanController<F> {
    pub fn new(output: F) -> Self {
        Self {
            output,
            last_duty: None,
        }
    }

    pub fn apply(&mut self, temp_c: f64) -> f64 {
        let duty = duty_cycle(temp_c);
        match self.output.set_duty(duty) {
            Ok(()) => self.last_duty = Some(duty),
            Err(e) => error!("Error controlling fan: {e}"),
        }
        duty
    }

    /// Last duty successfully written to the output.
    pub fn last_duty(&self) -> Option<f64> {
        self.last_duty
    }
}
