use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub poll_interval_secs: u64,
    pub cpu_sample_window_ms: u64,
    pub thermal_zone_path: PathBuf,
    pub disk_mount_point: PathBuf,
    pub disk_ttl_secs: u64,
    pub ip_ttl_secs: u64,
    pub ip_probe_target: SocketAddr,
    pub ip_probe_timeout_ms: u64,
    pub bay: BayConfig,
    pub fan: Option<FanConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BayConfig {
    pub mount_points: [PathBuf; 2],
    pub poll_interval_secs: u64,
    pub mdstat_path: PathBuf,
    pub sys_block_dir: PathBuf,
}

/// Linux sysfs PWM channel driving the fan.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    pub chip: PathBuf,
    pub channel: u32,
    pub period_ns: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: 1,
            cpu_sample_window_ms: 100,
            thermal_zone_path: PathBuf::from("/sys/class/thermal/thermal_zone0/temp"),
            disk_mount_point: PathBuf::from("/"),
            disk_ttl_secs: 10,
            ip_ttl_secs: 30,
            ip_probe_target: SocketAddr::from(([8, 8, 8, 8], 80)),
            ip_probe_timeout_ms: 2000,
            bay: BayConfig::default(),
            fan: Some(FanConfig::default()),
        }
    }
}

impl Default for BayConfig {
    fn default() -> Self {
        Self {
            mount_points: [PathBuf::from("/mnt/bay0"), PathBuf::from("/mnt/bay1")],
            poll_interval_secs: 2,
            mdstat_path: PathBuf::from("/proc/mdstat"),
            sys_block_dir: PathBuf::from("/sys/block"),
        }
    }
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            chip: PathBuf::from("/sys/class/pwm/pwmchip0"),
            channel: 0,
            period_ns: 40_000,
        }
    }
}

impl Config {
    /// Reads a JSON config file; `None` yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_window_ms)
    }

    pub fn disk_ttl(&self) -> Duration {
        Duration::from_secs(self.disk_ttl_secs)
    }

    pub fn ip_ttl(&self) -> Duration {
        Duration::from_secs(self.ip_ttl_secs)
    }

    pub fn ip_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.ip_probe_timeout_ms.max(1))
    }
}

impl BayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
