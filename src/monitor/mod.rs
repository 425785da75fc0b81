mod cpu;
pub mod disk;
mod ip;
mod memory;
mod network;
pub mod temperature;

use crate::config::Config;
use crate::error::SampleError;
use crate::model::{DiskUsage, NetCounters};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use sysinfo::{Disks, Networks, System};

/// Host readings consumed by the sampler, one call per metric per tick.
pub trait MetricSource {
    fn cpu_percent(&mut self, window: Duration) -> Result<f64, SampleError>;
    fn memory_percent(&mut self) -> Result<f64, SampleError>;
    fn temperature_millidegrees(&mut self) -> Result<i64, SampleError>;
    fn disk_usage(&mut self) -> Result<DiskUsage, SampleError>;
    fn outbound_ip(&mut self) -> Result<IpAddr, SampleError>;
    fn net_counters(&mut self) -> Result<NetCounters, SampleError>;
}

pub struct HostMonitor {
    sys: System,
    networks: Networks,
    disks: Disks,
    thermal_zone: PathBuf,
    disk_mount_point: PathBuf,
    ip_probe_target: SocketAddr,
    ip_probe_timeout: Duration,
}

impl HostMonitor {
    pub fn new(config: &Config) -> Self {
        let mut sys = System::new_all();
        sys.refresh_cpu_usage();
        Self {
            sys,
            networks: Networks::new_with_refreshed_list(),
            disks: Disks::new_with_refreshed_list(),
            thermal_zone: config.thermal_zone_path.clone(),
            disk_mount_point: config.disk_mount_point.clone(),
            ip_probe_target: config.ip_probe_target,
            ip_probe_timeout: config.ip_probe_timeout(),
        }
    }
}

impl MetricSource for HostMonitor {
    fn cpu_percent(&mut self, window: Duration) -> Result<f64, SampleError> {
        cpu::collect(&mut self.sys, window)
    }

    fn memory_percent(&mut self) -> Result<f64, SampleError> {
        memory::collect(&mut self.sys)
    }

    fn temperature_millidegrees(&mut self) -> Result<i64, SampleError> {
        temperature::read_millidegrees(&self.thermal_zone)
    }

    fn disk_usage(&mut self) -> Result<DiskUsage, SampleError> {
        disk::collect(&mut self.disks, &self.disk_mount_point)
    }

    fn outbound_ip(&mut self) -> Result<IpAddr, SampleError> {
        ip::outbound_ip(self.ip_probe_target, self.ip_probe_timeout)
    }

    fn net_counters(&mut self) -> Result<NetCounters, SampleError> {
        Ok(network::collect(&mut self.networks))
    }
}
