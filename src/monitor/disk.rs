use crate::error::SampleError;
use crate::model::DiskUsage;
use std::path::Path;
use sysinfo::{Disk, Disks};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn collect(disks: &mut Disks, mount_point: &Path) -> Result<DiskUsage, SampleError> {
    disks.refresh(true);
    find(disks, mount_point)
        .map(usage)
        .ok_or_else(|| SampleError::DiskNotFound(mount_point.to_path_buf()))
}

pub fn find<'a>(disks: &'a Disks, mount_point: &Path) -> Option<&'a Disk> {
    disks.iter().find(|d| d.mount_point() == mount_point)
}

pub fn usage(disk: &Disk) -> DiskUsage {
    usage_from_bytes(disk.total_space(), disk.available_space())
}

pub fn usage_from_bytes(total: u64, available: u64) -> DiskUsage {
    let used = total.saturating_sub(available);
    let percent = if total > 0 {
        used as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    DiskUsage {
        total_gb: total as f64 / GIB,
        used_gb: used as f64 / GIB,
        percent,
    }
}
