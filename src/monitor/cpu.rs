use crate::error::SampleError;
use std::time::Duration;
use sysinfo::System;

/// Global utilization over `window`; blocks the caller for the whole window.
pub fn collect(sys: &mut System, window: Duration) -> Result<f64, SampleError> {
    sys.refresh_cpu_usage();
    std::thread::sleep(window);
    sys.refresh_cpu_usage();
    if sys.cpus().is_empty() {
        return Err(SampleError::NoCpu);
    }
    Ok(f64::from(sys.global_cpu_usage()))
}
