use crate::error::SampleError;
use sysinfo::System;

/// Percent of memory not available to new allocations.
pub fn collect(sys: &mut System) -> Result<f64, SampleError> {
    sys.refresh_memory();
    let total = sys.total_memory();
    if total == 0 {
        return Err(SampleError::NoMemory);
    }
    let available = sys.available_memory();
    Ok(total.saturating_sub(available) as f64 / total as f64 * 100.0)
}
