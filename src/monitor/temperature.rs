use crate::error::SampleError;
use std::path::Path;

/// Raw millidegree value of a sysfs thermal zone.
pub fn read_millidegrees(path: &Path) -> Result<i64, SampleError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SampleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    raw.trim().parse().map_err(|_| SampleError::Parse {
        path: path.to_path_buf(),
        contents: raw.clone(),
    })
}

pub fn millidegrees_to_celsius(millidegrees: i64) -> f64 {
    millidegrees as f64 / 1000.0
}
