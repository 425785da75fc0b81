use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A single host reading that could not be taken this tick.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unexpected contents in {path}: {contents:?}")]
    Parse { path: PathBuf, contents: String },
    #[error("no disk mounted at {0}")]
    DiskNotFound(PathBuf),
    #[error("host reported no CPUs")]
    NoCpu,
    #[error("host reported zero total memory")]
    NoMemory,
    #[error("outbound address lookup failed: {0}")]
    Connectivity(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum FanError {
    #[error("PWM channel {0} is not available")]
    ChannelMissing(PathBuf),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
