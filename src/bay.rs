//! External storage bay detection.
//!
//! A background thread probes the bays and publishes complete [`BayStates`] values over a
//! channel; the sampler picks up the newest one each tick without blocking.

use crate::config::BayConfig;
use crate::error::SampleError;
use crate::model::BayStates;
use crate::monitor::disk;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use sysinfo::Disks;
use tracing::{debug, error, warn};

pub trait BayProbe {
    fn probe(&mut self) -> Result<BayStates, SampleError>;
}

/// Probes bays through mounted filesystems, md arrays and block devices.
pub struct SysBayProbe {
    disks: Disks,
    mount_points: [PathBuf; 2],
    mdstat_path: PathBuf,
    sys_block_dir: PathBuf,
}

impl SysBayProbe {
    pub fn new(config: &BayConfig) -> Self {
        Self {
            disks: Disks::new_with_refreshed_list(),
            mount_points: config.mount_points.clone(),
            mdstat_path: config.mdstat_path.clone(),
            sys_block_dir: config.sys_block_dir.clone(),
        }
    }
}

impl BayProbe for SysBayProbe {
    fn probe(&mut self) -> Result<BayStates, SampleError> {
        self.disks.refresh(true);

        let mut states = BayStates::default();
        for (i, mount_point) in self.mount_points.iter().enumerate() {
            if let Some(d) = disk::find(&self.disks, mount_point) {
                states.present[i] = true;
                states.capacity_pct[i] = disk::usage(d).percent.round().clamp(0.0, 100.0) as u8;
            }
        }

        states.raid = raid_active(&self.mdstat_path)?;
        let mounted = states.present.iter().filter(|p| **p).count();
        states.detected_unmounted = count_block_devices(&self.sys_block_dir)? > mounted;
        Ok(states)
    }
}

/// True when `/proc/mdstat` lists at least one active array. No md driver means no RAID.
fn raid_active(mdstat: &Path) -> Result<bool, SampleError> {
    let contents = match std::fs::read_to_string(mdstat) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(source) => {
            return Err(SampleError::Read {
                path: mdstat.to_path_buf(),
                source,
            })
        }
    };
    Ok(contents.lines().any(|line| {
        line.starts_with("md")
            && line
                .split_once(" : ")
                .is_some_and(|(_, state)| state.starts_with("active"))
    }))
}

fn count_block_devices(sys_block: &Path) -> Result<usize, SampleError> {
    let entries = match std::fs::read_dir(sys_block) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(SampleError::Read {
                path: sys_block.to_path_buf(),
                source,
            })
        }
    };
    Ok(entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("sd"))
        .count())
}

/// Handle to the polling thread; dropping it stops and joins the thread.
pub struct BayPoller {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl BayPoller {
    pub fn spawn<P>(mut probe: P, interval: Duration) -> io::Result<(Self, BayReceiver)>
    where
        P: BayProbe + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("bay-poller".to_string())
            .spawn(move || loop {
                match probe.probe() {
                    Ok(states) => {
                        if tx.send(states).is_err() {
                            debug!("Bay receiver dropped, stopping poller");
                            break;
                        }
                    }
                    Err(e) => error!("Error probing storage bays: {e}"),
                }
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    _ => break,
                }
            })?;

        Ok((
            Self {
                stop: Some(stop_tx),
                handle: Some(handle),
            },
            BayReceiver::new(rx),
        ))
    }
}

impl Drop for BayPoller {
    fn drop(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Bay poller thread panicked");
            }
        }
    }
}

/// Reader side of the bay channel; remembers the newest published value.
pub struct BayReceiver {
    rx: Receiver<BayStates>,
    latest: BayStates,
    disconnected: bool,
}

impl BayReceiver {
    pub fn new(rx: Receiver<BayStates>) -> Self {
        Self {
            rx,
            latest: BayStates::default(),
            disconnected: false,
        }
    }

    /// Never blocks.
    pub fn latest(&mut self) -> BayStates {
        loop {
            match self.rx.try_recv() {
                Ok(states) => self.latest = states,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        warn!("Bay poller stopped, keeping last known bay states");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }
        self.latest
    }
}
