use crate::bay::BayReceiver;
use crate::cache::TtlCache;
use crate::config::Config;
use crate::model::{DiskUsage, NetCounters, Snapshot};
use crate::monitor::temperature::millidegrees_to_celsius;
use crate::monitor::MetricSource;
use crate::rate::{format_speed, RateEstimator};
use crate::smoothing::SmoothingBuffer;
use std::time::{Duration, Instant};
use tracing::{debug, error};

pub const NO_CONNECTION: &str = "No Connection";

/// Owns every smoothing window, cache and counter baseline; produces one [`Snapshot`] per tick.
///
/// Each metric is fault-isolated: a failed read is logged and replaced by the last smoothed
/// value (or zero) without affecting the others.
pub struct Sampler<S> {
    source: S,
    bays: BayReceiver,
    cpu_window: Duration,
    cpu: SmoothingBuffer,
    memory: SmoothingBuffer,
    temperature: SmoothingBuffer,
    tx: SmoothingBuffer,
    rx: SmoothingBuffer,
    disk: TtlCache<DiskUsage>,
    ip: TtlCache<String>,
    rate: Option<RateEstimator>,
}

impl<S: MetricSource> Sampler<S> {
    pub fn new(mut source: S, bays: BayReceiver, config: &Config) -> Self {
        let rate = match source.net_counters() {
            Ok(baseline) => Some(RateEstimator::new(baseline, Instant::now())),
            Err(e) => {
                error!("Error reading network counters: {e}");
                None
            }
        };
        Self {
            source,
            bays,
            cpu_window: config.cpu_sample_window(),
            cpu: SmoothingBuffer::weighted(5),
            memory: SmoothingBuffer::uniform(5),
            temperature: SmoothingBuffer::uniform(3),
            tx: SmoothingBuffer::uniform(3),
            rx: SmoothingBuffer::uniform(3),
            disk: TtlCache::new("disk", config.disk_ttl()),
            ip: TtlCache::new("ip", config.ip_ttl()),
            rate,
        }
    }

    pub fn sample(&mut self) -> Snapshot {
        self.collect(&Instant::now)
    }

    /// Samples with every timestamp pinned to `now`.
    pub fn sample_at(&mut self, now: Instant) -> Snapshot {
        self.collect(&|| now)
    }

    /// `clock` is read when each timed reading is taken, so the counter timestamp follows the
    /// CPU wait and any cache refreshes instead of the start of the tick.
    fn collect(&mut self, clock: &dyn Fn() -> Instant) -> Snapshot {
        let cpu_percent = self.cpu_percent();
        let memory_percent = self.memory_percent();
        let temperature_c = self.temperature_c();

        let now = clock();
        let source = &mut self.source;
        let disk = self.disk.get_or_refresh_at(now, || source.disk_usage());
        let ip = self.ip.get_or_refresh_at(now, || {
            Ok::<_, String>(match source.outbound_ip() {
                Ok(ip) => ip.to_string(),
                Err(e) => {
                    debug!("IP lookup failed: {e}");
                    NO_CONNECTION.to_string()
                }
            })
        });

        let (tx_kb_s, rx_kb_s) = self.network_kb_s(clock);
        let bay_states = self.bays.latest();

        Snapshot {
            cpu_percent,
            memory_percent,
            temperature_c,
            disk,
            ip,
            tx_kb_s,
            rx_kb_s,
            tx_display: format_speed(tx_kb_s),
            rx_display: format_speed(rx_kb_s),
            bay_states,
        }
    }

    fn cpu_percent(&mut self) -> f64 {
        match self.source.cpu_percent(self.cpu_window) {
            Ok(percent) => self.cpu.push(percent),
            Err(e) => {
                error!("Error getting CPU usage: {e}");
                self.cpu.smoothed().unwrap_or(0.0)
            }
        }
    }

    fn memory_percent(&mut self) -> f64 {
        match self.source.memory_percent() {
            Ok(percent) => self.memory.push(percent),
            Err(e) => {
                error!("Error getting memory usage: {e}");
                self.memory.smoothed().unwrap_or(0.0)
            }
        }
    }

    fn temperature_c(&mut self) -> f64 {
        match self.source.temperature_millidegrees() {
            Ok(raw) => self.temperature.push(millidegrees_to_celsius(raw)),
            Err(e) => {
                error!("Error getting temperature: {e}");
                self.temperature.smoothed().unwrap_or(0.0)
            }
        }
    }

    /// Updates the rate baseline at most once; reports the previous smoothed rates when no
    /// new rate could be computed.
    fn network_kb_s(&mut self, clock: &dyn Fn() -> Instant) -> (f64, f64) {
        let previous = (
            self.tx.smoothed().unwrap_or(0.0),
            self.rx.smoothed().unwrap_or(0.0),
        );
        let counters: NetCounters = match self.source.net_counters() {
            Ok(counters) => counters,
            Err(e) => {
                error!("Error getting network speeds: {e}");
                return previous;
            }
        };
        let now = clock();
        let rate = match self.rate.as_mut() {
            Some(estimator) => estimator.advance(counters, now),
            None => {
                self.rate = Some(RateEstimator::new(counters, now));
                None
            }
        };
        match rate {
            Some(rate) => (
                self.tx.push(rate.tx / 1024.0),
                self.rx.push(rate.rx / 1024.0),
            ),
            None => previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SampleError;
    use crate::model::BayStates;
    use std::io;
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::PathBuf;
    use std::sync::mpsc;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct FakeHost {
        cpu: Vec<f64>,
        temperature_missing: bool,
        temperature_after: Option<usize>,
        disk_calls: usize,
        ip_fails: bool,
        net: NetCounters,
        net_step: u64,
        temp_calls: usize,
    }

    impl MetricSource for FakeHost {
        fn cpu_percent(&mut self, _window: Duration) -> Result<f64, SampleError> {
            if self.cpu.is_empty() {
                return Err(SampleError::NoCpu);
            }
            Ok(self.cpu.remove(0))
        }

        fn memory_percent(&mut self) -> Result<f64, SampleError> {
            Ok(50.0)
        }

        fn temperature_millidegrees(&mut self) -> Result<i64, SampleError> {
            self.temp_calls += 1;
            let missing = self.temperature_missing
                || self.temperature_after.is_some_and(|n| self.temp_calls > n);
            if missing {
                return Err(SampleError::Read {
                    path: PathBuf::from("/sys/class/thermal/thermal_zone0/temp"),
                    source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
                });
            }
            Ok(48_000)
        }

        fn disk_usage(&mut self) -> Result<DiskUsage, SampleError> {
            self.disk_calls += 1;
            Ok(DiskUsage {
                total_gb: 64.0,
                used_gb: 16.0,
                percent: 25.0,
            })
        }

        fn outbound_ip(&mut self) -> Result<IpAddr, SampleError> {
            if self.ip_fails {
                return Err(SampleError::Connectivity(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "timed out",
                )));
            }
            Ok(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 50)))
        }

        fn net_counters(&mut self) -> Result<NetCounters, SampleError> {
            let current = self.net;
            self.net.bytes_sent += self.net_step;
            self.net.bytes_recv += self.net_step * 2;
            Ok(current)
        }
    }

    fn sampler(host: FakeHost) -> (Sampler<FakeHost>, mpsc::Sender<BayStates>) {
        let (tx, rx) = mpsc::channel();
        let sampler = Sampler::new(host, BayReceiver::new(rx), &Config::default());
        (sampler, tx)
    }

    #[test]
    fn healthy_tick_populates_everything() {
        let host = FakeHost {
            cpu: vec![10.0, 20.0, 30.0],
            net_step: 2048,
            ..Default::default()
        };
        let t0 = Instant::now();
        let (mut sampler, bays) = sampler(host);
        bays.send(BayStates {
            present: [true, true],
            capacity_pct: [40, 60],
            raid: true,
            detected_unmounted: false,
        })
        .unwrap();

        sampler.sample_at(t0 + Duration::from_secs(1));
        sampler.sample_at(t0 + Duration::from_secs(2));
        let snapshot = sampler.sample_at(t0 + Duration::from_secs(3));

        assert!((snapshot.cpu_percent - 23.0).abs() < 1e-9);
        assert_eq!(snapshot.memory_percent, 50.0);
        assert_eq!(snapshot.temperature_c, 48.0);
        assert_eq!(snapshot.disk.percent, 25.0);
        assert_eq!(snapshot.ip, "192.168.1.50");
        assert!(snapshot.tx_kb_s > 0.0);
        assert!(snapshot.rx_kb_s > snapshot.tx_kb_s);
        assert_eq!(snapshot.rx_display, "4KB/s");
        assert_eq!(snapshot.bay_states.to_array(), [1, 1, 40, 60, 1]);
    }

    #[test]
    fn network_rate_is_smoothed_in_kb() {
        let host = FakeHost {
            net_step: 1024,
            ..Default::default()
        };
        let t0 = Instant::now();
        let (mut sampler, _bays) = sampler(host);
        let snapshot = sampler.sample_at(t0 + Duration::from_secs(1));
        // The baseline is taken at construction, a hair after t0.
        assert!(snapshot.tx_kb_s >= 1.0 && snapshot.tx_kb_s < 1.1);
        assert_eq!(snapshot.tx_display, "1KB/s");

        // Same instant again: nothing new to compute, previous smoothed value is kept.
        let again = sampler.sample_at(t0 + Duration::from_secs(1));
        assert_eq!(again.tx_kb_s, snapshot.tx_kb_s);
    }

    /// Sends a steady 100 KB/s in both directions, tied to the wall clock.
    struct SteadyLink {
        started: Instant,
    }

    impl SteadyLink {
        fn bytes(&self) -> u64 {
            (self.started.elapsed().as_secs_f64() * 100.0 * 1024.0) as u64
        }
    }

    impl MetricSource for SteadyLink {
        fn cpu_percent(&mut self, window: Duration) -> Result<f64, SampleError> {
            std::thread::sleep(window);
            Ok(10.0)
        }
        fn memory_percent(&mut self) -> Result<f64, SampleError> {
            Ok(20.0)
        }
        fn temperature_millidegrees(&mut self) -> Result<i64, SampleError> {
            Ok(40_000)
        }
        fn disk_usage(&mut self) -> Result<DiskUsage, SampleError> {
            std::thread::sleep(Duration::from_millis(50));
            Ok(DiskUsage::default())
        }
        fn outbound_ip(&mut self) -> Result<IpAddr, SampleError> {
            Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
        }
        fn net_counters(&mut self) -> Result<NetCounters, SampleError> {
            let bytes = self.bytes();
            Ok(NetCounters {
                bytes_sent: bytes,
                bytes_recv: bytes,
            })
        }
    }

    #[test]
    fn throughput_is_timed_at_counter_read() {
        let (_tx, rx) = mpsc::channel();
        let link = SteadyLink {
            started: Instant::now(),
        };
        let mut sampler = Sampler::new(link, BayReceiver::new(rx), &Config::default());

        let first = sampler.sample();
        assert!(
            first.tx_kb_s > 50.0 && first.tx_kb_s < 150.0,
            "first tick tx {} KB/s",
            first.tx_kb_s
        );

        std::thread::sleep(Duration::from_millis(900));
        let second = sampler.sample();
        assert!(
            second.tx_kb_s > 50.0 && second.tx_kb_s < 150.0,
            "second tick tx {} KB/s",
            second.tx_kb_s
        );
        assert!(second.rx_kb_s > 50.0 && second.rx_kb_s < 150.0);
        assert!(second.tx_display.ends_with("KB/s"));
    }

    #[test]
    #[traced_test]
    fn missing_thermal_sensor_keeps_last_value() {
        let host = FakeHost {
            cpu: vec![5.0, 5.0],
            temperature_after: Some(1),
            ..Default::default()
        };
        let (mut sampler, _bays) = sampler(host);

        let t0 = Instant::now();
        assert_eq!(sampler.sample_at(t0).temperature_c, 48.0);
        let snapshot = sampler.sample_at(t0 + Duration::from_secs(1));
        assert_eq!(snapshot.temperature_c, 48.0);
        assert!(logs_contain("Error getting temperature"));
        assert_eq!(snapshot.cpu_percent, 5.0);
        assert_eq!(snapshot.memory_percent, 50.0);
        assert_eq!(snapshot.ip, "192.168.1.50");
    }

    #[test]
    #[traced_test]
    fn failures_without_history_fall_back_to_zero() {
        let host = FakeHost {
            temperature_missing: true,
            ..Default::default()
        };
        let (mut sampler, _bays) = sampler(host);
        let snapshot = sampler.sample();
        assert_eq!(snapshot.temperature_c, 0.0);
        assert_eq!(snapshot.cpu_percent, 0.0);
        assert!(logs_contain("Error getting CPU usage"));
        assert_eq!(snapshot.memory_percent, 50.0);
    }

    #[test]
    fn no_route_reports_no_connection() {
        let host = FakeHost {
            ip_fails: true,
            ..Default::default()
        };
        let (mut sampler, _bays) = sampler(host);
        assert_eq!(sampler.sample().ip, NO_CONNECTION);
    }

    #[test]
    fn disk_is_cached_between_ticks() {
        let (mut sampler, _bays) = sampler(FakeHost::default());
        let t0 = Instant::now();
        for secs in 0..=10 {
            sampler.sample_at(t0 + Duration::from_secs(secs));
        }
        assert_eq!(sampler.source.disk_calls, 1);

        sampler.sample_at(t0 + Duration::from_secs(11));
        assert_eq!(sampler.source.disk_calls, 2);
    }
}
