use crate::model::NetCounters;
use std::time::Instant;
use tracing::warn;

/// Transmit/receive throughput in bytes per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Throughput {
    pub tx: f64,
    pub rx: f64,
}

/// Turns cumulative byte counters into rates between consecutive samples.
#[derive(Debug)]
pub struct RateEstimator {
    prev: NetCounters,
    prev_time: Instant,
}

impl RateEstimator {
    pub fn new(baseline: NetCounters, now: Instant) -> Self {
        Self {
            prev: baseline,
            prev_time: now,
        }
    }

    /// Rate since the previous sample, or zero when no time has passed.
    pub fn sample(&mut self, counters: NetCounters, now: Instant) -> Throughput {
        self.advance(counters, now).unwrap_or_default()
    }

    /// Like [`sample`](Self::sample) but `None` when the clock did not advance; state is only
    /// updated when a rate was computed.
    pub fn advance(&mut self, counters: NetCounters, now: Instant) -> Option<Throughput> {
        let elapsed = now.checked_duration_since(self.prev_time)?.as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }

        if counters.bytes_sent < self.prev.bytes_sent || counters.bytes_recv < self.prev.bytes_recv
        {
            warn!(
                "Network counters went backwards ({:?} -> {:?}), treating as reset",
                self.prev, counters
            );
        }
        let sent = counters.bytes_sent.saturating_sub(self.prev.bytes_sent);
        let recv = counters.bytes_recv.saturating_sub(self.prev.bytes_recv);

        self.prev = counters;
        self.prev_time = now;

        Some(Throughput {
            tx: sent as f64 / elapsed,
            rx: recv as f64 / elapsed,
        })
    }
}

/// Human-readable speed: B/s below 1 KB/s, KB/s below 1024 KB/s, MB/s above.
pub fn format_speed(kb_s: f64) -> String {
    if kb_s < 1.0 {
        format!("{}B/s", (kb_s * 1024.0) as u64)
    } else if kb_s < 1024.0 {
        format!("{}KB/s", kb_s as u64)
    } else {
        format!("{:.1}MB/s", kb_s / 1024.0)
    }
}
