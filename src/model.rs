use serde::Serialize;

/// One tick of telemetry, handed to the renderer and then dropped.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub temperature_c: f64,
    pub disk: DiskUsage,
    pub ip: String,
    pub tx_kb_s: f64,
    pub rx_kb_s: f64,
    pub tx_display: String,
    pub rx_display: String,
    pub bay_states: BayStates,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DiskUsage {
    pub total_gb: f64,
    pub used_gb: f64,
    pub percent: f64,
}

/// Cumulative byte counters summed over all interfaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// External storage enclosure status, published as one unit by the bay poller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BayStates {
    pub present: [bool; 2],
    pub capacity_pct: [u8; 2],
    pub raid: bool,
    pub detected_unmounted: bool,
}

impl BayStates {
    /// `[bay0_present, bay1_present, bay0_capacity_pct, bay1_capacity_pct, raid_flag]`
    pub fn to_array(&self) -> [u8; 5] {
        [
            self.present[0] as u8,
            self.present[1] as u8,
            self.capacity_pct[0],
            self.capacity_pct[1],
            self.raid as u8,
        ]
    }

    /// Status text shown while at least one bay is empty.
    pub fn status_line(&self) -> Option<&'static str> {
        if self.present[0] && self.present[1] {
            None
        } else if self.detected_unmounted {
            Some("Detected but not installed")
        } else {
            Some("Unpartitioned/NC")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bay_array_layout() {
        let states = BayStates {
            present: [true, false],
            capacity_pct: [42, 0],
            raid: true,
            detected_unmounted: false,
        };
        assert_eq!(states.to_array(), [1, 0, 42, 0, 1]);
    }

    #[test]
    fn status_line_follows_presence() {
        let mut states = BayStates::default();
        assert_eq!(states.status_line(), Some("Unpartitioned/NC"));

        states.detected_unmounted = true;
        assert_eq!(states.status_line(), Some("Detected but not installed"));

        states.present = [true, true];
        assert_eq!(states.status_line(), None);
    }
}
