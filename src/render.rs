use crate::model::Snapshot;
use std::io::Write;
use tracing::{error, info};

/// Consumer of each tick's snapshot.
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One log line per tick.
    Summary,
    /// One JSON object per line on the writer.
    Json,
}

pub struct ConsoleRenderer<W> {
    format: OutputFormat,
    out: W,
}

impl ConsoleRenderer<std::io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, std::io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot) {
        match self.format {
            OutputFormat::Summary => info!("{}", summary(snapshot)),
            OutputFormat::Json => {
                let written = serde_json::to_writer(&mut self.out, snapshot)
                    .map_err(std::io::Error::from)
                    .and_then(|()| writeln!(self.out))
                    .and_then(|()| self.out.flush());
                if let Err(e) = written {
                    error!("Error writing snapshot: {e}");
                }
            }
        }
    }
}

pub fn summary(snapshot: &Snapshot) -> String {
    let bays = &snapshot.bay_states;
    let bay = |i: usize| {
        if bays.present[i] {
            format!("{}%", bays.capacity_pct[i])
        } else {
            "-".to_string()
        }
    };
    let mut line = format!(
        concat!(
            "CPU {:.0}% | RAM {:.0}% | {:.0}C | Disk {:.0}% ({:.1}/{:.1}GB) | ",
            "IP {} | RX {} TX {} | Bays {} {}"
        ),
        snapshot.cpu_percent,
        snapshot.memory_percent,
        snapshot.temperature_c,
        snapshot.disk.percent,
        snapshot.disk.used_gb,
        snapshot.disk.total_gb,
        snapshot.ip,
        snapshot.rx_display,
        snapshot.tx_display,
        bay(0),
        bay(1),
    );
    if bays.raid {
        line.push_str(" RAID");
    }
    if let Some(status) = bays.status_line() {
        line.push_str(" (");
        line.push_str(status);
        line.push(')');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BayStates, DiskUsage};

    fn snapshot() -> Snapshot {
        Snapshot {
            cpu_percent: 23.0,
            memory_percent: 41.6,
            temperature_c: 52.3,
            disk: DiskUsage {
                total_gb: 58.0,
                used_gb: 14.5,
                percent: 25.0,
            },
            ip: "192.168.1.50".to_string(),
            tx_kb_s: 0.5,
            rx_kb_s: 2048.0,
            tx_display: "512B/s".to_string(),
            rx_display: "2.0MB/s".to_string(),
            bay_states: BayStates {
                present: [true, false],
                capacity_pct: [73, 0],
                raid: false,
                detected_unmounted: true,
            },
        }
    }

    #[test]
    fn summary_line() {
        assert_eq!(
            summary(&snapshot()),
            concat!(
                "CPU 23% | RAM 42% | 52C | Disk 25% (14.5/58.0GB) | IP 192.168.1.50 | ",
                "RX 2.0MB/s TX 512B/s | Bays 73% - (Detected but not installed)"
            )
        );
    }

    #[test]
    fn json_lines() {
        let mut renderer = ConsoleRenderer::new(OutputFormat::Json, Vec::new());
        renderer.render(&snapshot());
        renderer.render(&snapshot());
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["ip"], "192.168.1.50");
        assert_eq!(value["rx_display"], "2.0MB/s");
        assert_eq!(value["bay_states"]["capacity_pct"][0], 73);
    }
}
