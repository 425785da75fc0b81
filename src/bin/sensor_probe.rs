//! Prints every raw host reading the dashboard consumes, once.

use anyhow::Result;
use clap::Parser;
use sbc_dashboard::bay::{BayProbe, SysBayProbe};
use sbc_dashboard::config::Config;
use sbc_dashboard::fan::duty_cycle;
use sbc_dashboard::monitor::temperature::millidegrees_to_celsius;
use sbc_dashboard::monitor::{HostMonitor, MetricSource};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(about = "Dump raw sensor readings used by sbc-dashboard")]
struct Args {
    #[arg(short, long, env = "SBC_DASHBOARD_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let mut host = HostMonitor::new(&config);
    println!("cpu: {:?}", host.cpu_percent(config.cpu_sample_window()));
    println!("memory: {:?}", host.memory_percent());
    println!(
        "thermal zone {}: {:?}",
        config.thermal_zone_path.display(),
        host.temperature_millidegrees()
    );
    println!("disk {}: {:?}", config.disk_mount_point.display(), host.disk_usage());
    println!("outbound ip: {:?}", host.outbound_ip());
    println!("net counters: {:?}", host.net_counters());
    println!("bays: {:?}", SysBayProbe::new(&config.bay).probe());

    let duty = host
        .temperature_millidegrees()
        .map(|raw| duty_cycle(millidegrees_to_celsius(raw)));
    println!("fan duty at zone temperature: {duty:?}");
    Ok(())
}
