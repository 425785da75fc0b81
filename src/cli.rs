use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Single-board computer status dashboard with PWM fan control"
)]
pub struct Args {
    /// JSON configuration file; built-in defaults are used when absent.
    #[arg(short, long, env = "SBC_DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Turns all log categories up to Debug.
    #[arg(short, long, env = "SBC_DASHBOARD_VERBOSE")]
    pub verbose: bool,

    /// Also append logs to this file.
    #[arg(long, env = "SBC_DASHBOARD_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print each snapshot as a JSON line instead of a log summary.
    #[arg(long, env = "SBC_DASHBOARD_JSON")]
    pub json: bool,

    /// Take a single sample and exit.
    #[arg(long, env = "SBC_DASHBOARD_ONCE")]
    pub once: bool,

    /// Run without touching the PWM fan, even if one is configured.
    #[arg(long, env = "SBC_DASHBOARD_NO_FAN")]
    pub no_fan: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}
