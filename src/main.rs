use anyhow::{Context, Result};
use clap::Parser;
use sbc_dashboard::app::App;
use sbc_dashboard::bay::{BayPoller, SysBayProbe};
use sbc_dashboard::cli::Args;
use sbc_dashboard::config::Config;
use sbc_dashboard::fan::{FanController, FanOutput, NullFan, SysfsPwm};
use sbc_dashboard::logger;
use sbc_dashboard::monitor::HostMonitor;
use sbc_dashboard::render::{ConsoleRenderer, OutputFormat};
use sbc_dashboard::sampler::Sampler;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    logger::init(args.verbose, args.log_file.as_deref())?;
    info!("Starting display application");

    if let Err(e) = run(&args, &config) {
        error!("Application error: {e:#}");
        return Err(e);
    }
    info!("Cleaning up and exiting");
    Ok(())
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            info!("Quit: interrupt received");
            running.store(false, Ordering::SeqCst);
        })
        .context("installing signal handler")?;
    }

    let fan: Box<dyn FanOutput> = match (&config.fan, args.no_fan) {
        (Some(fan_config), false) => Box::new(
            SysfsPwm::open(fan_config).context("initializing fan PWM output")?,
        ),
        _ => Box::new(NullFan),
    };

    let (bay_poller, bays) = BayPoller::spawn(
        SysBayProbe::new(&config.bay),
        config.bay.poll_interval(),
    )
    .context("starting bay poller")?;

    let sampler = Sampler::new(HostMonitor::new(config), bays, config);
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Summary
    };

    let mut app = App::new(
        sampler,
        FanController::new(fan),
        ConsoleRenderer::stdout(format),
        config.poll_interval(),
        Some(bay_poller),
    );

    if args.once {
        app.tick();
    } else {
        app.run(&running);
    }
    Ok(())
}
