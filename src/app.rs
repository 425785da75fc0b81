use crate::bay::BayPoller;
use crate::fan::{FanController, FanOutput};
use crate::model::Snapshot;
use crate::monitor::MetricSource;
use crate::render::Renderer;
use crate::sampler::Sampler;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The dashboard loop: sample, drive the fan, render.
///
/// Field order matters on drop: the fan is released before the bay poller is joined.
pub struct App<S, F, R> {
    sampler: Sampler<S>,
    fan: FanController<F>,
    renderer: R,
    poll_interval: Duration,
    _bay_poller: Option<BayPoller>,
}

impl<S, F, R> App<S, F, R>
where
    S: MetricSource,
    F: FanOutput,
    R: Renderer,
{
    pub fn new(
        sampler: Sampler<S>,
        fan: FanController<F>,
        renderer: R,
        poll_interval: Duration,
        bay_poller: Option<BayPoller>,
    ) -> Self {
        Self {
            sampler,
            fan,
            renderer,
            poll_interval,
            _bay_poller: bay_poller,
        }
    }

    pub fn tick(&mut self) -> Snapshot {
        let snapshot = self.sampler.sample();
        let duty = self.fan.apply(snapshot.temperature_c);
        debug!(
            "Tick: {:.1}C -> fan duty {:.2}",
            snapshot.temperature_c, duty
        );
        self.renderer.render(&snapshot);
        snapshot
    }

    /// Ticks until `running` is cleared, sleeping out the remainder of each interval.
    pub fn run(&mut self, running: &Arc<AtomicBool>) {
        info!("Starting dashboard loop every {:?}", self.poll_interval);
        while running.load(Ordering::SeqCst) {
            let started = Instant::now();
            self.tick();
            let deadline = started + self.poll_interval;
            while running.load(Ordering::SeqCst) {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                std::thread::sleep((deadline - now).min(Duration::from_millis(100)));
            }
        }
        info!("Dashboard loop stopped");
    }
}
