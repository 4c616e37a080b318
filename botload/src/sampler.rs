mod actors;
mod task_atomics;
mod timer;

use crate::measurement::Measurement;
use actors::Actors;
use botload_core::RunConfig;
use std::future::Future;
use std::time::Duration;
use task_atomics::TaskAtomics;
use timer::Timer;
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

const MIN_REPORT_INTERVAL: Duration = Duration::from_millis(10);

/// Drives the virtual users of a run and measures them once per report interval.
pub(crate) struct Sampler {
    actors: Actors,
    task_atomics: TaskAtomics,
    timer: Timer,
}

impl Sampler {
    pub async fn new<T, F>(scenario: T, config: &RunConfig, deadline: Instant) -> Self
    where
        T: Fn() -> F + Send + Sync + 'static + Clone,
        F: Future<Output = ()> + Send + 'static,
    {
        let interval = if config.report_interval < MIN_REPORT_INTERVAL {
            warn!(
                "Report interval of {:?} is too short; using {:?}.",
                config.report_interval, MIN_REPORT_INTERVAL
            );
            MIN_REPORT_INTERVAL
        } else {
            config.report_interval
        };

        let task_atomics = TaskAtomics::new();
        let timer = Timer::new(interval).await;
        let actors = Actors::spawn(scenario, config.vus, config.pause, deadline, &task_atomics);
        debug!("Spawned {} virtual users, sampling every {timer}", actors.len());

        Self {
            actors,
            task_atomics,
            timer,
        }
    }

    /// Wait for the next report interval and collect it.
    ///
    /// Cancel safe: nothing is collected until the interval has elapsed.
    pub async fn sample(&mut self) -> Measurement {
        let elapsed = self.timer.tick().await;
        self.task_atomics.collect(elapsed)
    }

    /// Stop every virtual user and collect the final, partial interval along with the
    /// iteration count of each user.
    pub async fn shutdown(self) -> (Measurement, Vec<u64>) {
        let iterations = self.actors.shutdown().await;
        let last = self.task_atomics.collect(self.timer.elapsed());
        (last, iterations)
    }
}
