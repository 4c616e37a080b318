//! Scenario logic
use crate::data::SampleSet;
use crate::sampler::Sampler;
use botload_core::{RunConfig, RunStatistics};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};
use tokio::time::{sleep_until, Instant};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

// Roughly 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Load test scenario structure
///
/// Wraps one iteration of a virtual user. Awaiting a `Scenario` runs it with its
/// [`RunConfig`] and resolves to the [`RunStatistics`] of the run.
///
/// Usually created with the [`#[scenario]`](botload_macros::scenario) macro, but any cloneable
/// closure returning a future works as well.
///
/// # Example
/// ```no_run
/// use botload::prelude::*;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let stats = Scenario::new("ping", || async {
///         let _ = reqwest::get("http://localhost:5000/generate_session").await;
///     })
///     .vus(3)
///     .duration(Duration::from_secs(30))
///     .await;
///
///     println!("{stats}");
/// }
/// ```
#[pin_project::pin_project]
pub struct Scenario<T> {
    func: T,
    runner_fut: Option<Pin<Box<dyn Future<Output = RunStatistics> + Send>>>,
    config: RunConfig,
}

impl<T> Scenario<T> {
    pub fn new(name: &str, func: T) -> Self {
        Self {
            func,
            runner_fut: None,
            config: RunConfig::new(name),
        }
    }
}

impl<T, F> Future for Scenario<T>
where
    T: Fn() -> F + Send + 'static + Clone + Sync,
    F: Future<Output = ()> + Send + 'static,
{
    type Output = RunStatistics;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.runner_fut.is_none() {
            let func = self.func.clone();
            let config = self.config.clone();
            self.runner_fut = Some(Box::pin(async move { run_scenario(func, config).await }));
        }

        if let Some(runner) = &mut self.runner_fut {
            runner.as_mut().poll(cx)
        } else {
            unreachable!()
        }
    }
}

pub trait ConfigurableScenario<T: Send>: Future<Output = T> + Sized + Send {
    fn vus(self, vus: usize) -> Self;
    fn duration(self, duration: Duration) -> Self;
    fn pause(self, pause: Duration) -> Self;
    fn report_interval(self, interval: Duration) -> Self;
    fn config(self, config: RunConfig) -> Self;
}

impl<T, F> ConfigurableScenario<RunStatistics> for Scenario<T>
where
    T: Fn() -> F + Send + 'static + Clone + Sync,
    F: Future<Output = ()> + Send + 'static,
{
    /// Run the scenario with the given number of independent virtual users.
    ///
    /// Defaults to 3. Zero users makes the run a no-op.
    ///
    /// # Example
    /// ```no_run
    /// use botload::prelude::*;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     my_scenario()
    ///         .vus(10)
    ///         .await;
    /// }
    ///
    /// #[scenario]
    /// async fn my_scenario() {
    /// }
    /// ```
    fn vus(mut self, vus: usize) -> Self {
        self.config.vus = vus;
        self
    }

    /// Run the scenario for the given wall-clock duration.
    ///
    /// Defaults to 30 seconds. No iteration starts once it has elapsed, and transactions still
    /// in flight at that point are aborted.
    ///
    /// # Example
    /// ```no_run
    /// use botload::prelude::*;
    /// use std::time::Duration;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     my_scenario()
    ///         .duration(Duration::from_secs(120))
    ///         .await;
    /// }
    ///
    /// #[scenario]
    /// async fn my_scenario() {
    /// }
    /// ```
    fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    /// Pause each virtual user between two iterations. Defaults to 1 second.
    fn pause(mut self, pause: Duration) -> Self {
        self.config.pause = pause;
        self
    }

    /// How often a progress sample is logged. Defaults to 5 seconds.
    fn report_interval(mut self, interval: Duration) -> Self {
        self.config.report_interval = interval;
        self
    }

    /// Replace the whole configuration, name included.
    fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }
}

#[instrument(name="scenario", skip_all, fields(name=config.name))]
pub(crate) async fn run_scenario<T, F>(scenario: T, config: RunConfig) -> RunStatistics
where
    T: Fn() -> F + Send + Sync + 'static + Clone,
    F: Future<Output = ()> + Send + 'static,
{
    if config.is_noop() {
        warn!("Nothing to run for {config}");
        return SampleSet::new().statistics(config.vus, Duration::ZERO, vec![0; config.vus]);
    }

    info!("Running {config}");

    let start = Instant::now();
    let deadline = run_deadline(start, config.duration);

    let mut sampler = Sampler::new(scenario, &config, deadline).await;
    let mut samples = SampleSet::new();

    let end = sleep_until(deadline);
    tokio::pin!(end);

    loop {
        tokio::select! {
            measurement = sampler.sample() => {
                info!("Sample: {measurement}");
                samples.push(&measurement);
            }
            _ = &mut end => break,
        }
    }

    let (last, iterations) = sampler.shutdown().await;
    debug!("Final sample: {last}");
    samples.push(&last);

    let elapsed = start.elapsed();
    info!("Scenario complete after {} samples", samples.len());

    samples.statistics(config.vus, elapsed, iterations)
}

/// Durations past what the clock can represent run until `FAR_FUTURE` instead.
fn run_deadline(start: Instant, duration: Duration) -> Instant {
    start.checked_add(duration).unwrap_or_else(|| {
        warn!("Duration {duration:?} overflows the clock; capping it");
        start + FAR_FUTURE
    })
}
