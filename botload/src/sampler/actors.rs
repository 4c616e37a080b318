use super::task_atomics::TaskAtomics;
use crate::transaction::TRANSACTION_HOOK;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
#[allow(unused)]
use tracing::{debug, error, info, info_span, trace, warn, Instrument};

/// The virtual users of a single run.
pub(crate) struct Actors {
    tasks: Vec<JoinHandle<()>>,
    iterations: Vec<Arc<AtomicU64>>,
}

impl Actors {
    /// Spawn `count` independent virtual users, each looping over `scenario` until `deadline`.
    pub fn spawn<T, F>(
        scenario: T,
        count: usize,
        pause: Duration,
        deadline: Instant,
        task_atomics: &TaskAtomics,
    ) -> Self
    where
        T: Fn() -> F + Send + Sync + 'static + Clone,
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = Vec::with_capacity(count);
        let mut iterations = Vec::with_capacity(count);

        for vu in 0..count {
            let scenario = scenario.clone();
            let transaction_data = task_atomics.clone_to_transaction_data();
            let counter = Arc::new(AtomicU64::new(0));
            iterations.push(counter.clone());

            tasks.push(tokio::spawn(
                TRANSACTION_HOOK
                    .scope(
                        transaction_data,
                        virtual_user(scenario, pause, deadline, counter),
                    )
                    .instrument(info_span!("vu", id = vu)),
            ));
        }

        Self { tasks, iterations }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Abort every virtual user, including transactions still in flight, and return how many
    /// iterations each one started.
    pub async fn shutdown(self) -> Vec<u64> {
        for handle in &self.tasks {
            handle.abort();
        }

        for handle in self.tasks {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    error!("Virtual user panicked: {err}");
                }
            }
        }

        self.iterations
            .iter()
            .map(|count| count.load(Ordering::Relaxed))
            .collect()
    }
}

async fn virtual_user<T, F>(
    scenario: T,
    pause: Duration,
    deadline: Instant,
    iterations: Arc<AtomicU64>,
) where
    T: Fn() -> F,
    F: Future<Output = ()>,
{
    // NOTE: The deadline is checked before every iteration so that no request starts once
    // the run is over, even if the shutdown abort arrives late.
    while Instant::now() < deadline {
        iterations.fetch_add(1, Ordering::Relaxed);
        scenario().await;

        if pause.is_zero() {
            tokio::task::yield_now().await;
        } else {
            let wake = Instant::now().checked_add(pause).map_or(deadline, |t| t.min(deadline));
            sleep_until(wake).await;
        }
    }
    trace!("Deadline reached.");
}
