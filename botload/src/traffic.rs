//! Session traffic: every virtual user repeatedly requests a new session.
use crate::scenario::{ConfigurableScenario, Scenario};
use crate::target::SessionTarget;
use botload_core::{RunConfig, RunStatistics};
use tracing::info;

/// Run `config` against `target`, returning once the configured duration has elapsed.
///
/// Failed requests are counted in the returned statistics and otherwise ignored.
pub async fn run_session_traffic(target: SessionTarget, config: RunConfig) -> RunStatistics {
    info!("Generating sessions against {}", target.url());

    let name = config.name.clone();
    Scenario::new(&name, move || {
        let target = target.clone();
        async move {
            let _ = target.generate_session().await;
        }
    })
    .config(config)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn unreachable_target_only_counts_errors() {
        let target = SessionTarget::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let mut config = RunConfig::new("unreachable");
        config.vus = 2;
        config.duration = Duration::from_millis(600);
        config.pause = Duration::from_millis(100);

        let stats = run_session_traffic(target, config).await;

        assert_eq!(stats.vus, 2);
        assert_eq!(stats.success, 0);
        assert_eq!(stats.error, stats.requests);
        assert!(stats.requests > 0);
        assert!(stats.iterations_per_vu.iter().all(|i| *i > 0));
    }
}
