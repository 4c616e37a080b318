mod utils;
use utils::*;

use botload::prelude::*;
use botload::traffic::run_session_traffic;
use std::time::Duration;

fn config(name: &str, vus: usize, duration: Duration, pause: Duration) -> RunConfig {
    let mut config = RunConfig::new(name);
    config.vus = vus;
    config.duration = duration;
    config.pause = pause;
    config.report_interval = Duration::from_millis(500);
    config
}

#[tokio::test]
async fn generates_sessions_until_deadline() -> anyhow::Result<()> {
    let (base, state) = mock().await;
    let target = SessionTarget::new(&base, Duration::from_secs(5))?;

    let stats = run_session_traffic(
        target,
        config(
            "sessions",
            3,
            Duration::from_secs(2),
            Duration::from_millis(500),
        ),
    )
    .await;

    assert_eq!(stats.vus, 3);
    assert_eq!(stats.error, 0);
    for iterations in &stats.iterations_per_vu {
        assert!((3..=4).contains(iterations), "{iterations}");
    }

    // Every completed request reached the service; nothing arrives after the run.
    let served = state.sessions();
    assert!(served >= stats.requests);
    assert!(served <= stats.iterations());
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(state.sessions(), served);

    Ok(())
}

#[tokio::test]
async fn slow_sessions_lower_the_request_rate() -> anyhow::Result<()> {
    let (base, _state) = mock().await;
    let target = SessionTarget::new(&format!("{base}/delay/ms/300"), Duration::from_secs(5))?;

    let stats = run_session_traffic(
        target,
        config(
            "slow_sessions",
            2,
            Duration::from_secs(2),
            Duration::from_millis(200),
        ),
    )
    .await;

    // One iteration takes ~500ms: starts at ~0s, 0.5s, 1s and 1.5s.
    for iterations in &stats.iterations_per_vu {
        assert!((3..=4).contains(iterations), "{iterations}");
    }
    assert!(stats.latency_p50 >= Duration::from_millis(300));
    assert!(stats.actual_rps < 5.);

    Ok(())
}

#[tokio::test]
async fn rejected_sessions_are_absorbed() -> anyhow::Result<()> {
    let (base, state) = mock().await;
    let target = SessionTarget::new(&format!("{base}/limited/2"), Duration::from_secs(5))?;

    let stats = run_session_traffic(
        target,
        config(
            "limited_sessions",
            4,
            Duration::from_millis(1_500),
            Duration::from_millis(100),
        ),
    )
    .await;

    assert!(stats.success > 0);
    assert!(stats.error > 0);
    assert!(stats.error_rate > 0.5);
    assert!(state.sessions() >= stats.requests);
    for iterations in &stats.iterations_per_vu {
        assert!(*iterations >= 8, "{iterations}");
    }

    Ok(())
}

static TARGET: std::sync::OnceLock<SessionTarget> = std::sync::OnceLock::new();

#[scenario]
async fn bot_traffic() {
    if let Some(target) = TARGET.get() {
        let _ = target.generate_session().await;
    }
}

#[tokio::test]
async fn scenario_macro_runs_session_traffic() -> anyhow::Result<()> {
    let (base, state) = mock().await;
    let _ = TARGET.set(SessionTarget::new(&base, Duration::from_secs(5))?);

    let stats = bot_traffic()
        .vus(2)
        .duration(Duration::from_millis(1_200))
        .pause(Duration::from_millis(300))
        .await;

    assert_eq!(stats.error, 0);
    assert_eq!(stats.requests, stats.success);
    assert!(stats.requests >= 6);
    assert!(state.sessions() >= stats.requests);

    Ok(())
}

#[cfg(feature = "integration")]
mod long_running {
    use super::*;

    #[tokio::test]
    async fn default_bot_traffic() -> anyhow::Result<()> {
        let (base, state) = mock().await;
        let target = SessionTarget::new(&base, Duration::from_secs(5))?;

        // 3 VUs, 30s, 1s pause.
        let stats = run_session_traffic(target, RunConfig::new("bot_traffic")).await;

        assert_eq!(stats.iterations_per_vu.len(), 3);
        for iterations in &stats.iterations_per_vu {
            assert!((29..=30).contains(iterations), "{iterations}");
        }
        assert_eq!(stats.error, 0);
        assert!(state.sessions() >= stats.requests);

        Ok(())
    }
}
