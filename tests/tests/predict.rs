mod utils;
use utils::*;

use botload::predict::{PredictError, PredictOutcome};
use botload::prelude::*;
use std::time::Duration;

async fn client() -> (PredictClient, std::sync::Arc<mock_service::MockState>) {
    let (base, state) = mock().await;
    let client = PredictClient::new(&format!("{base}/predict"), Duration::from_secs(5))
        .expect("valid endpoint");
    (client, state)
}

#[tokio::test]
async fn renders_the_prediction() {
    let (client, state) = client().await;

    let outcome = client
        .submit(r#"{"features": {"hour": 14, "user_agent": "Mozilla", "action": "scroll"}}"#)
        .await;

    assert!(outcome.is_success());
    assert_eq!(
        outcome.to_string(),
        "{\n  \"prediction\": 0,\n  \"probability\": 0.03\n}"
    );
    assert_eq!(state.predictions(), 1);
}

#[tokio::test]
async fn flags_bots() {
    let (client, _state) = client().await;

    let outcome = client
        .submit(r#"{"features": {"user_agent": "Googlebot/2.1"}}"#)
        .await;

    let PredictOutcome::Success(value) = outcome else {
        panic!("expected a prediction, got {outcome}");
    };
    assert_eq!(value["prediction"], 1);
}

#[tokio::test]
async fn rejection_text_is_shown() {
    let (client, _state) = client().await;

    let outcome = client.submit(r#"{"result": 1}"#).await;

    assert!(matches!(
        outcome,
        PredictOutcome::Failure(PredictError::Rejected { .. })
    ));
    assert_eq!(outcome.to_string(), "Erreur : Error: bad input");
}

#[tokio::test]
async fn malformed_input_never_reaches_the_service() {
    let (client, state) = client().await;

    let outcome = client.submit("{\"features\": ").await;

    assert!(!outcome.is_success());
    assert!(outcome.to_string().starts_with("Erreur : Error: "));
    assert_eq!(state.predictions(), 0);
}

#[tokio::test]
async fn double_submission_is_refused() {
    let (client, state) = client().await;
    let payload = r#"{"features": {"hour": 3}}"#;

    let (first, second) = tokio::join!(client.submit(payload), client.submit(payload));

    assert!(first.is_success());
    assert!(matches!(
        second,
        PredictOutcome::Failure(PredictError::InFlight)
    ));
    assert_eq!(state.predictions(), 1);
}
