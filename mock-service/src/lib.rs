//! Stand-in for the session producer and the prediction API, used by the integration tests.
use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use metrics::counter;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::{
    num::NonZeroU32,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Request counters, shared with whoever spawned the service.
#[derive(Default)]
pub struct MockState {
    sessions: AtomicU64,
    predictions: AtomicU64,
    limiters: RwLock<HashMap<u32, Arc<DefaultDirectRateLimiter>>>,
}

impl MockState {
    /// Sessions requested on any `generate_session` route, rejected ones included.
    pub fn sessions(&self) -> u64 {
        self.sessions.load(Ordering::Relaxed)
    }

    pub fn predictions(&self) -> u64 {
        self.predictions.load(Ordering::Relaxed)
    }
}

pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/generate_session", get(generate_session))
        .route("/delay/ms/:delay_ms/generate_session", get(delayed_session))
        .route("/limited/:max_tps/generate_session", get(limited_session))
        .route("/predict", post(predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router(Arc::default())).await?;
    Ok(())
}

/// Serve on an ephemeral local port in the background.
pub async fn spawn() -> anyhow::Result<(SocketAddr, Arc<MockState>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = Arc::new(MockState::default());

    let app = router(state.clone());
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("Mock service stopped: {err}");
        }
    });

    Ok((addr, state))
}

async fn health() -> Json<Value> {
    Json(json!({ "message": "Mock bot detection API" }))
}

#[derive(Serialize)]
pub struct Session {
    pub session_id: String,
    pub count: u64,
}

fn new_session(state: &MockState) -> Session {
    counter!("mock-service.sessions").increment(1);
    let count = state.sessions.fetch_add(1, Ordering::Relaxed) + 1;
    let id = uuid::Uuid::new_v4().simple().to_string();
    Session {
        session_id: format!("sess_{}", &id[..12]),
        count,
    }
}

#[debug_handler]
async fn generate_session(State(state): State<Arc<MockState>>) -> Json<Session> {
    Json(new_session(&state))
}

#[debug_handler]
async fn delayed_session(
    State(state): State<Arc<MockState>>,
    Path(delay_ms): Path<u64>,
) -> Json<Session> {
    let session = new_session(&state);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    Json(session)
}

#[debug_handler]
async fn limited_session(
    State(state): State<Arc<MockState>>,
    Path(max_tps): Path<u32>,
) -> Result<Json<Session>, StatusCode> {
    let session = new_session(&state);

    let Some(max_tps) = NonZeroU32::new(max_tps) else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let read = state
        .limiters
        .read()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .get(&max_tps.get())
        .cloned();
    let limiter = match read {
        Some(limiter) => limiter,
        None => state
            .limiters
            .write()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .entry(max_tps.get())
            .or_insert_with(|| Arc::new(rate_limiter(max_tps)))
            .clone(),
    };

    match limiter.check() {
        Ok(_) => Ok(Json(session)),
        Err(_) => {
            debug!("MOCK SERVER ___ LIMITED");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Answers like the bot-detection model: `{"prediction": 0|1, "probability": p}` for a
/// `{"features": {...}}` payload, `422 bad input` for anything else.
#[debug_handler]
async fn predict(
    State(state): State<Arc<MockState>>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, (StatusCode, &'static str)> {
    state.predictions.fetch_add(1, Ordering::Relaxed);

    let Some(features) = payload.get("features").and_then(Value::as_object) else {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "bad input"));
    };

    let is_bot = features
        .get("user_agent")
        .and_then(Value::as_str)
        .map(|ua| ua.to_lowercase().contains("bot"))
        .unwrap_or(false);
    let (prediction, probability) = if is_bot { (1, 0.97) } else { (0, 0.03) };

    Ok(Json(json!({
        "prediction": prediction,
        "probability": probability,
    })))
}

pub fn rate_limiter(tps: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(tps))
}
