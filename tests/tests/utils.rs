use mock_service::MockState;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        let _ = FmtSubscriber::builder()
            .with_env_filter("botload=debug,mock_service=debug")
            .with_test_writer()
            .try_init();
    });
}

/// A fresh mock service on the current test's runtime.
#[allow(unused)]
pub async fn mock() -> (String, Arc<MockState>) {
    init();
    let (addr, state): (SocketAddr, _) = mock_service::spawn()
        .await
        .expect("mock service failed to start");
    (format!("http://{addr}"), state)
}
