use std::time::Duration;

/// Number of virtual users when none is configured.
pub const DEFAULT_VUS: usize = 3;

/// Run duration when none is configured.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(30);

/// Pause each virtual user takes between two iterations.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(1);

/// Interval between two progress samples.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Client-side timeout applied to every HTTP call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL of the session generation service.
pub const DEFAULT_TARGET: &str = "http://data_production:5000";

/// Path appended to the base URL for each generated session.
pub const SESSION_PATH: &str = "generate_session";

/// Prediction endpoint used by `botload predict`.
pub const DEFAULT_PREDICT_URL: &str = "http://localhost:8000/predict";

/// Prefix of every rendered prediction failure.
pub const ERROR_LABEL: &str = "Erreur : ";
