//! The session generation endpoint hit by every virtual user.
use botload_core::SESSION_PATH;
use botload_macros::transaction;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Invalid target URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Target URL cannot be used as a base: {0}")]
    NotABase(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(StatusCode),
}

/// `GET <base>/generate_session`, unauthenticated and without a body.
#[derive(Clone, Debug)]
pub struct SessionTarget {
    client: Client,
    url: Url,
}

impl SessionTarget {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TargetError> {
        let url = session_url(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request a new session. The body is read and discarded; any non-2xx status is an error.
    #[transaction]
    pub async fn generate_session(&self) -> Result<StatusCode, TargetError> {
        let res = self.client.get(self.url.clone()).send().await?;
        let status = res.status();
        let _ = res.bytes().await?;

        if status.is_success() {
            Ok(status)
        } else {
            Err(TargetError::Status(status))
        }
    }
}

fn session_url(base_url: &str) -> Result<Url, TargetError> {
    let mut base = Url::parse(base_url)?;
    if base.cannot_be_a_base() {
        return Err(TargetError::NotABase(base_url.to_string()));
    }

    // Url::join replaces the last segment unless the path ends in a slash.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    Ok(base.join(SESSION_PATH)?)
}
