//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{HTTP_TIMEOUT_SECS, USER_AGENT};

/// Builds the HTTP client shared by the Toggl and Trello clients.
///
/// Requests time out after [`HTTP_TIMEOUT_SECS`] and identify themselves with
/// the crate name and version.
///
/// # Errors
///
/// Returns a `reqwest::Error` if the TLS backend cannot be initialized.
pub fn init_client() -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
}
