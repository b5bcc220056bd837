//! JSON over HTTP for the remote API clients.

use log::debug;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error_handling::ClientError;

/// Sends `request` and decodes a successful JSON response body.
///
/// A non-2xx status becomes `ClientError::Status` carrying the response body.
/// The query string is dropped from the reported URL since it may hold
/// credentials.
pub(crate) async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    let mut url = response.url().clone();
    url.set_query(None);
    debug!("GET {url} -> {status}");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}
