//! The remote active-tests endpoint.

use std::time::Duration;

use ui::core::snapshot::RawTests;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned a payload that is not a JSON object of tests: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("testwatch-fetch/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// GET the active tests. Any non-2xx answer is an error; the body is only
/// decoded after the status check.
pub async fn fetch_active_tests(
    client: &reqwest::Client,
    url: &str,
) -> Result<RawTests, FetchError> {
    let request_error = |source| FetchError::Request {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(request_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(request_error)?;
    tracing::debug!(url, bytes = body.len(), "active tests received");

    serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}
