use reqwest::{self, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

// Shared HTTP client instance.
lazy_static::lazy_static! {
    static ref CLIENT: Arc<reqwest::Client> = Arc::new(reqwest::Client::new());
}

/// Custom error type for HTTP requests.
#[derive(Error, Debug, Clone)]
pub enum RequestError {
    #[error("Environment variable 'marketdata_token' not set")]
    TokenNotSet,
    #[error("HTTP error: {0} returned {1}. Response body: {2}")]
    HttpError(Url, u16, String),
    #[error("Error deserializing JSON: {0}")]
    JsonError(String),
    #[error("Provider returned status '{status}': {message}")]
    Status { status: String, message: String },
    #[error("Other error: {0}")]
    Other(String),
}

impl RequestError {
    /// True when the provider answered but reported a non-"ok" status.
    pub fn is_status(&self) -> bool {
        matches!(self, RequestError::Status { .. })
    }

    /// True when the provider answered with a body that could not be decoded.
    pub fn is_malformed(&self) -> bool {
        matches!(self, RequestError::JsonError(_))
    }
}

/// Issues a GET request to `url` with query `params` and decodes the JSON body.
pub async fn get<T: DeserializeOwned>(
    url: &str,                 // Absolute URL.
    params: &[(&str, &str)],   // Query parameters.
    token: Option<&str>,       // Bearer token.
) -> Result<T, RequestError> {
    // Construct the URL.
    let url = if !params.is_empty() {
        Url::parse_with_params(url, params).map_err(|e| RequestError::Other(e.to_string()))?
    } else {
        Url::parse(url).map_err(|e| RequestError::Other(e.to_string()))?
    };
    log::debug!("GET {}", url);

    let mut req = CLIENT.get(url.as_str());
    if let Some(token) = token {
        req = req.bearer_auth(token)
    }

    let response = req
        .send()
        .await
        .map_err(|e| RequestError::Other(e.to_string()))?;

    let status = response.status();

    // Handle non-success status codes.
    if !status.is_success() {
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::Other(e.to_string()))?;
        return Err(RequestError::HttpError(url, status.as_u16(), body));
    }

    response
        .json()
        .await
        .map_err(|e| RequestError::JsonError(e.to_string()))
}
