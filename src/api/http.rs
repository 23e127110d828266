use crate::api::error::RequestError;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Thin GET-and-decode layer over a shared reqwest client.
///
/// One call issues exactly one request; failures are mapped to [`RequestError`]
/// and returned as-is.
#[derive(Debug, Clone)]
pub(crate) struct ApiTransport {
    base_url: String,
    http: Client,
}

impl ApiTransport {
    pub(crate) fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, RequestError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(RequestError::ClientBuild)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RequestError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    RequestError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    RequestError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::NetworkRequest(url.clone(), e))?;

        serde_json::from_slice(&body).map_err(|source| RequestError::JsonParse { url, source })
    }
}
