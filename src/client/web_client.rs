use crate::utils::error::{ApiError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use url::Url;

/// Shared HTTP plumbing for clients talking to a service that implements
/// one of the data-access contracts.
#[derive(Debug, Clone)]
pub struct WebClient {
    client: Client,
    base_url: Url,
    retries: u32,
}

impl WebClient {
    /// Uses the provided ip-address and port to access a service that
    /// implements the corresponding interface.
    pub fn new(ip_address: IpAddr, port: u16) -> Result<Self> {
        let address = SocketAddr::new(ip_address, port);
        let base_url =
            Url::parse(&format!("http://{}", address)).map_err(|e| ApiError::Config {
                field: "base_url".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client: Client::new(),
            base_url,
            retries: 0,
        })
    }

    /// Uses a full base URL, e.g. behind a reverse proxy or in tests.
    pub fn from_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::Config {
            field: "base_url".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            client: Client::new(),
            base_url,
            retries: 0,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Http)?;
        Ok(self)
    }

    /// Number of additional attempts after a transport error or a 5xx
    /// response. Client errors (4xx) are never retried.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| ApiError::Config {
            field: "endpoint".to_string(),
            message: format!("Invalid endpoint path {}: {}", path, e),
        })
    }

    /// POSTs `body` as JSON with the given query pairs and decodes the JSON
    /// response. Non-success statuses surface as [`ApiError::Service`];
    /// transport errors and 5xx responses are retried up to the configured
    /// attempt count.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let mut attempt = 0;

        loop {
            match self.post_json_once(url.clone(), query, body).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.retries && is_retryable(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        "Request to {} failed ({}), retry {}/{}",
                        url,
                        e,
                        attempt,
                        self.retries
                    );
                    tokio::time::sleep(Duration::from_millis(250 * u64::from(attempt))).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_json_once<B, T>(&self, url: Url, query: &[(&str, String)], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {} with {} query pairs", url, query.len());

        let response = self
            .client
            .post(url)
            .query(query)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let value = response.json::<serde_json::Value>().await?;
        serde_json::from_value(value).map_err(ApiError::Serialization)
    }
}

fn is_retryable(error: &ApiError) -> bool {
    match error {
        ApiError::Http(_) => true,
        ApiError::Service { status, .. } => *status >= 500,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_base_url_from_ipv4() {
        let client = WebClient::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000).unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn test_base_url_from_ipv6() {
        let client = WebClient::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 8000).unwrap();
        assert_eq!(client.base_url().as_str(), "http://[::1]:8000/");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(WebClient::from_base_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/query");
            then.status(503).body("overloaded");
        });

        let client = WebClient::from_base_url(&server.base_url())
            .unwrap()
            .with_retries(2);
        let result: Result<serde_json::Value> =
            client.post_json("query", &[], &serde_json::json!({})).await;

        api_mock.assert_hits(3);
        assert!(matches!(
            result,
            Err(ApiError::Service { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/query");
            then.status(404).body("unknown station");
        });

        let client = WebClient::from_base_url(&server.base_url())
            .unwrap()
            .with_retries(2);
        let result: Result<serde_json::Value> =
            client.post_json("query", &[], &serde_json::json!({})).await;

        api_mock.assert_hits(1);
        assert!(matches!(
            result,
            Err(ApiError::Service { status: 404, .. })
        ));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(is_retryable(&ApiError::Service {
            status: 500,
            message: String::new()
        }));
        assert!(!is_retryable(&ApiError::Service {
            status: 400,
            message: String::new()
        }));
        assert!(!is_retryable(&ApiError::Validation {
            message: String::new()
        }));
    }
}
