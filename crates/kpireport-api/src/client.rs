// PRTG HTTP client
//
// Wraps `reqwest::Client` with PRTG URL construction, credential query
// parameters, strict status checking, and bounded retry of transient
// failures. Endpoint methods live in `sensors.rs` and `historic.rs` as
// inherent impls so this module stays focused on transport mechanics.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{ApiCredentials, redacted, scrub};
use crate::error::Error;
use crate::transport::TransportConfig;

/// HTTP client for a PRTG core server's JSON API.
///
/// Every request carries the configured credentials as query parameters.
/// Any response other than `200 OK` is an error; there is no partial
/// success at this layer.
pub struct PrtgClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: ApiCredentials,
    timeout: Duration,
    retries: u32,
    retry_backoff: Duration,
}

impl PrtgClient {
    /// Create a client, building the underlying `reqwest::Client` from
    /// `transport`.
    ///
    /// `base_url` is the server root, e.g. `https://prtg.example.net`.
    pub fn new(
        base_url: Url,
        credentials: ApiCredentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            credentials,
            timeout: transport.timeout,
            retries: transport.retries,
            retry_backoff: transport.retry_backoff,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`, with default
    /// timeout and no retries.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: ApiCredentials) -> Self {
        let defaults = TransportConfig::default();
        Self {
            http,
            base_url,
            credentials,
            timeout: defaults.timeout,
            retries: defaults.retries,
            retry_backoff: defaults.retry_backoff,
        }
    }

    /// Override the retry policy. Mostly useful alongside `with_client`.
    pub fn with_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.retries = retries;
        self.retry_backoff = backoff;
        self
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The account name requests are made as.
    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{endpoint}` with `params` followed by the
    /// credential parameters.
    pub(crate) fn api_url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/api/{endpoint}"))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        self.credentials.apply(&mut url);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET `url` and decode the JSON body, retrying transient failures.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: Url,
    ) -> Result<T, Error> {
        let mut attempt = 0u32;
        loop {
            match self.get_json_once(endpoint, url.clone()).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    let delay = self.backoff_for(attempt);
                    warn!(
                        endpoint,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: Url,
    ) -> Result<T, Error> {
        debug!("GET {}", redacted(&url));

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: format!("{endpoint} rejected the supplied credentials"),
            });
        }
        if status != reqwest::StatusCode::OK {
            return Err(Error::Status {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{endpoint}: {e}"),
            body,
        })
    }

    /// Map a reqwest failure, masking the credentials its URL carries.
    fn classify(&self, mut err: reqwest::Error) -> Error {
        if let Some(url) = err.url_mut() {
            scrub(url);
        }
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    fn backoff_for(&self, attempt: u32) -> Duration {
        TransportConfig {
            retry_backoff: self.retry_backoff,
            ..TransportConfig::default()
        }
        .backoff_for(attempt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client(base: &str) -> PrtgClient {
        PrtgClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            ApiCredentials::password("prtgadmin", SecretString::from("pw".to_owned())),
        )
    }

    #[test]
    fn api_url_appends_params_then_credentials() {
        let c = client("https://prtg.local/");
        let url = c
            .api_url("table.json", &[("content", "sensors".to_owned())])
            .unwrap();
        assert_eq!(url.path(), "/api/table.json");
        assert_eq!(
            url.query(),
            Some("content=sensors&username=prtgadmin&password=pw")
        );
    }

    #[test]
    fn api_url_handles_base_without_trailing_slash() {
        let c = client("https://prtg.local:8443");
        let url = c.api_url("historicdata.json", &[]).unwrap();
        assert_eq!(url.as_str().split('?').next(), Some("https://prtg.local:8443/api/historicdata.json"));
    }
}
