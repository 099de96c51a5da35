//! HTTP client for the Converge platform API
//!
//! Every endpoint wraps its payload in the same `{success, data, error,
//! message}` envelope. `HttpClient` owns the reqwest client and delegates
//! token management to [`AuthClient`]. Services stay generic over
//! [`ApiClient`] so they can run against the mock in tests.

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::AuthClient;
use crate::config::{ClientConfig, Config};
use crate::error::{ConvergeError, Result};
use crate::store::{SessionIdentity, SessionStore};

/// Standard API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope around a payload
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Successful envelope with no payload
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: None,
        }
    }

    /// Unwrap the payload, or fail with a descriptive error
    pub fn into_data(self, what: &str) -> Result<T> {
        self.data
            .ok_or_else(|| ConvergeError::invalid_response(format!("response missing {}", what)))
    }
}

/// Abstraction over the platform API
///
/// Implemented by [`HttpClient`] for real traffic and by the recording mock
/// in tests.
pub trait ApiClient: Send + Sync {
    /// Identity of the logged-in user, if any
    fn identity(&self) -> Option<SessionIdentity>;

    /// Issue an authenticated request against an API endpoint
    fn authenticated_request<T, R>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
    ) -> impl std::future::Future<Output = Result<ApiResponse<R>>> + Send
    where
        T: Serialize + Sync,
        R: DeserializeOwned + Send;
}

/// Build a reqwest client with the configured timeout
pub(crate) fn build_http_client(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .danger_accept_invalid_certs(!config.verify_tls)
        .user_agent(concat!("converge-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ConvergeError::network_from_reqwest)
}

/// Join the base endpoint and an API path
pub(crate) fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Production API client backed by reqwest
pub struct HttpClient {
    http: Client,
    config: ClientConfig,
    auth: AuthClient,
}

impl HttpClient {
    /// Create a client from resolved configuration
    pub fn new(config: &Config) -> Result<Self> {
        let http = build_http_client(&config.client)?;
        let store = SessionStore::new(config.session_file()?);
        let auth = AuthClient::new(http.clone(), config.client.clone(), store)?;
        Ok(Self {
            http,
            config: config.client.clone(),
            auth,
        })
    }

    /// Access the authentication layer
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    async fn send_once<T, R>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
        token: &str,
    ) -> Result<(StatusCode, ApiResponse<R>)>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = join_url(&self.config.endpoint, endpoint);
        debug!(%method, %url, "api request");

        let mut request = self.http.request(method, &url).bearer_auth(token);
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiResponse<R> = serde_json::from_str(&body).map_err(|_| {
            ConvergeError::api(
                status.as_u16(),
                if body.is_empty() {
                    format!("empty response from {}", url)
                } else {
                    truncate_body(&body)
                },
            )
        })?;

        Ok((status, envelope))
    }
}

fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.len() <= LIMIT {
        return body.to_string();
    }
    let mut end = LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

impl ApiClient for HttpClient {
    fn identity(&self) -> Option<SessionIdentity> {
        self.auth.identity()
    }

    async fn authenticated_request<T, R>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
    ) -> Result<ApiResponse<R>>
    where
        T: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let token = self.auth.access_token().await?;
        let (status, envelope) = self
            .send_once(method.clone(), endpoint, payload, &token)
            .await?;

        // One refresh-and-retry on an expired token
        let (status, envelope) = if status == StatusCode::UNAUTHORIZED {
            warn!(endpoint, "access token rejected, refreshing");
            let token = self.auth.force_refresh().await?;
            self.send_once(method, endpoint, payload, &token).await?
        } else {
            (status, envelope)
        };

        if !envelope.success {
            let message = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "request failed".to_string());
            return Err(match status {
                StatusCode::UNAUTHORIZED => ConvergeError::authentication(message),
                StatusCode::FORBIDDEN => ConvergeError::authorization(message),
                StatusCode::NOT_FOUND => ConvergeError::not_found(message),
                _ => ConvergeError::api(status.as_u16(), message),
            });
        }

        Ok(envelope)
    }
}
