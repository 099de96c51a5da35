//! Mock implementations for testing

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Mutex;

use crate::client::{ApiClient, ApiResponse};
use crate::error::{ConvergeError, Result};
use crate::store::SessionIdentity;

/// One request the mock saw, with its serialized payload
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub endpoint: String,
    /// `Null` for requests without a body
    pub payload: serde_json::Value,
}

/// Recording API client
///
/// Canned envelopes are queued per endpoint and consumed in FIFO order, so a
/// test can script successive calls to the same endpoint. Every request is
/// recorded whether or not a response was scripted, which is what the
/// "nothing reached the network" assertions check against.
pub struct MockApiClient {
    identity: Option<SessionIdentity>,
    responses: Mutex<Vec<(String, serde_json::Value)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockApiClient {
    /// Mock with a logged-in test identity
    pub fn new() -> Self {
        Self {
            identity: Some(SessionIdentity {
                user_id: 7,
                username: "ada".to_string(),
            }),
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Mock with no session
    pub fn new_logged_out() -> Self {
        Self {
            identity: None,
            ..Self::new()
        }
    }

    /// Queue an envelope for an endpoint
    pub fn add_response(&self, endpoint: &str, envelope: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .push((endpoint.to_string(), envelope));
    }

    /// Everything the mock has been asked so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn take_response(&self, endpoint: &str) -> Option<serde_json::Value> {
        let mut responses = self.responses.lock().unwrap();
        let index = responses.iter().position(|(e, _)| e == endpoint)?;
        Some(responses.remove(index).1)
    }
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient for MockApiClient {
    fn identity(&self) -> Option<SessionIdentity> {
        self.identity.clone()
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
        let payload = match payload {
            Some(p) => serde_json::to_value(p)?,
            None => serde_json::Value::Null,
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            endpoint: endpoint.to_string(),
            payload,
        });

        let envelope = self
            .take_response(endpoint)
            .ok_or_else(|| ConvergeError::internal(format!("no mock response for {}", endpoint)))?;

        let envelope: ApiResponse<R> = serde_json::from_value(envelope)
            .map_err(|e| ConvergeError::invalid_response(e.to_string()))?;

        if !envelope.success {
            let message = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "request failed".to_string());
            return Err(ConvergeError::api(400, message));
        }

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_records_and_replays() {
        let mock = MockApiClient::new();
        mock.add_response("/x", json!({"success": true, "data": 1}));
        mock.add_response("/x", json!({"success": true, "data": 2}));

        let first: ApiResponse<i64> = mock
            .authenticated_request::<(), i64>(Method::GET, "/x", None)
            .await
            .unwrap();
        let second: ApiResponse<i64> = mock
            .authenticated_request::<(), i64>(Method::GET, "/x", None)
            .await
            .unwrap();

        assert_eq!(first.data, Some(1));
        assert_eq!(second.data, Some(2));
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_unscripted_endpoint_errors() {
        let mock = MockApiClient::new();
        let result = mock
            .authenticated_request::<(), i64>(Method::GET, "/nope", None)
            .await;
        assert!(result.is_err());
        // the request is still recorded
        assert_eq!(mock.requests()[0].endpoint, "/nope");
    }
}
