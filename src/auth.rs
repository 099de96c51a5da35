//! Authentication and token lifecycle
//!
//! Login exchanges an API key for an access/refresh token pair plus the
//! user's identity. The access token is refreshed transparently when it
//! nears expiry; a dead refresh token means the user has to log in again.

use chrono::{Duration, Utc};
use reqwest::Client;
use std::sync::Mutex;
use tracing::{debug, info};

use converge_protocol::api::{
    AuthResponse, LoginRequest, RefreshTokenRequest, RefreshTokenResponse,
    RevokeRefreshTokenRequest,
};

use crate::client::{join_url, ApiResponse};
use crate::config::ClientConfig;
use crate::error::{ConvergeError, Result};
use crate::store::{SessionIdentity, SessionStore, StoredSession};

/// Manages login state and token refresh
pub struct AuthClient {
    http: Client,
    config: ClientConfig,
    store: SessionStore,
    // Never held across an await; cloned out before any network call.
    session: Mutex<Option<StoredSession>>,
}

impl AuthClient {
    /// Create the auth layer, loading any persisted session
    pub fn new(http: Client, config: ClientConfig, store: SessionStore) -> Result<Self> {
        let session = store.load()?;
        Ok(Self {
            http,
            config,
            store,
            session: Mutex::new(session),
        })
    }

    /// Identity of the logged-in user, if a session exists
    pub fn identity(&self) -> Option<SessionIdentity> {
        self.session
            .lock()
            .ok()?
            .as_ref()
            .map(|s| s.identity.clone())
    }

    /// Whether a session is present (it may still need a refresh)
    pub fn is_authenticated(&self) -> bool {
        self.session
            .lock()
            .map(|s| s.is_some())
            .unwrap_or(false)
    }

    /// Exchange an API key for a session
    pub async fn login(&self, api_key: &str) -> Result<SessionIdentity> {
        let url = join_url(&self.config.endpoint, "/auth/login");
        let request = LoginRequest {
            api_key: api_key.to_string(),
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();
        let envelope: ApiResponse<AuthResponse> = response
            .json()
            .await
            .map_err(|e| ConvergeError::invalid_response(e.to_string()))?;

        if !envelope.success {
            let message = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| format!("login failed with status {}", status));
            return Err(ConvergeError::authentication(message));
        }

        let auth = envelope.into_data("auth response")?;
        let session = Self::session_from_auth(auth);
        self.store.save(&session)?;
        let identity = session.identity.clone();

        if let Ok(mut guard) = self.session.lock() {
            *guard = Some(session);
        }

        info!(username = %identity.username, "logged in");
        Ok(identity)
    }

    /// Revoke the refresh token and drop the session
    pub async fn logout(&self) -> Result<()> {
        let refresh_token = {
            let guard = self
                .session
                .lock()
                .map_err(|_| ConvergeError::internal("session lock poisoned"))?;
            guard.as_ref().map(|s| s.refresh_token.clone())
        };

        if let Some(refresh_token) = refresh_token {
            let url = join_url(&self.config.endpoint, "/auth/revoke");
            let request = RevokeRefreshTokenRequest { refresh_token };
            // Best effort; the local session goes away either way.
            if let Err(e) = self.http.post(&url).json(&request).send().await {
                debug!(error = %e, "revoke request failed");
            }
        }

        self.store.clear()?;
        if let Ok(mut guard) = self.session.lock() {
            *guard = None;
        }
        Ok(())
    }

    /// Return a valid access token, refreshing first if expired
    pub async fn access_token(&self) -> Result<String> {
        let session = {
            let guard = self
                .session
                .lock()
                .map_err(|_| ConvergeError::internal("session lock poisoned"))?;
            guard.clone()
        };

        let session = session.ok_or_else(ConvergeError::session_not_found)?;

        if !session.access_expired() {
            return Ok(session.access_token);
        }

        self.refresh(session).await
    }

    /// Refresh unconditionally (used after a 401)
    pub async fn force_refresh(&self) -> Result<String> {
        let session = {
            let guard = self
                .session
                .lock()
                .map_err(|_| ConvergeError::internal("session lock poisoned"))?;
            guard.clone()
        };
        let session = session.ok_or_else(ConvergeError::session_not_found)?;
        self.refresh(session).await
    }

    async fn refresh(&self, session: StoredSession) -> Result<String> {
        if session.refresh_expired() {
            self.store.clear()?;
            if let Ok(mut guard) = self.session.lock() {
                *guard = None;
            }
            return Err(ConvergeError::token_expired(
                "Session expired. Run `converge login` again.",
            ));
        }

        debug!("refreshing access token");
        let url = join_url(&self.config.endpoint, "/auth/refresh");
        let request = RefreshTokenRequest {
            refresh_token: session.refresh_token.clone(),
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let envelope: ApiResponse<RefreshTokenResponse> = response
            .json()
            .await
            .map_err(|e| ConvergeError::invalid_response(e.to_string()))?;

        if !envelope.success {
            let message = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "token refresh failed".to_string());
            return Err(ConvergeError::token_expired(message));
        }

        let refreshed = envelope.into_data("refresh response")?;
        let updated = StoredSession {
            access_token: refreshed.access_token.clone(),
            refresh_token: refreshed.refresh_token,
            access_expires_at: Utc::now() + Duration::minutes(refreshed.expires_in),
            refresh_expires_at: Utc::now() + Duration::hours(refreshed.refresh_expires_in),
            identity: session.identity,
        };

        self.store.save(&updated)?;
        let token = updated.access_token.clone();
        if let Ok(mut guard) = self.session.lock() {
            *guard = Some(updated);
        }
        Ok(token)
    }

    fn session_from_auth(auth: AuthResponse) -> StoredSession {
        StoredSession {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            access_expires_at: Utc::now() + Duration::minutes(auth.expires_in),
            refresh_expires_at: Utc::now() + Duration::hours(auth.refresh_expires_in),
            identity: SessionIdentity {
                user_id: auth.user_id,
                username: auth.username,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_response() -> AuthResponse {
        AuthResponse {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_in: 30,
            refresh_expires_in: 24,
            token_type: "Bearer".to_string(),
            username: "ada".to_string(),
            user_id: 7,
        }
    }

    #[test]
    fn test_session_from_auth() {
        let session = AuthClient::session_from_auth(auth_response());
        assert_eq!(session.identity.user_id, 7);
        assert_eq!(session.identity.username, "ada");
        assert!(!session.access_expired());
        assert!(!session.refresh_expired());
        // access expiry is minutes, refresh expiry is hours
        assert!(session.refresh_expires_at > session.access_expires_at);
    }

    #[test]
    fn test_identity_from_persisted_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .save(&AuthClient::session_from_auth(auth_response()))
            .unwrap();

        let auth = AuthClient::new(
            Client::new(),
            ClientConfig::default(),
            SessionStore::new(dir.path().join("session.json")),
        )
        .unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(auth.identity().unwrap().user_id, 7);
    }

    #[test]
    fn test_no_session_means_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let auth = AuthClient::new(
            Client::new(),
            ClientConfig::default(),
            SessionStore::new(dir.path().join("missing.json")),
        )
        .unwrap();
        assert!(!auth.is_authenticated());
        assert!(auth.identity().is_none());
    }
}
