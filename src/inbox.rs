//! Pending request inbox
//!
//! Two kinds of notifications land here: invites to join a project and
//! obligations to rate a former teammate. Accepting an invite refreshes both
//! the request list and the caller's project list. A rating request whose
//! references no longer resolve is rejected with a stale-reference error
//! before any survey prompt appears.

use reqwest::Method;
use tracing::info;

use converge_protocol::common::{Opportunity, RequestKind, Teammate, TeammateRequest};

use crate::client::ApiClient;
use crate::error::{ConvergeError, Result};
use crate::project::ProjectService;
use crate::ui::UI;

/// Pending-request operations
pub struct InboxService<'a, C: ApiClient> {
    client: &'a C,
}

impl<'a, C: ApiClient> InboxService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetch pending requests for the logged-in user
    pub async fn pending(&self) -> Result<Vec<TeammateRequest>> {
        let response = self
            .client
            .authenticated_request::<(), Vec<TeammateRequest>>(Method::GET, "/requests", None)
            .await?;
        Ok(response.data.unwrap_or_default())
    }

    /// Accept an invite, then refresh both dependent views
    pub async fn accept_invite(
        &self,
        request: &TeammateRequest,
    ) -> Result<(Vec<TeammateRequest>, Vec<Opportunity>)> {
        if request.kind != RequestKind::Invite {
            return Err(ConvergeError::invalid_input(
                "only invites can be accepted; rating requests are answered with `converge rate`",
            ));
        }

        let endpoint = format!("/requests/{}/accept", request.request_id);
        self.client
            .authenticated_request::<(), serde_json::Value>(Method::POST, &endpoint, None)
            .await?;
        info!(request_id = request.request_id, "invite accepted");

        let requests = self.pending().await?;
        let projects = ProjectService::new(self.client).mine().await?;
        Ok((requests, projects))
    }

    /// Resolve the target of a rating request
    ///
    /// Both the project and ratee references must be present; otherwise the
    /// request is stale and rejected here, with no prompt and no network call.
    pub fn rating_target(&self, request: &TeammateRequest) -> Result<(i64, Teammate)> {
        if request.kind != RequestKind::RatingRequest {
            return Err(ConvergeError::invalid_input(
                "request is not a rating request",
            ));
        }

        let project_id = request.project_id.ok_or_else(|| {
            ConvergeError::stale_reference(format!(
                "rating request {} no longer references a project",
                request.request_id
            ))
        })?;
        let ratee_id = request.ratee_id.ok_or_else(|| {
            ConvergeError::stale_reference(format!(
                "rating request {} no longer references a teammate",
                request.request_id
            ))
        })?;

        let subject = Teammate {
            id: Some(ratee_id),
            name: request.ratee_name.clone(),
            ..Teammate::default()
        };
        Ok((project_id, subject))
    }

    /// Print one inbox row
    pub fn render_row(&self, ui: &UI, request: &TeammateRequest) {
        let when = request.created_at.format("%Y-%m-%d");
        match request.kind {
            RequestKind::Invite => {
                ui.line(&format!(
                    "  #{:<5} [invite]  {} invites you to \"{}\" ({})",
                    request.request_id,
                    request.requester_email.as_deref().unwrap_or("someone"),
                    request.project_title.as_deref().unwrap_or("a project"),
                    when
                ));
            }
            RequestKind::RatingRequest => {
                ui.line(&format!(
                    "  #{:<5} [rating]  rate {} for \"{}\" ({})",
                    request.request_id,
                    request.ratee_name.as_deref().unwrap_or("a teammate"),
                    request.project_title.as_deref().unwrap_or("a project"),
                    when
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::tests::mocks::MockApiClient;
    use crate::tests::utils::opportunity_json;
    use serde_json::json;

    fn request(json: serde_json::Value) -> TeammateRequest {
        serde_json::from_value(json).unwrap()
    }

    fn invite() -> TeammateRequest {
        request(json!({
            "requestId": 4,
            "type": "INVITE",
            "projectId": 12,
            "requesterEmail": "owner@campus.edu",
            "createdAt": "2025-12-01T08:30:00Z"
        }))
    }

    #[tokio::test]
    async fn test_accept_refreshes_requests_and_projects() {
        let mock = MockApiClient::new();
        mock.add_response("/requests/4/accept", json!({"success": true}));
        mock.add_response("/requests", json!({"success": true, "data": []}));
        mock.add_response(
            "/projects/mine",
            json!({"success": true, "data": [opportunity_json(12, "Drone Nav", "PROJECT")]}),
        );

        let service = InboxService::new(&mock);
        let (requests, projects) = service.accept_invite(&invite()).await.unwrap();
        assert!(requests.is_empty());
        assert_eq!(projects.len(), 1);

        let recorded: Vec<_> = mock.requests().iter().map(|r| r.endpoint.clone()).collect();
        assert_eq!(
            recorded,
            vec!["/requests/4/accept", "/requests", "/projects/mine"]
        );
    }

    #[tokio::test]
    async fn test_rating_request_cannot_be_accepted() {
        let mock = MockApiClient::new();
        let service = InboxService::new(&mock);
        let rating = request(json!({
            "requestId": 3,
            "type": "RATING_REQUEST",
            "projectId": 12,
            "rateeId": 42,
            "createdAt": "2025-12-01T08:30:00Z"
        }));
        assert!(service.accept_invite(&rating).await.is_err());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_rating_target_resolves() {
        let mock = MockApiClient::new();
        let service = InboxService::new(&mock);
        let rating = request(json!({
            "requestId": 3,
            "type": "RATING_REQUEST",
            "projectId": 12,
            "rateeId": 42,
            "rateeName": "Ada",
            "createdAt": "2025-12-01T08:30:00Z"
        }));

        let (project_id, subject) = service.rating_target(&rating).unwrap();
        assert_eq!(project_id, 12);
        assert_eq!(subject.subject_id(), Some(42));
        assert_eq!(subject.display_name(), "Ada");
    }

    #[test]
    fn test_stale_rating_request_rejected() {
        let mock = MockApiClient::new();
        let service = InboxService::new(&mock);

        let missing_project = request(json!({
            "requestId": 3,
            "type": "RATING_REQUEST",
            "rateeId": 42,
            "createdAt": "2025-12-01T08:30:00Z"
        }));
        let err = service.rating_target(&missing_project).unwrap_err();
        assert_eq!(err.code(), ErrorCode::StaleReference);

        let missing_ratee = request(json!({
            "requestId": 3,
            "type": "RATING_REQUEST",
            "projectId": 12,
            "createdAt": "2025-12-01T08:30:00Z"
        }));
        let err = service.rating_target(&missing_ratee).unwrap_err();
        assert_eq!(err.code(), ErrorCode::StaleReference);
    }
}
