//! Teammate match display and invites
//!
//! The ranked list comes from the external matching engine and is rendered
//! read-only. Invites are tracked locally so the same candidate cannot be
//! invited twice from one sitting, whatever the server would say.

use reqwest::Method;
use std::collections::HashSet;

use converge_protocol::api::{CandidateMatch, MatchResponse};

use crate::client::ApiClient;
use crate::error::{ConvergeError, Result};
use crate::project::ProjectService;
use crate::ui::UI;

/// Locally recorded invites, keyed by candidate id
#[derive(Debug, Default)]
pub struct InviteTracker {
    sent: HashSet<i64>,
}

impl InviteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn already_sent(&self, candidate_id: i64) -> bool {
        self.sent.contains(&candidate_id)
    }

    /// Record an invite; returns false if it was already recorded
    pub fn record(&mut self, candidate_id: i64) -> bool {
        self.sent.insert(candidate_id)
    }
}

/// Match retrieval and invite flow
pub struct MatchService<'a, C: ApiClient> {
    client: &'a C,
}

impl<'a, C: ApiClient> MatchService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Ranked candidate matches for a project
    pub async fn matches(&self, project_id: i64) -> Result<MatchResponse> {
        let endpoint = format!("/projects/{}/matches", project_id);
        self.client
            .authenticated_request::<(), MatchResponse>(Method::GET, &endpoint, None)
            .await?
            .into_data("matches")
    }

    /// Invite a candidate unless already recorded locally
    ///
    /// Returns `Ok(false)` when the tracker suppressed a duplicate; the
    /// network is only touched on the first attempt.
    pub async fn invite(
        &self,
        project_id: i64,
        candidate: &CandidateMatch,
        tracker: &mut InviteTracker,
    ) -> Result<bool> {
        let candidate_id = candidate
            .profile
            .subject_id()
            .unwrap_or(candidate.resume_id);

        if tracker.already_sent(candidate_id) {
            return Ok(false);
        }

        let email = candidate.profile.email.as_deref().ok_or_else(|| {
            ConvergeError::invalid_input(format!(
                "candidate {} has no contact email",
                candidate.profile.display_name()
            ))
        })?;

        ProjectService::new(self.client)
            .invite(project_id, email)
            .await?;
        tracker.record(candidate_id);
        Ok(true)
    }

    /// Print one ranked candidate
    pub fn render(&self, ui: &UI, rank: usize, candidate: &CandidateMatch, invited: bool) {
        let marker = if invited { " (invited)" } else { "" };
        ui.line(&format!(
            "{:>3}. {}{}",
            rank,
            candidate.profile.display_name(),
            marker
        ));
        ui.line(&format!("     {}", ui.score_bar("match", candidate.percent())));
        ui.line(&format!(
            "     {}",
            ui.score_bar("skills", candidate.skills_percent())
        ));
        ui.line(&format!(
            "     {}",
            ui.score_bar("experience", candidate.experience_percent())
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockApiClient;
    use serde_json::json;

    fn candidate(resume_id: i64, email: Option<&str>) -> CandidateMatch {
        serde_json::from_value(json!({
            "resume_id": resume_id,
            "final_score": 0.91,
            "layer1_capability": {"s_skills": 0.9, "s_experience": 0.8},
            "profile": {"resumeId": resume_id, "name": "Ada", "email": email}
        }))
        .unwrap()
    }

    #[test]
    fn test_tracker_records_once() {
        let mut tracker = InviteTracker::new();
        assert!(!tracker.already_sent(42));
        assert!(tracker.record(42));
        assert!(tracker.already_sent(42));
        assert!(!tracker.record(42));
    }

    #[tokio::test]
    async fn test_invite_sends_then_suppresses_duplicate() {
        let mock = MockApiClient::new();
        mock.add_response("/projects/5/teammates", json!({"success": true}));

        let service = MatchService::new(&mock);
        let mut tracker = InviteTracker::new();
        let candidate = candidate(42, Some("ada@uni.edu"));

        assert!(service.invite(5, &candidate, &mut tracker).await.unwrap());
        assert!(!service.invite(5, &candidate, &mut tracker).await.unwrap());

        let requests = mock.requests();
        assert_eq!(requests.len(), 1, "second invite must not hit the network");
        assert_eq!(requests[0].payload["email"], "ada@uni.edu");
    }

    #[tokio::test]
    async fn test_failed_invite_is_not_recorded() {
        let mock = MockApiClient::new();
        mock.add_response(
            "/projects/5/teammates",
            json!({"success": false, "error": "already a teammate"}),
        );
        mock.add_response("/projects/5/teammates", json!({"success": true}));

        let service = MatchService::new(&mock);
        let mut tracker = InviteTracker::new();
        let candidate = candidate(42, Some("ada@uni.edu"));

        assert!(service.invite(5, &candidate, &mut tracker).await.is_err());
        // first attempt failed, so a retry goes through
        assert!(service.invite(5, &candidate, &mut tracker).await.unwrap());
    }

    #[tokio::test]
    async fn test_invite_without_email_fails_locally() {
        let mock = MockApiClient::new();
        let service = MatchService::new(&mock);
        let mut tracker = InviteTracker::new();
        let candidate = candidate(42, None);

        assert!(service.invite(5, &candidate, &mut tracker).await.is_err());
        assert!(mock.requests().is_empty());
        assert!(!tracker.already_sent(42));
    }

    #[tokio::test]
    async fn test_matches_fetch() {
        let mock = MockApiClient::new();
        mock.add_response(
            "/projects/5/matches",
            json!({"success": true, "data": {
                "project_id": 5,
                "matches": [{
                    "resume_id": 42,
                    "final_score": 0.876,
                    "layer1_capability": {"s_skills": 0.9, "s_experience": 0.5},
                    "profile": {"resumeId": 42, "name": "Ada"}
                }]
            }}),
        );

        let service = MatchService::new(&mock);
        let response = service.matches(5).await.unwrap();
        assert_eq!(response.matches.len(), 1);
        assert_eq!(response.matches[0].percent(), 88);
    }
}
