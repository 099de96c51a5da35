//! Project feed, posting, and lifecycle

use clap::ValueEnum;
use reqwest::Method;
use tracing::{info, warn};
use validator::Validate;

use converge_protocol::api::{AddTeammateRequest, CreateProjectRequest};
use converge_protocol::common::{Opportunity, OpportunityKind};

use crate::client::ApiClient;
use crate::error::{ConvergeError, Result};
use crate::matching::MatchService;
use crate::ui::UI;

/// Category filter over the opportunity feed
///
/// A pure predicate over the opportunity kind; `All` is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FeedFilter {
    #[default]
    All,
    Project,
    Research,
    OpenSource,
}

impl FeedFilter {
    pub fn accepts(&self, kind: OpportunityKind) -> bool {
        match self {
            FeedFilter::All => true,
            FeedFilter::Project => kind == OpportunityKind::Project,
            FeedFilter::Research => kind == OpportunityKind::Research,
            FeedFilter::OpenSource => kind == OpportunityKind::OpenSource,
        }
    }

    /// Apply the filter, preserving order
    pub fn apply(&self, feed: Vec<Opportunity>) -> Vec<Opportunity> {
        feed.into_iter()
            .filter(|o| self.accepts(o.kind))
            .collect()
    }
}

/// Project operations
pub struct ProjectService<'a, C: ApiClient> {
    client: &'a C,
}

impl<'a, C: ApiClient> ProjectService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Projects owned by or joined by the logged-in user
    pub async fn mine(&self) -> Result<Vec<Opportunity>> {
        self.fetch_feed("/projects/mine").await
    }

    /// Public opportunity feed
    pub async fn explore(&self, filter: FeedFilter) -> Result<Vec<Opportunity>> {
        let feed = self.fetch_feed("/projects/explore").await?;
        Ok(filter.apply(feed))
    }

    async fn fetch_feed(&self, endpoint: &str) -> Result<Vec<Opportunity>> {
        let response = self
            .client
            .authenticated_request::<(), Vec<Opportunity>>(Method::GET, endpoint, None)
            .await?;
        // An empty feed comes back as missing data on some deployments.
        Ok(response.data.unwrap_or_default())
    }

    /// Full project detail including the team roster
    pub async fn detail(&self, id: i64) -> Result<Opportunity> {
        let endpoint = format!("/projects/{}", id);
        let response = self
            .client
            .authenticated_request::<(), Opportunity>(Method::GET, &endpoint, None)
            .await?;
        response
            .data
            .ok_or_else(|| ConvergeError::project_not_found(format!("project {}", id)))
    }

    /// Post a new opportunity
    ///
    /// On success the ranked matches for the new project are fetched right
    /// away; a match-fetch failure is non-fatal, the project stays created.
    pub async fn post(&self, request: CreateProjectRequest, ui: &UI) -> Result<Opportunity> {
        request.validate()?;

        let created = self
            .client
            .authenticated_request::<CreateProjectRequest, Opportunity>(
                Method::POST,
                "/projects",
                Some(&request),
            )
            .await?
            .into_data("created project")?;

        info!(project_id = created.id, title = %created.title, "project posted");

        match MatchService::new(self.client).matches(created.id).await {
            Ok(matches) if !matches.matches.is_empty() => {
                ui.info(&format!(
                    "{} candidate matches ready; run `converge matches {}` to review",
                    matches.matches.len(),
                    created.id
                ));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "match fetch after posting failed");
                ui.warning("Project created, but matches are not available yet.");
            }
        }

        Ok(created)
    }

    /// Invite a candidate to a project by email
    pub async fn invite(&self, project_id: i64, email: &str) -> Result<()> {
        let request = AddTeammateRequest {
            email: email.to_string(),
        };
        request.validate()?;

        let endpoint = format!("/projects/{}/teammates", project_id);
        self.client
            .authenticated_request::<AddTeammateRequest, serde_json::Value>(
                Method::POST,
                &endpoint,
                Some(&request),
            )
            .await?;
        Ok(())
    }

    /// Mark a project completed
    ///
    /// The server generates one rating request per teammate; nothing more to
    /// do client-side beyond refreshing.
    pub async fn complete(&self, project_id: i64) -> Result<()> {
        let endpoint = format!("/projects/{}/complete", project_id);
        self.client
            .authenticated_request::<(), serde_json::Value>(Method::POST, &endpoint, None)
            .await?;
        info!(project_id, "project completed");
        Ok(())
    }

    /// Print one feed row
    pub fn render_row(&self, ui: &UI, opportunity: &Opportunity) {
        let status = if opportunity.is_completed() {
            " [completed]"
        } else {
            ""
        };
        ui.line(&format!(
            "  #{:<6} {:<12} {}{}",
            opportunity.id,
            opportunity.kind.label(),
            opportunity.title,
            status
        ));
    }

    /// Print the full detail card
    pub fn render_detail(&self, ui: &UI, opportunity: &Opportunity) {
        let mut lines = vec![
            format!("Kind:     {}", opportunity.kind.label()),
            format!("Posted:   {}", opportunity.created_at.format("%Y-%m-%d")),
        ];
        lines.push(format!("Owner:    {}", opportunity.posted_by));
        if let Some(url) = &opportunity.github_url {
            lines.push(format!("GitHub:   {}", url));
        }
        if !opportunity.technologies.is_empty() {
            lines.push(format!("Tech:     {}", opportunity.technologies.join(", ")));
        }
        lines.push(String::new());
        lines.push(opportunity.description.clone());

        if !opportunity.teammates.is_empty() {
            lines.push(String::new());
            lines.push("Team:".to_string());
            for teammate in &opportunity.teammates {
                lines.push(format!("  - {}", teammate.display_name()));
            }
        }

        ui.card(&opportunity.title, &lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockApiClient;
    use crate::tests::utils::opportunity_json;
    use serde_json::json;

    fn feed() -> Vec<Opportunity> {
        serde_json::from_value(json!([
            opportunity_json(1, "SLAM drone", "PROJECT"),
            opportunity_json(2, "Protein folding study", "RESEARCH"),
            opportunity_json(3, "Parser crate", "OPEN_SOURCE"),
            opportunity_json(4, "Campus app", "PROJECT"),
        ]))
        .unwrap()
    }

    #[test]
    fn test_filter_all_is_identity() {
        let feed = feed();
        let filtered = FeedFilter::All.apply(feed.clone());
        assert_eq!(filtered.len(), feed.len());
        let ids: Vec<_> = filtered.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_filter_selects_kind_preserving_order() {
        let filtered = FeedFilter::Project.apply(feed());
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].id, 1);
        assert_eq!(filtered[1].id, 4);

        let filtered = FeedFilter::OpenSource.apply(feed());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 3);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = FeedFilter::Research.apply(feed());
        let twice = FeedFilter::Research.apply(once.clone());
        assert_eq!(once.len(), twice.len());
    }

    #[tokio::test]
    async fn test_explore_applies_filter() {
        let mock = MockApiClient::new();
        mock.add_response(
            "/projects/explore",
            json!({"success": true, "data": [
                opportunity_json(1, "SLAM drone", "PROJECT"),
                opportunity_json(2, "Protein folding study", "RESEARCH"),
            ]}),
        );

        let service = ProjectService::new(&mock);
        let feed = service.explore(FeedFilter::Research).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].title, "Protein folding study");
    }

    #[tokio::test]
    async fn test_empty_feed_tolerates_missing_data() {
        let mock = MockApiClient::new();
        mock.add_response("/projects/mine", json!({"success": true}));

        let service = ProjectService::new(&mock);
        assert!(service.mine().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_survives_match_fetch_failure() {
        let mock = MockApiClient::new();
        mock.add_response(
            "/projects",
            json!({"success": true, "data": opportunity_json(9, "New thing", "PROJECT")}),
        );
        mock.add_response(
            "/projects/9/matches",
            json!({"success": false, "error": "matching engine warming up"}),
        );

        let service = ProjectService::new(&mock);
        let request = CreateProjectRequest {
            title: "New thing".to_string(),
            description: "desc".to_string(),
            skills: "Rust".to_string(),
            preferred_tech: String::new(),
            domains: String::new(),
            kind: OpportunityKind::Project,
            github: None,
            is_public: true,
        };
        let created = service.post(request, &UI::plain()).await.unwrap();
        assert_eq!(created.id, 9);
    }

    #[tokio::test]
    async fn test_post_rejects_invalid_request_locally() {
        let mock = MockApiClient::new();
        let service = ProjectService::new(&mock);
        let request = CreateProjectRequest {
            title: String::new(),
            description: "desc".to_string(),
            skills: "Rust".to_string(),
            preferred_tech: String::new(),
            domains: String::new(),
            kind: OpportunityKind::Project,
            github: None,
            is_public: true,
        };
        assert!(service.post(request, &UI::plain()).await.is_err());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_complete_then_rating_requests_appear() {
        use crate::inbox::InboxService;
        use converge_protocol::common::RequestKind;

        let mock = MockApiClient::new();
        mock.add_response("/projects/12/complete", json!({"success": true}));
        mock.add_response(
            "/requests",
            json!({"success": true, "data": [
                {"requestId": 30, "type": "RATING_REQUEST", "projectId": 12,
                 "rateeId": 42, "rateeName": "Ada", "createdAt": "2025-12-01T08:30:00Z"},
                {"requestId": 31, "type": "RATING_REQUEST", "projectId": 12,
                 "rateeId": 43, "rateeName": "Grace", "createdAt": "2025-12-01T08:30:00Z"}
            ]}),
        );

        ProjectService::new(&mock).complete(12).await.unwrap();
        let pending = InboxService::new(&mock).pending().await.unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|r| r.kind == RequestKind::RatingRequest));
        assert_eq!(mock.requests()[0].endpoint, "/projects/12/complete");
    }

    #[tokio::test]
    async fn test_invite_validates_email_locally() {
        let mock = MockApiClient::new();
        let service = ProjectService::new(&mock);
        assert!(service.invite(1, "not-an-email").await.is_err());
        assert!(mock.requests().is_empty());
    }
}
