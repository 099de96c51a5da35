//! Pending teammate request structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind tag on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    #[serde(rename = "INVITE")]
    Invite,
    #[serde(rename = "RATING_REQUEST")]
    RatingRequest,
}

/// A pending invite-to-join or obligation-to-rate notification.
///
/// Invites carry a requester email; rating requests carry the ratee identity
/// instead. Both reference a project, though a rating request generated
/// before a project was deleted may arrive with the reference missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeammateRequest {
    pub request_id: i64,
    #[serde(rename = "type")]
    pub kind: RequestKind,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub requester_email: Option<String>,
    #[serde(default)]
    pub ratee_id: Option<i64>,
    #[serde(default)]
    pub ratee_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_kind_tags() {
        let json = r#"{
            "requestId": 3,
            "type": "RATING_REQUEST",
            "projectId": 12,
            "projectTitle": "Drone Nav",
            "rateeId": 42,
            "rateeName": "Ada",
            "createdAt": "2025-12-01T08:30:00Z"
        }"#;
        let req: TeammateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.kind, RequestKind::RatingRequest);
        assert_eq!(req.ratee_id, Some(42));

        let json = r#"{
            "requestId": 4,
            "type": "INVITE",
            "projectId": 12,
            "requesterEmail": "owner@campus.edu",
            "createdAt": "2025-12-01T08:30:00Z"
        }"#;
        let req: TeammateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.kind, RequestKind::Invite);
        assert!(req.ratee_id.is_none());
    }
}
