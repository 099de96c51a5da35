//! Project DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::{Opportunity, OpportunityKind};

/// Create project request
///
/// Used for the POST /projects endpoint. Skill and technology lists travel
/// as comma-separated strings, matching what the posting form submits.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub description: String,
    #[validate(length(min = 1))]
    pub skills: String,
    #[serde(default)]
    pub preferred_tech: String,
    #[serde(default)]
    pub domains: String,
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    #[validate(url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    pub is_public: bool,
}

/// Create project response
pub type CreateProjectResponse = Opportunity;

/// Add teammate request
///
/// Used for POST /projects/{id}/teammates. The platform addresses invitees
/// by email, not by id.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddTeammateRequest {
    #[validate(email)]
    pub email: String,
}
