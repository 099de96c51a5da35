//! Opportunity (posted project) structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::Teammate;

/// Category of a posted opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityKind {
    Project,
    Research,
    OpenSource,
}

impl OpportunityKind {
    pub fn label(&self) -> &'static str {
        match self {
            OpportunityKind::Project => "PROJECT",
            OpportunityKind::Research => "RESEARCH",
            OpportunityKind::OpenSource => "OPEN SOURCE",
        }
    }
}

/// Lifecycle status of an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityStatus {
    Active,
    Completed,
}

/// A posted project, research or open-source listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub posted_by: String,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    pub status: OpportunityStatus,
    #[serde(default)]
    pub teammates: Vec<Teammate>,
    pub created_at: DateTime<Utc>,
}

impl Opportunity {
    pub fn is_completed(&self) -> bool {
        self.status == OpportunityStatus::Completed
    }
}
