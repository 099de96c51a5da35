//! Matching service DTOs
//!
//! The ranked list comes straight from the external ML matching engine; the
//! client treats it as read-only. Scores are fractions in [0,1].

use serde::{Deserialize, Serialize};

use crate::common::Teammate;

/// First-layer capability sub-scores for a candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityScores {
    pub s_skills: f64,
    pub s_experience: f64,
}

/// One ranked candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub resume_id: i64,
    pub final_score: f64,
    pub layer1_capability: CapabilityScores,
    pub profile: Teammate,
}

/// Ranked teammate matches for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub project_id: i64,
    pub matches: Vec<CandidateMatch>,
}

impl CandidateMatch {
    /// Final score as a rounded percentage for display.
    pub fn percent(&self) -> u32 {
        (self.final_score * 100.0).round() as u32
    }

    pub fn skills_percent(&self) -> u32 {
        (self.layer1_capability.s_skills * 100.0).round() as u32
    }

    pub fn experience_percent(&self) -> u32 {
        (self.layer1_capability.s_experience * 100.0).round() as u32
    }
}
