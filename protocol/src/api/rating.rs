//! Peer-rating DTOs and the score transform
//!
//! A rating is collected as 8 raw survey responses and submitted as 5
//! weighted category scores. The mapping is fixed:
//!
//! ```text
//! technical     = (q1 + q2) / 2
//! reliability   = (q3 + q4) / 2
//! communication = (q5 + q6) / 2
//! initiative    = q7
//! overall       = q8
//! ```

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// The 8 survey statements, in question order.
pub const SURVEY_QUESTIONS: [&str; 8] = [
    "This teammate made meaningful technical contributions to the project.",
    "The quality of this teammate's work met or exceeded project expectations.",
    "This teammate consistently met deadlines and commitments.",
    "This teammate followed through on assigned responsibilities without repeated reminders.",
    "This teammate communicated clearly and responded in a timely manner.",
    "This teammate was respectful, cooperative, and supportive of the team.",
    "This teammate took initiative beyond their assigned tasks when needed.",
    "I would be happy to collaborate with this teammate again on a future project.",
];

fn half_step(value: f64) -> Result<(), ValidationError> {
    if (value * 2.0).fract() != 0.0 {
        return Err(ValidationError::new("half_step"));
    }
    Ok(())
}

/// Raw survey responses, each in [0,5] at 0.5 increments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct RawScores {
    #[validate(range(min = 0.0, max = 5.0), custom(function = "half_step"))]
    pub q1: f64,
    #[validate(range(min = 0.0, max = 5.0), custom(function = "half_step"))]
    pub q2: f64,
    #[validate(range(min = 0.0, max = 5.0), custom(function = "half_step"))]
    pub q3: f64,
    #[validate(range(min = 0.0, max = 5.0), custom(function = "half_step"))]
    pub q4: f64,
    #[validate(range(min = 0.0, max = 5.0), custom(function = "half_step"))]
    pub q5: f64,
    #[validate(range(min = 0.0, max = 5.0), custom(function = "half_step"))]
    pub q6: f64,
    #[validate(range(min = 0.0, max = 5.0), custom(function = "half_step"))]
    pub q7: f64,
    #[validate(range(min = 0.0, max = 5.0), custom(function = "half_step"))]
    pub q8: f64,
}

impl RawScores {
    /// Neutral midpoint response to every question.
    pub fn neutral() -> Self {
        Self {
            q1: 2.5,
            q2: 2.5,
            q3: 2.5,
            q4: 2.5,
            q5: 2.5,
            q6: 2.5,
            q7: 2.5,
            q8: 2.5,
        }
    }

    pub fn from_array(values: [f64; 8]) -> Self {
        Self {
            q1: values[0],
            q2: values[1],
            q3: values[2],
            q4: values[3],
            q5: values[4],
            q6: values[5],
            q7: values[6],
            q8: values[7],
        }
    }
}

/// The 5 weighted category scores submitted to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub technical: f64,
    pub reliability: f64,
    pub communication: f64,
    pub initiative: f64,
    pub overall: f64,
}

impl From<RawScores> for CategoryScores {
    fn from(raw: RawScores) -> Self {
        Self {
            technical: (raw.q1 + raw.q2) / 2.0,
            reliability: (raw.q3 + raw.q4) / 2.0,
            communication: (raw.q5 + raw.q6) / 2.0,
            initiative: raw.q7,
            overall: raw.q8,
        }
    }
}

/// Rating submission payload for POST /ratings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSubmission {
    pub rater_id: i64,
    pub ratee_id: i64,
    pub project_id: i64,
    pub category_scores: CategoryScores,
}
