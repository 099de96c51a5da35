//! Peer rating submission
//!
//! Eight survey responses collapse to five category scores before
//! submission. Both identities are resolved up front: the rater comes from
//! an explicit [`RaterContext`] built off the session, the ratee from the
//! teammate record's identifier fallback chain. If either fails to resolve,
//! the submission is refused locally and nothing reaches the network.

use dialoguer::Input;
use reqwest::Method;
use tracing::info;
use validator::Validate;

use converge_protocol::api::{
    CategoryScores, RatingSubmission, RawScores, SURVEY_QUESTIONS,
};
use converge_protocol::common::Teammate;

use crate::client::ApiClient;
use crate::error::{ConvergeError, Result};
use crate::ui::UI;

/// Explicit identity of the rating author
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaterContext {
    pub user_id: i64,
}

impl RaterContext {
    /// Build from the client's session identity
    pub fn from_client<C: ApiClient>(client: &C) -> Result<Self> {
        let identity = client.identity().ok_or_else(|| {
            ConvergeError::unresolvable_identifier(
                "no session identity available to attribute the rating to",
            )
        })?;
        Ok(Self {
            user_id: identity.user_id,
        })
    }
}

/// Rating submission service
pub struct RatingService<'a, C: ApiClient> {
    client: &'a C,
}

impl<'a, C: ApiClient> RatingService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Transform and submit one rating
    ///
    /// Validates the raw scores, resolves both identifiers, applies the
    /// category transform, and posts the result. No automatic retry.
    pub async fn submit(
        &self,
        rater: RaterContext,
        subject: &Teammate,
        project_id: i64,
        raw: RawScores,
    ) -> Result<CategoryScores> {
        raw.validate()?;

        let ratee_id = subject.subject_id().ok_or_else(|| {
            ConvergeError::unresolvable_identifier(format!(
                "no identifier found for teammate {}",
                subject.display_name()
            ))
        })?;

        let category_scores = CategoryScores::from(raw);
        let submission = RatingSubmission {
            rater_id: rater.user_id,
            ratee_id,
            project_id,
            category_scores,
        };

        self.client
            .authenticated_request::<RatingSubmission, serde_json::Value>(
                Method::POST,
                "/ratings",
                Some(&submission),
            )
            .await?;

        info!(ratee_id, project_id, "rating submitted");
        Ok(category_scores)
    }
}

/// Run the interactive 8-question survey
pub fn prompt_raw_scores(ui: &UI, subject_name: &str) -> Result<RawScores> {
    ui.header(&format!("Rate your collaboration with {}", subject_name));
    ui.line("Answer each statement from 0 (strongly disagree) to 5 (strongly agree), in half steps.");
    ui.blank();

    let mut answers = [0.0f64; 8];
    for (i, question) in SURVEY_QUESTIONS.iter().enumerate() {
        let answer: f64 = Input::new()
            .with_prompt(format!("{}. {}", i + 1, question))
            .validate_with(|value: &f64| -> std::result::Result<(), &str> {
                if !(0.0..=5.0).contains(value) {
                    Err("score must be between 0 and 5")
                } else if (value * 2.0).fract() != 0.0 {
                    Err("score must be in half steps (0, 0.5, 1, ...)")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        answers[i] = answer;
    }

    Ok(RawScores::from_array(answers))
}

/// Print the category breakdown after a submission
pub fn render_categories(ui: &UI, scores: &CategoryScores) {
    ui.key_value("Technical", &format!("{:.1}", scores.technical));
    ui.key_value("Reliability", &format!("{:.1}", scores.reliability));
    ui.key_value("Communication", &format!("{:.1}", scores.communication));
    ui.key_value("Initiative", &format!("{:.1}", scores.initiative));
    ui.key_value("Overall", &format!("{:.1}", scores.overall));
}
