//! Profile and teammate structures
//!
//! Profiles come back from at least three different backend services, each
//! with its own naming habits. Serde aliases absorb the spelling variants,
//! and the accessor methods present one canonical view.

use serde::{Deserialize, Serialize};

/// A user profile as returned by the profile endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub id: Option<i64>,
    #[serde(alias = "fullName")]
    pub full_name: Option<String>,
    /// Older profile records carry `name` instead of `fullName`.
    pub name: Option<String>,
    pub email: Option<String>,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub availability: Option<String>,
    #[serde(alias = "resumeText", alias = "Resume")]
    pub resume_text: Option<String>,
    /// Raw resume PDF, base64 encoded, possibly already a data URI.
    #[serde(alias = "resumePdf")]
    pub resume_pdf: Option<String>,
}

/// Where a profile's displayable resume comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeSource {
    /// Embedded PDF normalized to a `data:application/pdf;base64,` URI.
    PdfDataUri(String),
    /// Extracted plain text.
    Text(String),
    /// No resume on file.
    None,
}

impl Profile {
    /// Canonical display name, falling back through the alias chain.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Unknown Candidate")
    }

    /// Resolve the displayable resume: embedded PDF wins over extracted
    /// text, and an absent resume is an explicit state rather than an error.
    pub fn resume_source(&self) -> ResumeSource {
        if let Some(pdf) = &self.resume_pdf {
            let uri = if pdf.starts_with("data:application/pdf") {
                pdf.clone()
            } else {
                format!("data:application/pdf;base64,{}", pdf)
            };
            return ResumeSource::PdfDataUri(uri);
        }
        if let Some(text) = &self.resume_text {
            if !text.is_empty() {
                return ResumeSource::Text(text.clone());
            }
        }
        ResumeSource::None
    }
}

/// A member of a project team.
///
/// Teammate records reach the client from project details, match results and
/// rating requests, and the identifier key differs between those sources.
/// `subject_id` is the one place the fallback chain is implemented.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Teammate {
    pub id: Option<i64>,
    #[serde(alias = "resumeId")]
    pub resume_id: Option<i64>,
    #[serde(alias = "userId")]
    pub user_id: Option<i64>,
    #[serde(alias = "fullName")]
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Teammate {
    /// First resolvable identifier, probing `id`, then `resumeId`/`resume_id`,
    /// then `userId`/`user_id`.
    pub fn subject_id(&self) -> Option<i64> {
        self.id.or(self.resume_id).or(self.user_id)
    }

    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Teammate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_name_alias_chain() {
        let p: Profile = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert_eq!(p.display_name(), "Ada");

        let p: Profile =
            serde_json::from_str(r#"{"fullName": "Ada Lovelace", "name": "Ada"}"#).unwrap();
        assert_eq!(p.display_name(), "Ada Lovelace");
    }

    #[test]
    fn resume_source_priority() {
        let p: Profile = serde_json::from_str(
            r#"{"resumePdf": "JVBERi0=", "resumeText": "plain text"}"#,
        )
        .unwrap();
        assert_eq!(
            p.resume_source(),
            ResumeSource::PdfDataUri("data:application/pdf;base64,JVBERi0=".to_string())
        );

        let p: Profile = serde_json::from_str(r#"{"Resume": "legacy text"}"#).unwrap();
        assert_eq!(p.resume_source(), ResumeSource::Text("legacy text".to_string()));

        let p = Profile::default();
        assert_eq!(p.resume_source(), ResumeSource::None);
    }

    #[test]
    fn resume_data_uri_not_doubled() {
        let p: Profile =
            serde_json::from_str(r#"{"resumePdf": "data:application/pdf;base64,JVBERi0="}"#)
                .unwrap();
        assert_eq!(
            p.resume_source(),
            ResumeSource::PdfDataUri("data:application/pdf;base64,JVBERi0=".to_string())
        );
    }

    #[test]
    fn teammate_subject_id_fallback_order() {
        let t: Teammate = serde_json::from_str(r#"{"resume_id": 42}"#).unwrap();
        assert_eq!(t.subject_id(), Some(42));

        let t: Teammate = serde_json::from_str(r#"{"resumeId": 42, "userId": 7}"#).unwrap();
        assert_eq!(t.subject_id(), Some(42));

        let t: Teammate =
            serde_json::from_str(r#"{"id": 1, "resume_id": 42, "user_id": 7}"#).unwrap();
        assert_eq!(t.subject_id(), Some(1));

        let t: Teammate = serde_json::from_str(r#"{"email": "x@y.z"}"#).unwrap();
        assert_eq!(t.subject_id(), None);
    }
}
