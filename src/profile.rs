//! Profile display and resume download

use base64::Engine;
use reqwest::Method;
use std::path::{Path, PathBuf};

use converge_protocol::api::ResumeDownloadResponse;
use converge_protocol::common::{Profile, ResumeSource};

use crate::client::ApiClient;
use crate::error::{ConvergeError, Result};
use crate::ui::UI;

/// Read-side profile operations
pub struct ProfileService<'a, C: ApiClient> {
    client: &'a C,
}

impl<'a, C: ApiClient> ProfileService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetch the logged-in user's profile
    pub async fn my_profile(&self) -> Result<Profile> {
        self.client
            .authenticated_request::<(), Profile>(Method::GET, "/profile/me", None)
            .await?
            .into_data("profile")
    }

    /// Fetch another user's profile by id
    pub async fn profile(&self, id: i64) -> Result<Profile> {
        let endpoint = format!("/profile/{}", id);
        let response = self
            .client
            .authenticated_request::<(), Profile>(Method::GET, &endpoint, None)
            .await?;
        response
            .data
            .ok_or_else(|| ConvergeError::profile_not_found(format!("profile {}", id)))
    }

    /// Download a resume PDF to disk
    ///
    /// `id` of `None` means the logged-in user's own resume. When `dest` is a
    /// directory, the server-provided filename (or `resume.pdf`) is used.
    pub async fn download_resume(&self, id: Option<i64>, dest: &Path) -> Result<PathBuf> {
        let endpoint = match id {
            Some(id) => format!("/profile/{}/resume", id),
            None => "/profile/me/resume".to_string(),
        };

        let response = self
            .client
            .authenticated_request::<(), ResumeDownloadResponse>(Method::GET, &endpoint, None)
            .await?
            .into_data("resume")?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(response.content.as_bytes())
            .map_err(|e| ConvergeError::invalid_response(format!("bad resume encoding: {}", e)))?;

        let path = if dest.is_dir() {
            dest.join(response.filename.as_deref().unwrap_or("resume.pdf"))
        } else {
            dest.to_path_buf()
        };

        std::fs::write(&path, bytes)
            .map_err(|e| ConvergeError::io_from_error("Failed to write resume", e))?;
        Ok(path)
    }

    /// Print a profile card
    pub fn render(&self, ui: &UI, profile: &Profile) {
        let mut lines = Vec::new();
        if let Some(email) = &profile.email {
            lines.push(format!("Email:        {}", email));
        }
        if let Some(institution) = &profile.institution {
            lines.push(format!("Institution:  {}", institution));
        }
        if let Some(department) = &profile.department {
            lines.push(format!("Department:   {}", department));
        }
        if let Some(year) = &profile.year {
            lines.push(format!("Year:         {}", year));
        }
        if let Some(availability) = &profile.availability {
            lines.push(format!("Availability: {}", availability));
        }

        match profile.resume_source() {
            ResumeSource::PdfDataUri(_) => {
                lines.push("Resume:       PDF on file".to_string());
            }
            ResumeSource::Text(text) => {
                lines.push(format!("Resume:       {}", excerpt(&text, 120)));
            }
            ResumeSource::None => {
                lines.push("Resume:       none uploaded".to_string());
            }
        }

        ui.card(profile.display_name(), &lines);
    }
}

fn excerpt(text: &str, limit: usize) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= limit {
        flattened
    } else {
        let cut: String = flattened.chars().take(limit).collect();
        format!("{}…", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockApiClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_my_profile() {
        let mock = MockApiClient::new();
        mock.add_response(
            "/profile/me",
            json!({"success": true, "data": {"fullName": "Ada Lovelace", "email": "ada@uni.edu"}}),
        );

        let service = ProfileService::new(&mock);
        let profile = service.my_profile().await.unwrap();
        assert_eq!(profile.display_name(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_profile_missing_data_is_not_found() {
        let mock = MockApiClient::new();
        mock.add_response("/profile/9", json!({"success": true}));

        let service = ProfileService::new(&mock);
        let err = service.profile(9).await.unwrap_err();
        assert!(matches!(err, ConvergeError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_download_resume_decodes_base64() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockApiClient::new();
        // "%PDF-" base64 encoded
        mock.add_response(
            "/profile/me/resume",
            json!({"success": true, "data": {"filename": "ada.pdf", "content": "JVBERi0="}}),
        );

        let service = ProfileService::new(&mock);
        let path = service.download_resume(None, dir.path()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "ada.pdf");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-");
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short text", 120), "short text");
        let long = "word ".repeat(100);
        let cut = excerpt(&long, 20);
        assert!(cut.ends_with('…'));
        assert!(cut.chars().count() <= 21);
    }
}
