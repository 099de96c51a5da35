//! Resume DTOs
//!
//! Uploads carry the extracted text only; the PDF binary never leaves the
//! client. Downloads come back base64 encoded.

use serde::{Deserialize, Serialize};

/// Upload extracted resume text, PUT /profile/me/resume
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResumeRequest {
    pub resume_text: String,
}

/// Resume download response, GET /profile/{id}/resume
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDownloadResponse {
    #[serde(default)]
    pub filename: Option<String>,
    /// Base64-encoded PDF bytes.
    pub content: String,
}
