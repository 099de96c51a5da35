//! Resume ingestion pipeline
//!
//! Accepts exactly one PDF, extracts plain text page by page, and uploads
//! the concatenated text (never the binary) to the profile endpoint. The
//! progress bar tracks real page extraction, with the final tick reserved
//! for the network call. Any failure aborts before partial submission.

use lopdf::Document;
use reqwest::Method;
use std::path::Path;
use tracing::{debug, info};

use converge_protocol::api::UploadResumeRequest;

use crate::client::ApiClient;
use crate::error::{ConvergeError, Result};
use crate::ui::UI;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Outcome of a completed ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub pages: usize,
    pub characters: usize,
}

/// Resume ingestion service
pub struct ResumeService<'a, C: ApiClient> {
    client: &'a C,
}

impl<'a, C: ApiClient> ResumeService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Run the full pipeline: validate, extract, upload
    pub async fn ingest(&self, path: &Path, ui: &UI) -> Result<IngestReport> {
        let bytes = Self::read_pdf(path)?;

        let doc = Document::load_mem(&bytes)
            .map_err(|e| ConvergeError::extraction(format!("could not parse PDF: {}", e)))?;
        let pages = doc.get_pages();
        let page_count = pages.len();
        debug!(path = %path.display(), page_count, "extracting resume text");

        // One tick per page, plus one for the upload.
        let bar = ui.progress_bar(page_count as u64 + 1, "Extracting");
        let mut page_texts = Vec::with_capacity(page_count);
        for page_number in pages.keys() {
            let text = doc.extract_text(&[*page_number]).map_err(|e| {
                bar.abandon();
                ConvergeError::extraction(format!(
                    "text extraction failed on page {}: {}",
                    page_number, e
                ))
            })?;
            page_texts.push(text);
            bar.inc(1);
        }

        let full_text = page_texts.join("\n\n");
        let characters = full_text.chars().count();

        bar.set_message("Uploading");
        let result = self.upload_text(full_text).await;
        match result {
            Ok(()) => {
                bar.finish_and_clear();
                info!(pages = page_count, characters, "resume ingested");
                Ok(IngestReport {
                    pages: page_count,
                    characters,
                })
            }
            Err(e) => {
                bar.abandon();
                Err(e)
            }
        }
    }

    /// Upload already-extracted resume text
    pub async fn upload_text(&self, resume_text: String) -> Result<()> {
        let request = UploadResumeRequest { resume_text };
        self.client
            .authenticated_request::<UploadResumeRequest, serde_json::Value>(
                Method::PUT,
                "/profile/me/resume",
                Some(&request),
            )
            .await
            .map_err(|e| match e {
                e @ ConvergeError::Validation { .. } => e,
                other => ConvergeError::resume_upload(other.to_string()),
            })?;
        Ok(())
    }

    /// Validate the declared type and load the file
    ///
    /// Both checks happen before any extraction or network activity: the
    /// extension must be `.pdf` and the content must carry the PDF magic.
    fn read_pdf(path: &Path) -> Result<Vec<u8>> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if extension.as_deref() != Some("pdf") {
            return Err(ConvergeError::not_a_pdf(format!(
                "{} is not a PDF document",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| ConvergeError::io_from_error("Failed to read resume file", e))?;

        if !bytes.starts_with(PDF_MAGIC) {
            return Err(ConvergeError::not_a_pdf(format!(
                "{} does not contain PDF data",
                path.display()
            )));
        }

        Ok(bytes)
    }
}
