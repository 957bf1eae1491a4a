//! Save a page-generated PDF and hand it to the share sheet.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use passcam_core::bridge::PdfPayload;
use tracing::{debug, info};

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::platform::{ShareRequest, ShareSink};

const PDF_MIME_TYPE: &str = "application/pdf";
const SHARE_TITLE: &str = "Passport information PDF";
const FALLBACK_NAME: &str = "document";

pub struct PdfExporter<S> {
    sink: S,
    documents_dir: PathBuf,
}

impl<S: ShareSink> PdfExporter<S> {
    pub fn new(sink: S, documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            sink,
            documents_dir: documents_dir.into(),
        }
    }

    /// Write PDFs to the configured `documents_dir`.
    pub fn from_config(sink: S, config: &ShellConfig) -> Self {
        Self::new(sink, config.documents_dir.clone())
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// Decode `payload`, write it under the documents directory and share it.
    ///
    /// Returns the written path. An existing file of the same name is
    /// overwritten.
    pub async fn export(&self, payload: &PdfPayload) -> Result<PathBuf, ShellError> {
        let bytes = decode_pdf(&payload.base64_data)?;
        let filename = sanitize_filename(&payload.filename);
        let path = self.documents_dir.join(&filename);

        tokio::fs::create_dir_all(&self.documents_dir).await?;
        tokio::fs::write(&path, &bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "pdf written");

        let request = ShareRequest {
            path: path.clone(),
            mime_type: PDF_MIME_TYPE.to_string(),
            title: SHARE_TITLE.to_string(),
            subject: filename.clone(),
            filename,
            save_to_files: true,
        };
        self.sink.share(&request).await?;

        info!(path = %path.display(), "pdf shared");
        Ok(path)
    }
}

/// Decode base64 PDF data, tolerating a `data:...;base64,` prefix.
fn decode_pdf(data: &str) -> Result<Vec<u8>, ShellError> {
    let encoded = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| ShellError::InvalidPayload(format!("invalid base64 PDF data: {}", e)))?;
    if bytes.is_empty() {
        return Err(ShellError::InvalidPayload("PDF data is empty".to_string()));
    }
    Ok(bytes)
}

/// Reduce a page-supplied name to a safe single file name ending in `.pdf`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim().trim_start_matches('.');

    let stem = if cleaned.is_empty() {
        FALLBACK_NAME
    } else {
        cleaned
    };

    if stem.to_ascii_lowercase().ends_with(".pdf") {
        stem.to_string()
    } else {
        format!("{}.pdf", stem)
    }
}
