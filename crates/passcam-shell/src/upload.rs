//! Multipart image upload over HTTP.

use passcam_core::bridge::UploadResult;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::platform::Uploader;

/// Response body of the upload endpoint.
///
/// Success carries `uploadId`/`imageUrl`, failure carries `error`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    upload_id: Option<String>,
    image_url: Option<String>,
    error: Option<String>,
}

/// [`Uploader`] that POSTs a single `file` field as `multipart/form-data`.
///
/// No request timeout is set; a slow upload keeps the capture flow busy
/// until the server answers or the connection drops.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: Client,
    endpoint: String,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    /// Upload to the configured `upload_url`.
    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.upload_url.clone())
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Uploader for HttpUploader {
    async fn upload(&self, jpeg: Vec<u8>, filename: &str) -> Result<UploadResult, ShellError> {
        debug!(endpoint = %self.endpoint, bytes = jpeg.len(), "uploading image");

        let part = Part::bytes(jpeg)
            .file_name(filename.to_string())
            .mime_str("image/jpeg")
            .map_err(|e| ShellError::UploadFailed(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ShellError::UploadFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ShellError::UploadFailed(e.to_string()))?;

        parse_upload_response(status, &body)
    }
}

/// Interpret the endpoint's status and body.
///
/// Only the presence of `uploadId` decides success; a missing `imageUrl`
/// becomes an empty string.
pub fn parse_upload_response(status: u16, body: &str) -> Result<UploadResult, ShellError> {
    let success = (200..300).contains(&status);

    let parsed: UploadResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if success => {
            return Err(ShellError::UploadFailed(format!(
                "unreadable response body: {}",
                e
            )))
        }
        Err(_) => UploadResponse::default(),
    };

    if let Some(error) = parsed.error {
        warn!(status, %error, "upload rejected by server");
        return Err(ShellError::UploadFailed(error));
    }
    if !success {
        return Err(ShellError::UploadFailed(format!("HTTP status {}", status)));
    }

    match parsed.upload_id {
        Some(upload_id) => Ok(UploadResult {
            upload_id,
            image_url: parsed.image_url.unwrap_or_default(),
        }),
        None => Err(ShellError::UploadFailed(
            "response is missing uploadId".to_string(),
        )),
    }
}
