//! Blocking `reqwest` implementation of [`CompressTransport`].

use image_compression_core::{FormPart, MultipartForm};
use reqwest::blocking::{Client, multipart};

use crate::{CompressError, CompressTransport, HttpResponse};

/// Sends compress requests over HTTP with a blocking `reqwest` client.
///
/// No request timeout is configured; the call resolves or fails per the
/// transport's own behavior.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl CompressTransport for ReqwestTransport {
    fn post_multipart(&self, url: &str, form: &MultipartForm) -> Result<HttpResponse, CompressError> {
        let mut body = multipart::Form::new();
        for part in &form.parts {
            body = match part {
                FormPart::File {
                    field,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let mut file_part = multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                    if !content_type.is_empty() {
                        file_part = file_part
                            .mime_str(content_type)
                            .map_err(|error| CompressError::Transport(error.to_string()))?;
                    }
                    body.part(field.clone(), file_part)
                }
                FormPart::Text { field, value } => body.text(field.clone(), value.clone()),
            };
        }

        let response = self
            .client
            .post(url)
            .multipart(body)
            .send()
            .map_err(|error| CompressError::Transport(error.to_string()))?;

        let status = response.status();
        // Canonical phrase for the code, not the server's status-line text.
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = response
            .text()
            .map_err(|error| CompressError::Transport(error.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}
