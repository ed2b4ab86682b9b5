//! Shared fixtures for client integration tests.

use std::sync::Mutex;

use image_compression_client::{CompressError, CompressTransport, HttpResponse};
use image_compression_core::{FileHandle, ImageMime, MultipartForm, SourceFile, SourceId};

/// Transport that records the last request and replays a canned outcome.
#[derive(Debug)]
pub struct ScriptedTransport {
    outcome: Result<HttpResponse, CompressError>,
    pub seen: Mutex<Vec<(String, MultipartForm)>>,
}

impl ScriptedTransport {
    #[allow(dead_code)]
    pub fn ok(body: &str) -> Self {
        Self::replying(200, "OK", body)
    }

    #[allow(dead_code)]
    pub fn replying(status: u16, reason: &str, body: &str) -> Self {
        Self {
            outcome: Ok(HttpResponse {
                status,
                reason: reason.to_string(),
                body: body.to_string(),
            }),
            seen: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(CompressError::Transport(reason.to_string())),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl CompressTransport for ScriptedTransport {
    fn post_multipart(&self, url: &str, form: &MultipartForm) -> Result<HttpResponse, CompressError> {
        self.seen
            .lock()
            .expect("request log lock should work")
            .push((url.to_string(), form.clone()));
        self.outcome.clone()
    }
}

/// Creates a small JPEG source fixture.
#[allow(dead_code)]
pub fn fixture_source() -> SourceFile {
    SourceFile::from_loaded(
        SourceId(1),
        &FileHandle::new("photo.jpg", "image/jpeg", 4),
        ImageMime::Jpeg,
        vec![0xff, 0xd8, 0xff, 0xd9],
    )
}

/// Well-formed success body.
#[allow(dead_code)]
pub const SUCCESS_BODY: &str = r#"{"original_size":1000,"compressed_size":400,"compression_ratio":60,"compressed_data":"data:image/jpeg;base64,AAAA"}"#;
