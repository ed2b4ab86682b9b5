//! Shared fakes and fixtures for app integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use image_compression_app::{AppConfig, Controller, FileReader, ReadError, Surface};
use image_compression_client::{CompressError, CompressTransport, HttpResponse};
use image_compression_core::{FileHandle, MultipartForm};
use image_compression_ui::{DownloadLink, Notice, ScrollRequest, UiState};

/// Surface that records everything the controller asks of it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub renders: Vec<UiState>,
    pub notices: Vec<Notice>,
    pub picker_opens: usize,
    pub picker_resets: usize,
    pub scrolls: Vec<ScrollRequest>,
    pub saved: Vec<DownloadLink>,
    pub save_failure: Option<String>,
}

#[allow(dead_code)]
impl RecordingSurface {
    /// Number of times the loading overlay went from visible to hidden.
    pub fn loading_hides(&self) -> usize {
        self.renders
            .windows(2)
            .filter(|pair| pair[0].loading_visible && !pair[1].loading_visible)
            .count()
    }

    /// Number of times the compress action went from disabled to enabled.
    pub fn compress_enables(&self) -> usize {
        self.renders
            .windows(2)
            .filter(|pair| !pair[0].compress_enabled && pair[1].compress_enabled)
            .count()
    }
}

impl Surface for RecordingSurface {
    fn render(&mut self, state: &UiState) {
        self.renders.push(state.clone());
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn open_file_picker(&mut self) {
        self.picker_opens += 1;
    }

    fn reset_file_picker(&mut self) {
        self.picker_resets += 1;
    }

    fn scroll_into_view(&mut self, request: ScrollRequest) {
        self.scrolls.push(request);
    }

    fn save_download(&mut self, link: &DownloadLink) -> Result<(), String> {
        if let Some(reason) = &self.save_failure {
            return Err(reason.clone());
        }
        self.saved.push(link.clone());
        Ok(())
    }
}

/// In-memory file reader keyed by locator.
#[derive(Debug, Default)]
pub struct MemoryReader {
    files: HashMap<String, Result<Vec<u8>, String>>,
}

#[allow(dead_code)]
impl MemoryReader {
    pub fn with_file(mut self, locator: &str, bytes: &[u8]) -> Self {
        self.files.insert(locator.to_string(), Ok(bytes.to_vec()));
        self
    }

    pub fn with_unreadable(mut self, locator: &str, reason: &str) -> Self {
        self.files.insert(locator.to_string(), Err(reason.to_string()));
        self
    }
}

impl FileReader for MemoryReader {
    fn read(&self, handle: &FileHandle) -> Result<Vec<u8>, ReadError> {
        match self.files.get(&handle.locator) {
            Some(Ok(bytes)) => Ok(bytes.clone()),
            Some(Err(reason)) => Err(ReadError {
                locator: handle.locator.clone(),
                reason: reason.clone(),
            }),
            None => Err(ReadError {
                locator: handle.locator.clone(),
                reason: "not found".to_string(),
            }),
        }
    }
}

/// Transport replaying queued outcomes in order and recording each request.
#[derive(Debug, Default)]
pub struct QueueTransport {
    outcomes: Mutex<Vec<Result<HttpResponse, CompressError>>>,
    pub seen: Mutex<Vec<(String, MultipartForm)>>,
}

#[allow(dead_code)]
impl QueueTransport {
    pub fn then_ok(self, body: &str) -> Self {
        self.then(Ok(HttpResponse {
            status: 200,
            reason: "OK".to_string(),
            body: body.to_string(),
        }))
    }

    pub fn then_status(self, status: u16, reason: &str) -> Self {
        self.then(Ok(HttpResponse {
            status,
            reason: reason.to_string(),
            body: String::new(),
        }))
    }

    pub fn then_transport_error(self, reason: &str) -> Self {
        self.then(Err(CompressError::Transport(reason.to_string())))
    }

    fn then(self, outcome: Result<HttpResponse, CompressError>) -> Self {
        self.outcomes
            .lock()
            .expect("outcome lock should work")
            .push(outcome);
        self
    }

    pub fn requests(&self) -> Vec<(String, MultipartForm)> {
        self.seen.lock().expect("request log lock should work").clone()
    }
}

impl CompressTransport for QueueTransport {
    fn post_multipart(&self, url: &str, form: &MultipartForm) -> Result<HttpResponse, CompressError> {
        self.seen
            .lock()
            .expect("request log lock should work")
            .push((url.to_string(), form.clone()));
        let mut outcomes = self.outcomes.lock().expect("outcome lock should work");
        if outcomes.is_empty() {
            return Err(CompressError::Transport("no scripted outcome".to_string()));
        }
        outcomes.remove(0)
    }
}

/// Success body that shrank the image.
#[allow(dead_code)]
pub const SHRUNK_BODY: &str = r#"{"original_size":1000,"compressed_size":400,"compression_ratio":60,"compressed_data":"data:image/jpeg;base64,AAAA"}"#;

/// Success body that grew the image.
#[allow(dead_code)]
pub const GROWN_BODY: &str = r#"{"original_size":1000,"compressed_size":1200,"compression_ratio":-20,"compressed_data":"data:image/png;base64,AAAA"}"#;

/// JPEG handle fixture whose locator is its name.
#[allow(dead_code)]
pub fn jpeg(name: &str) -> FileHandle {
    FileHandle::new(name, "image/jpeg", 4)
}

/// Reader that knows `a.jpg`, `b.jpg`, and `c.png`.
#[allow(dead_code)]
pub fn default_reader() -> MemoryReader {
    MemoryReader::default()
        .with_file("a.jpg", &[0xff, 0xd8, 0xff, 0xd9])
        .with_file("b.jpg", &[0xff, 0xd8, 0x00, 0xff, 0xd9])
        .with_file("c.png", &[0x89, 0x50, 0x4e, 0x47])
}

/// Builds a controller over the given transport and reader.
#[allow(dead_code)]
pub fn controller_with(
    page_url: &str,
    transport: Arc<QueueTransport>,
    reader: MemoryReader,
) -> Controller<RecordingSurface> {
    let config = AppConfig {
        page_url: page_url.to_string(),
        ..AppConfig::default()
    };
    let client = config.build_client(transport).expect("client should build");
    Controller::new(config, client, Arc::new(reader), RecordingSurface::default())
}

/// Root-served controller with the default reader.
#[allow(dead_code)]
pub fn controller(transport: Arc<QueueTransport>) -> Controller<RecordingSurface> {
    controller_with("http://localhost:5001/", transport, default_reader())
}
