#![warn(missing_docs)]
//! # image-compression-app
//!
//! ## Purpose
//! Orchestrates input acquisition, session state, the compress client, and the
//! result presenter for the image compression page.
//!
//! ## Responsibilities
//! - Validate picker/drop selections and load their bytes through a
//!   [`FileReader`].
//! - Drive [`SessionState`] transitions and mirror them into [`UiState`].
//! - Run compress attempts with a loading indicator that is hidden exactly once
//!   per attempt, whatever the outcome.
//! - Hand download links and notices to a host [`Surface`].
//!
//! ## Data flow
//! Host events ([`UiEvent`]) -> [`Controller::dispatch`] -> session/UI updates
//! -> [`Surface::render`]. Loads and compress calls are split into `begin_*`
//! and `complete_*` halves so an event-loop host can run them asynchronously;
//! completions issued for a selection that is no longer current are dropped.
//!
//! ## Error model
//! Handlers report failures to the user through [`Notice`]s and also return
//! them as [`AppError`] so hosts can log or test them. No error leaves the page
//! in a non-interactive state.
//!
//! ## Security and privacy notes
//! File bytes and data URIs never reach the log; see [`redact_data_uris`].

use std::path::Path;
use std::sync::Arc;

use image_compression_client::{
    ClientError, CompressClient, CompressError, CompressTransport, classify_compress_error,
};
use image_compression_core::{
    CompressionRequest, CompressionResult, CoreError, FileHandle, ImageMime, Quality, SourceFile,
    SourceId, format_file_size, supported_type_labels,
};
use image_compression_session::{SessionError, SessionState};
use image_compression_ui::{
    ClickTarget, DEFAULT_NOTICE_MS, DownloadLink, Notice, ScrollRequest, UiState, download_link,
    present,
};
use thiserror::Error;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("IMAGE_COMPRESSION_VERSION");

/// Page URL assumed when none is configured.
pub const DEFAULT_PAGE_URL: &str = "http://localhost:5001/";

/// Declared type for files whose extension is not recognized.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Runtime configuration resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// URL the page is served from; decides root vs mounted endpoints.
    pub page_url: String,
    /// Initial slider position.
    pub default_quality: Quality,
    /// Visible time for transient notices.
    pub notice_duration_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            default_quality: Quality::default(),
            notice_duration_ms: DEFAULT_NOTICE_MS,
        }
    }
}

impl AppConfig {
    /// Builds the compress client for this page, resolving the mount once.
    ///
    /// # Errors
    /// Returns [`AppError::Client`] when the page URL is invalid.
    pub fn build_client(
        &self,
        transport: Arc<dyn CompressTransport>,
    ) -> Result<CompressClient, AppError> {
        CompressClient::new(&self.page_url, transport).map_err(AppError::Client)
    }
}

/// Rendering and browser capabilities the controller drives.
pub trait Surface {
    /// Redraws the page from `state`.
    fn render(&mut self, state: &UiState);

    /// Shows a transient or blocking notice.
    fn notify(&mut self, notice: &Notice);

    /// Opens the native file picker.
    fn open_file_picker(&mut self);

    /// Clears the picker's value so reselecting the same file fires a change.
    fn reset_file_picker(&mut self);

    /// Scrolls the results region into view.
    fn scroll_into_view(&mut self, request: ScrollRequest);

    /// Starts the save flow for `link`.
    ///
    /// # Errors
    /// Returns a human-readable reason when the save cannot start.
    fn save_download(&mut self, link: &DownloadLink) -> Result<(), String>;
}

/// Loads a selected file's bytes.
pub trait FileReader: Send + Sync {
    /// Reads every byte behind `handle`.
    ///
    /// # Errors
    /// Returns [`ReadError`] when the bytes cannot be loaded.
    fn read(&self, handle: &FileHandle) -> Result<Vec<u8>, ReadError>;
}

/// Reads files from the local filesystem, treating the locator as a path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileReader;

impl FileReader for FsFileReader {
    fn read(&self, handle: &FileHandle) -> Result<Vec<u8>, ReadError> {
        std::fs::read(&handle.locator).map_err(|error| ReadError {
            locator: handle.locator.clone(),
            reason: error.to_string(),
        })
    }
}

/// Builds a handle for a local file, declaring its type from the extension.
///
/// # Errors
/// Returns [`AppError::Read`] when file metadata is unavailable.
pub fn file_handle_from_path(path: &Path) -> Result<FileHandle, AppError> {
    let metadata = std::fs::metadata(path).map_err(|error| ReadError {
        locator: path.display().to_string(),
        reason: error.to_string(),
    })?;

    let declared_type = path
        .extension()
        .and_then(|extension| extension.to_str())
        .and_then(ImageMime::from_extension)
        .map_or(UNKNOWN_MIME, ImageMime::as_str);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(FileHandle::new(name, declared_type, metadata.len()).with_locator(path.display().to_string()))
}

/// Events a host forwards to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Drag entered the drop region.
    DragEnter,
    /// Drag moved over the drop region.
    DragOver,
    /// Drag left the drop region.
    DragLeave,
    /// Files dropped on the region.
    Drop(Vec<FileHandle>),
    /// Click somewhere inside the drop region.
    RegionClick(ClickTarget),
    /// Click on the explicit browse button.
    BrowseClick,
    /// File picker value changed.
    PickerChange(Vec<FileHandle>),
    /// Quality slider moved.
    QualityInput(String),
    /// Compress button pressed.
    CompressClick,
    /// Clear button pressed.
    ClearClick,
    /// Download button pressed.
    DownloadClick,
    /// Preview image failed to render.
    PreviewError,
}

/// A selection whose bytes are being loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    id: SourceId,
    handle: FileHandle,
    mime: ImageMime,
}

impl PendingLoad {
    /// Identity issued for this selection.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Handle to load.
    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }
}

/// A compress attempt in flight.
#[derive(Debug, Clone)]
pub struct PendingCompress {
    source: SourceFile,
    quality: Quality,
}

impl PendingCompress {
    /// Source identity the attempt was issued against.
    pub fn issued_for(&self) -> SourceId {
        self.source.id()
    }

    /// Request to send.
    pub fn request(&self) -> CompressionRequest<'_> {
        CompressionRequest::new(&self.source, self.quality)
    }
}

/// Page controller: session state, UI state, and the collaborators they need.
pub struct Controller<S: Surface> {
    config: AppConfig,
    session: SessionState,
    ui: UiState,
    quality: Quality,
    client: CompressClient,
    reader: Arc<dyn FileReader>,
    surface: S,
}

impl<S: Surface> Controller<S> {
    /// Creates a controller and renders the empty page.
    pub fn new(
        config: AppConfig,
        client: CompressClient,
        reader: Arc<dyn FileReader>,
        mut surface: S,
    ) -> Self {
        let quality = config.default_quality;
        let ui = UiState::new(quality);
        surface.render(&ui);

        Self {
            config,
            session: SessionState::new(),
            ui,
            quality,
            client,
            reader,
            surface,
        }
    }

    /// Routes one host event to its handler.
    ///
    /// # Errors
    /// Returns the handler's error after it has been shown to the user.
    pub fn dispatch(&mut self, event: UiEvent) -> Result<(), AppError> {
        match event {
            UiEvent::DragEnter | UiEvent::DragOver => {
                self.set_drop_highlight(true);
                Ok(())
            }
            UiEvent::DragLeave => {
                self.set_drop_highlight(false);
                Ok(())
            }
            UiEvent::Drop(files) => self.on_drop(files),
            UiEvent::RegionClick(target) => {
                self.on_region_click(&target);
                Ok(())
            }
            UiEvent::BrowseClick => {
                self.surface.open_file_picker();
                Ok(())
            }
            UiEvent::PickerChange(files) => self.on_picker_change(files),
            UiEvent::QualityInput(raw) => self.on_quality_input(&raw),
            UiEvent::CompressClick => self.compress(),
            UiEvent::ClearClick => {
                self.clear();
                Ok(())
            }
            UiEvent::DownloadClick => self.download(),
            UiEvent::PreviewError => {
                self.on_preview_error();
                Ok(())
            }
        }
    }

    fn set_drop_highlight(&mut self, highlighted: bool) {
        if self.ui.drop_highlight != highlighted {
            self.ui.drop_highlight = highlighted;
            self.surface.render(&self.ui);
        }
    }

    fn on_drop(&mut self, files: Vec<FileHandle>) -> Result<(), AppError> {
        self.set_drop_highlight(false);
        match files.into_iter().next() {
            Some(handle) => self.select_file(handle),
            None => Ok(()),
        }
    }

    fn on_region_click(&mut self, target: &ClickTarget) {
        if target.opens_file_picker() {
            self.surface.open_file_picker();
        }
    }

    fn on_picker_change(&mut self, files: Vec<FileHandle>) -> Result<(), AppError> {
        match files.into_iter().next() {
            Some(handle) => self.select_file(handle),
            None => {
                self.surface.reset_file_picker();
                Ok(())
            }
        }
    }

    fn on_quality_input(&mut self, raw: &str) -> Result<(), AppError> {
        let quality = Quality::parse(raw).map_err(|error| {
            log::warn!(target: "input", "quality_rejected: {error}");
            AppError::Core(error)
        })?;

        self.quality = quality;
        self.ui.quality_label = quality.label();
        self.surface.render(&self.ui);
        Ok(())
    }

    fn on_preview_error(&mut self) {
        if self.ui.apply_preview_fallback() {
            log::error!(target: "input", "preview_failed: showing placeholder");
            self.surface.render(&self.ui);
        }
    }

    /// Validates a selection and issues its load identity.
    ///
    /// # Errors
    /// Returns [`AppError::UnsupportedType`] after showing a transient notice
    /// when the declared type is not on the allow-list. Session state is
    /// untouched in that case.
    pub fn begin_selection(&mut self, handle: FileHandle) -> Result<PendingLoad, AppError> {
        let Some(mime) = ImageMime::from_declared(&handle.declared_type) else {
            log::warn!(
                target: "input",
                "unsupported_type: name={} declared={:?}",
                handle.name,
                handle.declared_type
            );
            self.surface.notify(&Notice::transient(
                format!(
                    "Unsupported file type. Please use {} images.",
                    supported_type_labels()
                ),
                self.config.notice_duration_ms,
            ));
            return Err(AppError::UnsupportedType(handle.declared_type));
        };

        log::info!(
            target: "input",
            "file_selected: name={} type={} size={}",
            handle.name,
            mime.as_str(),
            format_file_size(handle.size_bytes)
        );

        Ok(PendingLoad {
            id: self.session.begin_selection(),
            handle,
            mime,
        })
    }

    /// Applies the outcome of a file load.
    ///
    /// # Errors
    /// Returns [`AppError::Read`] after a blocking notice when the load failed,
    /// or [`AppError::Session`] when a newer selection or a clear superseded
    /// this load (no notice; the result is dropped).
    pub fn complete_selection(
        &mut self,
        pending: PendingLoad,
        loaded: Result<Vec<u8>, ReadError>,
    ) -> Result<(), AppError> {
        let bytes = match loaded {
            Ok(bytes) => bytes,
            Err(error) => {
                log::error!(target: "input", "read_failed: {error}");
                if self.session.abandon_selection(pending.id) {
                    self.surface.notify(&Notice::blocking(
                        "Failed to read the selected file. Please try again.",
                    ));
                }
                return Err(AppError::Read(error));
            }
        };

        let source = SourceFile::from_loaded(pending.id, &pending.handle, pending.mime, bytes);
        let preview = source.preview_data_uri().to_string();
        if let Err(error) = self.session.select_file(source) {
            log::warn!(target: "input", "stale_load_dropped: {error}");
            return Err(AppError::Session(error));
        }

        self.ui.show_preview(preview);
        self.surface.render(&self.ui);
        Ok(())
    }

    /// Validates and loads a selection in place through the configured reader.
    ///
    /// # Errors
    /// See [`Controller::begin_selection`] and [`Controller::complete_selection`].
    pub fn select_file(&mut self, handle: FileHandle) -> Result<(), AppError> {
        let pending = self.begin_selection(handle)?;
        let loaded = self.reader.read(pending.handle());
        self.complete_selection(pending, loaded)
    }

    /// Removes the selection and any result and resets the page.
    pub fn clear(&mut self) {
        self.session.clear();
        self.ui.reset();
        self.surface.reset_file_picker();
        self.surface.render(&self.ui);
    }

    /// Snapshots the current source and shows the loading indicator.
    ///
    /// # Errors
    /// Returns [`AppError::NoSource`] when nothing is selected; the indicator is
    /// not shown in that case.
    pub fn begin_compress(&mut self) -> Result<PendingCompress, AppError> {
        let Some(source) = self.session.source() else {
            log::error!(target: "compress", "begin_rejected: no file selected");
            return Err(AppError::NoSource);
        };

        let pending = PendingCompress {
            source: source.clone(),
            quality: self.quality,
        };

        self.ui.loading_visible = true;
        self.surface.render(&self.ui);
        Ok(pending)
    }

    /// Hides the loading indicator and applies the outcome of one attempt.
    ///
    /// # Errors
    /// Returns [`AppError::Compress`] after a blocking notice for failures, or
    /// [`AppError::Session`] when the selection changed while the request was
    /// in flight (the outcome is dropped without a notice).
    pub fn complete_compress(
        &mut self,
        pending: PendingCompress,
        outcome: Result<CompressionResult, CompressError>,
    ) -> Result<(), AppError> {
        self.ui.loading_visible = false;

        let current = self.session.source().map(SourceFile::id);
        if current != Some(pending.issued_for()) {
            self.surface.render(&self.ui);
            log::warn!(
                target: "compress",
                "stale_outcome_dropped: issued_for={} current={current:?}",
                pending.issued_for()
            );
            return Err(match current {
                Some(current) => AppError::Session(SessionError::StaleResult {
                    issued_for: pending.issued_for(),
                    current,
                }),
                None => AppError::Session(SessionError::NoSource),
            });
        }

        let result = match outcome {
            Ok(result) => result,
            Err(error) => {
                self.surface.render(&self.ui);
                log::error!(
                    target: "compress",
                    "failed: kind={:?} detail={error}",
                    classify_compress_error(&error)
                );
                self.surface
                    .notify(&Notice::blocking(format!("Error compressing image: {error}")));
                return Err(AppError::Compress(error));
            }
        };

        let view = present(&result);
        log::info!(
            target: "present",
            "results: original={} compressed={} ratio={}",
            view.original_size,
            view.compressed_size,
            view.ratio
        );

        if let Err(error) = self.session.set_result(pending.issued_for(), result) {
            self.surface.render(&self.ui);
            return Err(AppError::Session(error));
        }

        self.ui.show_results(view, self.session.download_available());
        self.surface.render(&self.ui);
        self.surface.scroll_into_view(ScrollRequest::default());
        Ok(())
    }

    /// Runs one compress attempt in place through the configured client.
    ///
    /// # Errors
    /// See [`Controller::begin_compress`] and [`Controller::complete_compress`].
    pub fn compress(&mut self) -> Result<(), AppError> {
        let pending = self.begin_compress()?;
        let outcome = self.client.compress(&pending.request());
        self.complete_compress(pending, outcome)
    }

    /// Saves the compressed artifact through the surface.
    ///
    /// # Errors
    /// Returns [`AppError::NothingToDownload`] or [`AppError::Download`] after a
    /// blocking notice.
    pub fn download(&mut self) -> Result<(), AppError> {
        let link = match (self.session.result(), self.session.source()) {
            (Some(result), Some(source)) => download_link(result, source.declared_type()),
            _ => None,
        };

        let Some(link) = link else {
            self.surface
                .notify(&Notice::blocking("No compressed image available!"));
            return Err(AppError::NothingToDownload);
        };

        log::info!(target: "download", "save: filename={}", link.filename);
        self.surface.save_download(&link).map_err(|reason| {
            log::error!(target: "download", "save_failed: {reason}");
            self.surface
                .notify(&Notice::blocking(format!("Error downloading image: {reason}")));
            AppError::Download(reason)
        })
    }

    /// Session state snapshot.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// UI state snapshot.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Current slider quality.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Compress client bound at startup.
    pub fn client(&self) -> &CompressClient {
        &self.client
    }

    /// Rendering surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable rendering surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

/// Replaces base64 payloads of data URIs in `input` with `<redacted>`.
pub fn redact_data_uris(input: &str) -> String {
    const MARKER: &str = ";base64,";

    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("data:") {
        let candidate = &rest[start..];
        let header_end = candidate
            .find(|ch: char| ch.is_whitespace() || ch == '"' || ch == '\'')
            .unwrap_or(candidate.len());
        let Some(marker) = candidate[..header_end].find(MARKER) else {
            output.push_str(&rest[..start + "data:".len()]);
            rest = &rest[start + "data:".len()..];
            continue;
        };

        let payload_start = start + marker + MARKER.len();
        let payload_end = start + header_end;
        output.push_str(&rest[..payload_start]);
        output.push_str("<redacted>");
        rest = &rest[payload_end..];
    }
    output.push_str(rest);
    output
}

/// Local file load failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to read {locator}: {reason}")]
pub struct ReadError {
    /// Locator that failed.
    pub locator: String,
    /// Underlying reason.
    pub reason: String,
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Declared MIME type is not on the allow-list.
    #[error("unsupported file type: {0:?}")]
    UnsupportedType(String),
    /// File bytes could not be loaded.
    #[error("read error: {0}")]
    Read(#[from] ReadError),
    /// Compress requested with nothing selected.
    #[error("no file selected for compression")]
    NoSource,
    /// Session rejected a transition.
    #[error("session error: {0}")]
    Session(SessionError),
    /// Compress attempt failed.
    #[error("compress error: {0}")]
    Compress(CompressError),
    /// Client could not be configured.
    #[error("client error: {0}")]
    Client(ClientError),
    /// Input value rejected.
    #[error("input error: {0}")]
    Core(CoreError),
    /// Download requested without a compressed artifact.
    #[error("no compressed image available")]
    NothingToDownload,
    /// Surface could not start the save flow.
    #[error("download error: {0}")]
    Download(String),
}
