#![warn(missing_docs)]
//! # image-compression-ui
//!
//! ## Purpose
//! Defines the UI-facing view model for the upload/compress/download page.
//!
//! ## Responsibilities
//! - Hold visibility and enablement flags for preview, results, loading
//!   overlay, and the compress/download actions.
//! - Project a [`CompressionResult`] into display text plus the neutral or
//!   regression [`Emphasis`].
//! - Build the [`DownloadLink`] for the compressed artifact.
//! - Describe user notices and decide which clicks open the file picker.
//!
//! ## Data flow
//! Controller events mutate [`UiState`]; a rendering surface draws it.
//!
//! ## Ownership and lifetimes
//! `UiState` owns every string it renders so surfaces never borrow from the
//! session.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. The only fallible
//! projection is [`download_link`], which returns `None` when there is nothing
//! to save.

use image_compression_core::{
    CompressionResult, Quality, download_filename, format_file_size, format_ratio,
};

/// Placeholder text shown in empty result fields.
pub const EMPTY_FIELD: &str = "-";

/// Element id of the explicit clear control.
pub const CLEAR_CONTROL_ID: &str = "clear-btn";

/// Default visibility duration for transient notices.
pub const DEFAULT_NOTICE_MS: u64 = 3_000;

/// Inline SVG shown when the preview fails to render.
pub const PREVIEW_FALLBACK_SVG: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='100' height='100' viewBox='0 0 24 24' fill='none' stroke='%23ff6b6b' stroke-width='2'%3E%3Ccircle cx='12' cy='12' r='10'%3E%3C/circle%3E%3Cline x1='15' y1='9' x2='9' y2='15'%3E%3C/line%3E%3Cline x1='9' y1='9' x2='15' y2='15'%3E%3C/line%3E%3C/svg%3E";

/// Visual treatment applied to the ratio and compressed-size displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Default styling.
    Neutral,
    /// Output grew; highlight as a regression.
    Regression,
}

/// Concrete style values for one [`Emphasis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmphasisStyle {
    /// Text color (empty means inherit).
    pub color: &'static str,
    /// Container background (empty means inherit).
    pub background: &'static str,
    /// Container border (empty means inherit).
    pub border: &'static str,
}

impl Emphasis {
    /// Style values for this treatment.
    pub fn style(self) -> EmphasisStyle {
        match self {
            Self::Neutral => EmphasisStyle {
                color: "",
                background: "",
                border: "",
            },
            Self::Regression => EmphasisStyle {
                color: "#ff6b6b",
                background: "#ffeeee",
                border: "1px solid #ff6b6b",
            },
        }
    }
}

/// Display-ready projection of one compression result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    /// Formatted original size.
    pub original_size: String,
    /// Formatted compressed size.
    pub compressed_size: String,
    /// Ratio text as reported by the server, e.g. `60%`.
    pub ratio: String,
    /// Treatment for the ratio display.
    pub ratio_emphasis: Emphasis,
    /// Treatment for the compressed-size display.
    pub compressed_emphasis: Emphasis,
}

impl ResultView {
    /// Placeholder view shown before any result exists.
    pub fn empty() -> Self {
        Self {
            original_size: EMPTY_FIELD.to_string(),
            compressed_size: EMPTY_FIELD.to_string(),
            ratio: EMPTY_FIELD.to_string(),
            ratio_emphasis: Emphasis::Neutral,
            compressed_emphasis: Emphasis::Neutral,
        }
    }
}

/// Projects a result into display text and emphasis.
pub fn present(result: &CompressionResult) -> ResultView {
    let emphasis = if result.is_regression() {
        Emphasis::Regression
    } else {
        Emphasis::Neutral
    };

    ResultView {
        original_size: format_file_size(result.original_size),
        compressed_size: format_file_size(result.compressed_size),
        ratio: format_ratio(result.compression_ratio),
        ratio_emphasis: emphasis,
        compressed_emphasis: emphasis,
    }
}

/// Anchor target and filename for the browser save flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    /// Encoded compressed data, used verbatim as the link target.
    pub href: String,
    /// Suggested file name, e.g. `compressed_image.png`.
    pub filename: String,
}

/// Builds the download link for a result, or `None` without encoded data.
pub fn download_link(result: &CompressionResult, source_declared_type: &str) -> Option<DownloadLink> {
    if !result.has_download_data() {
        return None;
    }

    Some(DownloadLink {
        href: result.compressed_data.clone(),
        filename: download_filename(source_declared_type),
    })
}

/// How a notice is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Auto-dismissing banner visible for the given duration.
    Transient {
        /// Visible time in milliseconds.
        duration_ms: u64,
    },
    /// Modal alert the user must dismiss.
    Blocking,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Presentation mode.
    pub kind: NoticeKind,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Auto-dismissing notice.
    pub fn transient(message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind: NoticeKind::Transient { duration_ms },
            message: message.into(),
        }
    }

    /// Modal alert.
    pub fn blocking(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Blocking,
            message: message.into(),
        }
    }
}

/// Element that received a click inside the drop region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
    /// Id of the clicked element (may be empty).
    pub element_id: String,
    /// Ids of its ancestors up to the drop region, nearest first.
    pub ancestor_ids: Vec<String>,
}

impl ClickTarget {
    /// Click on an element with no interesting ancestors.
    pub fn element(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            ancestor_ids: Vec::new(),
        }
    }

    /// Returns `true` when the click should open the file picker.
    pub fn opens_file_picker(&self) -> bool {
        self.element_id != CLEAR_CONTROL_ID
            && !self.ancestor_ids.iter().any(|id| id == CLEAR_CONTROL_ID)
    }
}

/// Scroll hint emitted when results are revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    /// Delay before scrolling.
    pub delay_ms: u64,
    /// Smooth scrolling.
    pub smooth: bool,
}

impl Default for ScrollRequest {
    fn default() -> Self {
        Self {
            delay_ms: 100,
            smooth: true,
        }
    }
}

/// Aggregate page state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// Drop region highlighted while a drag hovers it.
    pub drop_highlight: bool,
    /// "Drag an image here" prompt visible.
    pub upload_prompt_visible: bool,
    /// Preview container visible.
    pub preview_visible: bool,
    /// Preview image source.
    pub preview_src: Option<String>,
    /// Preview already fell back to the placeholder once.
    pub preview_errored: bool,
    /// Quality slider label.
    pub quality_label: String,
    /// Compress button enabled.
    pub compress_enabled: bool,
    /// Loading overlay visible.
    pub loading_visible: bool,
    /// Results region visible.
    pub results_visible: bool,
    /// Result fields.
    pub results: ResultView,
    /// Download button enabled.
    pub download_enabled: bool,
}

impl UiState {
    /// Creates the empty page state.
    pub fn new(quality: Quality) -> Self {
        Self {
            drop_highlight: false,
            upload_prompt_visible: true,
            preview_visible: false,
            preview_src: None,
            preview_errored: false,
            quality_label: quality.label(),
            compress_enabled: false,
            loading_visible: false,
            results_visible: false,
            results: ResultView::empty(),
            download_enabled: false,
        }
    }

    /// Shows a freshly loaded preview and enables compression.
    pub fn show_preview(&mut self, data_uri: impl Into<String>) {
        self.preview_src = Some(data_uri.into());
        self.preview_errored = false;
        self.preview_visible = true;
        self.upload_prompt_visible = false;
        self.compress_enabled = true;
        self.hide_results();
    }

    /// Swaps the preview for the fallback image, at most once per preview.
    ///
    /// Returns `true` when the fallback was applied.
    pub fn apply_preview_fallback(&mut self) -> bool {
        if self.preview_errored || !self.preview_visible {
            return false;
        }
        self.preview_errored = true;
        self.preview_src = Some(PREVIEW_FALLBACK_SVG.to_string());
        true
    }

    /// Reveals results for a successful compression.
    pub fn show_results(&mut self, view: ResultView, download_enabled: bool) {
        self.results = view;
        self.results_visible = true;
        self.download_enabled = download_enabled;
    }

    /// Hides and resets the results region.
    pub fn hide_results(&mut self) {
        self.results = ResultView::empty();
        self.results_visible = false;
        self.download_enabled = false;
    }

    /// Returns the page to its empty state, keeping the quality label.
    pub fn reset(&mut self) {
        self.preview_src = None;
        self.preview_errored = false;
        self.preview_visible = false;
        self.upload_prompt_visible = true;
        self.compress_enabled = false;
        self.hide_results();
    }
}
