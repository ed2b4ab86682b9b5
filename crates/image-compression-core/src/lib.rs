#![warn(missing_docs)]
//! # image-compression-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `image-compression` workspace.
//!
//! ## Responsibilities
//! - Validate declared MIME types against the supported image allow-list.
//! - Represent the selected [`SourceFile`] and the server's
//!   [`CompressionResult`].
//! - Build the multipart form for one [`CompressionRequest`].
//! - Encode/decode data URIs and format byte sizes for display.
//!
//! ## Data flow
//! A picker or drop event yields a [`FileHandle`]. Once its bytes are loaded the
//! handle becomes a [`SourceFile`], which is paired with a [`Quality`] into a
//! [`CompressionRequest`]. The server answers with a [`CompressionResult`].
//!
//! ## Ownership and lifetimes
//! `SourceFile` owns its byte buffer and preview data URI. Requests only borrow
//! the source for the duration of one outbound call.
//!
//! ## Error model
//! Out-of-range quality values and malformed data URIs return [`CoreError`].
//!
//! ## Security and privacy notes
//! File bytes are never logged. Use [`SourceFile::fingerprint`] when a log line
//! needs to identify a file.
//!
//! ## Example
//! ```rust
//! use image_compression_core::{format_file_size, ImageMime, Quality};
//!
//! assert_eq!(ImageMime::from_declared("image/png"), Some(ImageMime::Png));
//! assert_eq!(Quality::default().value(), 80);
//! assert_eq!(format_file_size(1_048_576), "1.00 MB");
//! ```

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Default slider position for the quality control.
pub const DEFAULT_QUALITY: u8 = 80;

/// Multipart field carrying the raw image bytes.
pub const IMAGE_FIELD: &str = "image";

/// Multipart field carrying the decimal quality value.
pub const QUALITY_FIELD: &str = "quality";

/// Extension used for downloads when the source MIME subtype is missing.
pub const DEFAULT_DOWNLOAD_EXTENSION: &str = "jpeg";

/// Image types accepted for compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMime {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
    /// `image/gif`
    Gif,
    /// `image/bmp`
    Bmp,
    /// `image/tiff`
    Tiff,
    /// `image/webp`
    WebP,
}

impl ImageMime {
    /// Every supported type, in the order shown to users.
    pub const ALL: [ImageMime; 6] = [
        ImageMime::Jpeg,
        ImageMime::Png,
        ImageMime::Gif,
        ImageMime::Bmp,
        ImageMime::Tiff,
        ImageMime::WebP,
    ];

    /// Matches a declared MIME type exactly against the allow-list.
    pub fn from_declared(declared: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mime| mime.as_str() == declared)
    }

    /// Guesses a MIME type from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Canonical MIME string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::WebP => "image/webp",
        }
    }

    /// Human-readable label used in validation notices.
    pub fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::Bmp => "BMP",
            Self::Tiff => "TIFF",
            Self::WebP => "WebP",
        }
    }
}

/// Builds the "Please use ..." list of supported labels.
pub fn supported_type_labels() -> String {
    let labels: Vec<&str> = ImageMime::ALL.iter().map(|mime| mime.label()).collect();
    match labels.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {last}", rest.join(", ")),
        Some((last, _)) => (*last).to_string(),
        None => String::new(),
    }
}

/// Raw selection from a picker change or a drop event, before any bytes are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    /// Display name of the file.
    pub name: String,
    /// MIME type declared by the host (may be empty or unsupported).
    pub declared_type: String,
    /// Byte length reported by the host.
    pub size_bytes: u64,
    /// Opaque reference the host's file reader resolves to bytes.
    pub locator: String,
}

impl FileHandle {
    /// Creates a handle whose locator equals its display name.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        Self {
            locator: name.clone(),
            name,
            declared_type: declared_type.into(),
            size_bytes,
        }
    }

    /// Overrides the reader locator.
    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = locator.into();
        self
    }
}

/// Identity tag issued by session state for each selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A validated, fully loaded image selection.
///
/// Instances are immutable; a new selection replaces the value wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    id: SourceId,
    name: String,
    mime: ImageMime,
    declared_type: String,
    bytes: Vec<u8>,
    preview_data_uri: String,
}

impl SourceFile {
    /// Builds a source file from a validated handle and its loaded bytes.
    pub fn from_loaded(id: SourceId, handle: &FileHandle, mime: ImageMime, bytes: Vec<u8>) -> Self {
        let preview_data_uri = encode_data_uri(mime.as_str(), &bytes);
        Self {
            id,
            name: handle.name.clone(),
            mime,
            declared_type: handle.declared_type.clone(),
            bytes,
            preview_data_uri,
        }
    }

    /// Selection identity this file was loaded under.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated MIME type.
    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    /// MIME type exactly as declared by the host.
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// Raw file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length of the payload.
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Data URI used to render the preview.
    pub fn preview_data_uri(&self) -> &str {
        &self.preview_data_uri
    }

    /// Short SHA-256 fingerprint for log lines.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        hex::encode(&digest[..8])
    }
}

/// Compression quality in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    /// Creates a validated quality value.
    ///
    /// # Errors
    /// Returns [`CoreError::QualityOutOfRange`] above 100.
    pub fn new(value: u8) -> Result<Self, CoreError> {
        if value > 100 {
            return Err(CoreError::QualityOutOfRange(u32::from(value)));
        }
        Ok(Self(value))
    }

    /// Parses a slider value such as `"75"`.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidQuality`] for non-integers and
    /// [`CoreError::QualityOutOfRange`] above 100.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let value: u32 = raw
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidQuality(raw.to_string()))?;
        let value = u8::try_from(value).map_err(|_| CoreError::QualityOutOfRange(value))?;
        Self::new(value)
    }

    /// Integer value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Slider label text, e.g. `80%`.
    pub fn label(self) -> String {
        format!("{}%", self.0)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

/// One multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// Binary file field.
    File {
        /// Field name.
        field: String,
        /// Original file name.
        file_name: String,
        /// MIME type sent with the part.
        content_type: String,
        /// Raw payload.
        bytes: Vec<u8>,
    },
    /// Plain text field.
    Text {
        /// Field name.
        field: String,
        /// Field value.
        value: String,
    },
}

/// Transport-agnostic multipart body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    /// Parts in insertion order.
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    /// Returns the text value of `field`, if present.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { field: name, value } if name == field => Some(value.as_str()),
            _ => None,
        })
    }

    /// Returns the file bytes of `field`, if present.
    pub fn file_bytes(&self, field: &str) -> Option<&[u8]> {
        self.parts.iter().find_map(|part| match part {
            FormPart::File {
                field: name, bytes, ..
            } if name == field => Some(bytes.as_slice()),
            _ => None,
        })
    }
}

/// One outbound compression call.
#[derive(Debug, Clone, Copy)]
pub struct CompressionRequest<'a> {
    /// Source being compressed.
    pub source: &'a SourceFile,
    /// Quality from the slider.
    pub quality: Quality,
}

impl<'a> CompressionRequest<'a> {
    /// Pairs a source with a quality value.
    pub fn new(source: &'a SourceFile, quality: Quality) -> Self {
        Self { source, quality }
    }

    /// Builds the `image` + `quality` multipart body.
    pub fn to_form(&self) -> MultipartForm {
        MultipartForm {
            parts: vec![
                FormPart::File {
                    field: IMAGE_FIELD.to_string(),
                    file_name: self.source.name().to_string(),
                    content_type: self.source.declared_type().to_string(),
                    bytes: self.source.bytes().to_vec(),
                },
                FormPart::Text {
                    field: QUALITY_FIELD.to_string(),
                    value: self.quality.value().to_string(),
                },
            ],
        }
    }
}

/// Server-reported outcome of one successful compression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionResult {
    /// Size of the uploaded file in bytes.
    pub original_size: u64,
    /// Size of the compressed output in bytes.
    pub compressed_size: u64,
    /// Server-computed saving percentage (negative when output grew).
    pub compression_ratio: f64,
    /// Download-ready data URI of the compressed bytes; empty when the
    /// server omitted it.
    #[serde(default)]
    pub compressed_data: String,
}

impl CompressionResult {
    /// Returns `true` when the compressed output is larger than the input.
    pub fn is_regression(&self) -> bool {
        self.compressed_size > self.original_size
    }

    /// Returns `true` when there is encoded data to download.
    pub fn has_download_data(&self) -> bool {
        !self.compressed_data.is_empty()
    }
}

/// Formats a byte count as `B`, `KB`, or `MB`.
///
/// Hundredths are rounded half-up, so 1152 bytes reads `1.13 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1_048_576 {
        format_hundredths(bytes, 1024, "KB")
    } else {
        format_hundredths(bytes, 1_048_576, "MB")
    }
}

fn format_hundredths(bytes: u64, unit: u128, suffix: &str) -> String {
    let hundredths = (u128::from(bytes) * 100 + unit / 2) / unit;
    format!("{}.{:02} {suffix}", hundredths / 100, hundredths % 100)
}

/// Formats a ratio the way the server reported it, with a `%` suffix.
pub fn format_ratio(ratio: f64) -> String {
    format!("{ratio}%")
}

/// Builds `compressed_image.<ext>` from the source's declared MIME type.
pub fn download_filename(declared_type: &str) -> String {
    let extension = declared_type
        .split('/')
        .nth(1)
        .map(str::trim)
        .filter(|subtype| !subtype.is_empty())
        .unwrap_or(DEFAULT_DOWNLOAD_EXTENSION);
    format!("compressed_image.{extension}")
}

/// Encodes bytes as a base64 data URI.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Decoded data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Media type before `;base64`.
    pub mime: String,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

/// Decodes a `data:<mime>;base64,<payload>` string.
///
/// # Errors
/// Returns [`CoreError::InvalidDataUri`] when the prefix or base64 payload is
/// malformed.
pub fn decode_data_uri(raw: &str) -> Result<DataUri, CoreError> {
    let rest = raw
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::InvalidDataUri("missing data: prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::InvalidDataUri("missing payload separator".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| CoreError::InvalidDataUri("payload is not base64".to_string()))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|error| CoreError::InvalidDataUri(format!("base64 decode failed: {error}")))?;

    Ok(DataUri {
        mime: mime.to_string(),
        bytes,
    })
}

/// Error type for core validation and codec failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Quality is not an integer.
    #[error("invalid quality value: {0:?}")]
    InvalidQuality(String),
    /// Quality is outside `[0, 100]`.
    #[error("quality {0} is outside 0-100")]
    QualityOutOfRange(u32),
    /// Data URI could not be decoded.
    #[error("invalid data uri: {0}")]
    InvalidDataUri(String),
}
