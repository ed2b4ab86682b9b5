#![warn(missing_docs)]
//! # image-compression-session
//!
//! ## Purpose
//! Owns the selected [`SourceFile`] and the latest [`CompressionResult`] and
//! enforces the legal transitions between them.
//!
//! ## Responsibilities
//! - Issue a [`SourceId`] for every selection so late completions can be
//!   recognized and dropped.
//! - Install a loaded source, discarding any previous source and result.
//! - Accept a result only for the source it was requested against.
//! - Wipe source, result, and any pending load on clear.
//!
//! ## Data flow
//! Input handling calls [`SessionState::begin_selection`], loads bytes, then
//! calls [`SessionState::select_file`]. The compress flow snapshots
//! [`SessionState::source`] and later hands the result to
//! [`SessionState::set_result`].
//!
//! ## Error model
//! Rejected transitions return [`SessionError`]; the state is left untouched.
//!
//! ## Example
//! ```rust
//! use image_compression_session::{SessionPhase, SessionState};
//!
//! let session = SessionState::new();
//! assert_eq!(session.phase(), SessionPhase::Empty);
//! ```

use image_compression_core::{CompressionResult, SourceFile, SourceId};
use thiserror::Error;

/// Coarse state of the upload/compress flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing selected.
    Empty,
    /// A source is loaded and awaiting compression.
    Previewing,
    /// A source is loaded and has a compression result.
    Compressed,
}

/// Session state with explicit legal transitions.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    source: Option<SourceFile>,
    result: Option<CompressionResult>,
    pending_load: Option<SourceId>,
    last_issued: u64,
}

impl SessionState {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> SessionPhase {
        match (&self.source, &self.result) {
            (None, _) => SessionPhase::Empty,
            (Some(_), None) => SessionPhase::Previewing,
            (Some(_), Some(_)) => SessionPhase::Compressed,
        }
    }

    /// Issues an identity for a new selection whose bytes are about to load.
    ///
    /// Any earlier pending load becomes stale.
    pub fn begin_selection(&mut self) -> SourceId {
        self.last_issued += 1;
        let id = SourceId(self.last_issued);
        self.pending_load = Some(id);
        log::debug!(target: "session", "begin_selection: id={id}");
        id
    }

    /// Identity of the load currently in flight, if any.
    pub fn pending_load(&self) -> Option<SourceId> {
        self.pending_load
    }

    /// Installs a loaded source, discarding any previous source and result.
    ///
    /// # Errors
    /// Returns [`SessionError::StaleSelection`] when `file` was not loaded under
    /// the most recent pending selection.
    pub fn select_file(&mut self, file: SourceFile) -> Result<(), SessionError> {
        if self.pending_load != Some(file.id()) {
            return Err(SessionError::StaleSelection(file.id()));
        }

        log::info!(
            target: "session",
            "select_file: id={} fingerprint={}",
            file.id(),
            file.fingerprint()
        );
        self.pending_load = None;
        self.result = None;
        self.source = Some(file);
        Ok(())
    }

    /// Drops a pending selection whose load failed.
    ///
    /// Returns `true` when `id` was the pending selection.
    pub fn abandon_selection(&mut self, id: SourceId) -> bool {
        if self.pending_load == Some(id) {
            self.pending_load = None;
            return true;
        }
        false
    }

    /// Removes source, result, and any pending load.
    pub fn clear(&mut self) {
        self.source = None;
        self.result = None;
        self.pending_load = None;
        log::info!(target: "session", "clear: session reset to empty");
    }

    /// Installs a result for the source identified by `issued_for`.
    ///
    /// # Errors
    /// Returns [`SessionError::NoSource`] when nothing is selected and
    /// [`SessionError::StaleResult`] when the selection changed since the
    /// request was issued.
    pub fn set_result(
        &mut self,
        issued_for: SourceId,
        result: CompressionResult,
    ) -> Result<(), SessionError> {
        let Some(source) = &self.source else {
            return Err(SessionError::NoSource);
        };

        if source.id() != issued_for {
            return Err(SessionError::StaleResult {
                issued_for,
                current: source.id(),
            });
        }

        self.result = Some(result);
        Ok(())
    }

    /// Currently selected source.
    pub fn source(&self) -> Option<&SourceFile> {
        self.source.as_ref()
    }

    /// Latest compression result.
    pub fn result(&self) -> Option<&CompressionResult> {
        self.result.as_ref()
    }

    /// Returns `true` when a result with downloadable data is present.
    pub fn download_available(&self) -> bool {
        self.result
            .as_ref()
            .is_some_and(CompressionResult::has_download_data)
    }
}

/// Rejected session transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A load completed for a selection that is no longer current.
    #[error("selection {0} is no longer pending")]
    StaleSelection(SourceId),
    /// A result arrived while no source is selected.
    #[error("no source file is selected")]
    NoSource,
    /// A result arrived for a source that has since been replaced.
    #[error("result for source {issued_for} arrived after source {current} was selected")]
    StaleResult {
        /// Source the request was issued against.
        issued_for: SourceId,
        /// Source currently installed.
        current: SourceId,
    },
}
