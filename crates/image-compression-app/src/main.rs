#![warn(missing_docs)]
//! # image-compression binary
//!
//! Terminal shell that drives the page controller for one image: select,
//! compress, print the results, and save the compressed artifact.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::Parser;
use image_compression_app::{
    AppConfig, Controller, DEFAULT_PAGE_URL, FsFileReader, Surface, UiEvent, app_version,
    file_handle_from_path, redact_data_uris,
};
use image_compression_client::ReqwestTransport;
use image_compression_core::{DEFAULT_QUALITY, Quality, decode_data_uri};
use image_compression_ui::{DownloadLink, Notice, NoticeKind, ScrollRequest, UiState};
use log::{LevelFilter, Log, Metadata, Record};
use time::OffsetDateTime;

/// Compress one image through a remote compression service.
#[derive(Debug, Parser)]
#[command(name = "image-compression", version = image_compression_app::APP_VERSION)]
struct Args {
    /// Image to compress.
    file: PathBuf,

    /// Compression quality (0-100).
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,

    /// URL the page is served from; decides root vs mounted endpoints.
    #[arg(long, default_value = DEFAULT_PAGE_URL)]
    page_url: String,

    /// Directory the compressed image is written to.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Also append log lines to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log debug detail.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(error) = RunLogger::install(args.log_file.as_ref(), args.verbose) {
        eprintln!("failed to start image-compression logging: {error}");
        return ExitCode::FAILURE;
    }

    log::info!(target: "bootstrap", "start: version={}", app_version());
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!(target: "bootstrap", "exit: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let config = AppConfig {
        page_url: args.page_url.clone(),
        default_quality: Quality::new(args.quality).map_err(|error| error.to_string())?,
        ..AppConfig::default()
    };

    let client = config
        .build_client(Arc::new(ReqwestTransport::new()))
        .map_err(|error| error.to_string())?;
    let surface = TerminalSurface::new(args.output_dir.clone());
    let mut controller = Controller::new(config, client, Arc::new(FsFileReader), surface);

    let handle = file_handle_from_path(&args.file).map_err(|error| error.to_string())?;
    for event in [
        UiEvent::PickerChange(vec![handle]),
        UiEvent::CompressClick,
        UiEvent::DownloadClick,
    ] {
        controller.dispatch(event).map_err(|error| error.to_string())?;
    }

    Ok(())
}

/// Prints page state to the terminal and writes downloads to disk.
struct TerminalSurface {
    output_dir: PathBuf,
    last_rendered: Option<UiState>,
}

impl TerminalSurface {
    fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            last_rendered: None,
        }
    }
}

impl Surface for TerminalSurface {
    fn render(&mut self, state: &UiState) {
        let previous = self.last_rendered.replace(state.clone());
        let was_showing_results = previous.as_ref().is_some_and(|prev| prev.results_visible);
        let results_changed = previous.as_ref().is_none_or(|prev| prev.results != state.results);

        if state.loading_visible && !previous.is_some_and(|prev| prev.loading_visible) {
            println!("Compressing at quality {}...", state.quality_label);
        }

        if state.results_visible && (!was_showing_results || results_changed) {
            let marker = if state.results.compressed_emphasis.style().color.is_empty() {
                ""
            } else {
                "  (larger than original)"
            };
            println!("Original size:     {}", state.results.original_size);
            println!("Compressed size:   {}{marker}", state.results.compressed_size);
            println!("Compression ratio: {}", state.results.ratio);
        }
    }

    fn notify(&mut self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Transient { .. } => eprintln!("notice: {}", notice.message),
            NoticeKind::Blocking => eprintln!("error: {}", notice.message),
        }
    }

    fn open_file_picker(&mut self) {
        log::debug!(target: "input", "open_file_picker: not available in terminal");
    }

    fn reset_file_picker(&mut self) {}

    fn scroll_into_view(&mut self, _request: ScrollRequest) {}

    fn save_download(&mut self, link: &DownloadLink) -> Result<(), String> {
        let decoded = decode_data_uri(&link.href).map_err(|error| error.to_string())?;
        let path = self.output_dir.join(&link.filename);
        std::fs::write(&path, &decoded.bytes)
            .map_err(|error| format!("unable to write '{}': {error}", path.display()))?;
        println!("Saved {}", path.display());
        Ok(())
    }
}

/// `log` backend writing `timestamp | LEVEL | target | message` lines.
struct RunLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl RunLogger {
    fn install(log_file: Option<&PathBuf>, verbose: bool) -> Result<(), String> {
        let file = log_file
            .map(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map(Mutex::new)
                    .map_err(|error| {
                        format!("unable to open log file '{}': {error}", path.display())
                    })
            })
            .transpose()?;

        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        log::set_boxed_logger(Box::new(Self { level, file }))
            .map_err(|error| error.to_string())?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for RunLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = redact_data_uris(&record.args().to_string());
        let line = format!(
            "{} | {} | {} | {message}\n",
            timestamp_utc(),
            record.level(),
            record.target()
        );

        eprint!("{line}");
        if let Some(file) = &self.file
            && let Ok(mut file) = file.lock()
        {
            let _ = file.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file
            && let Ok(mut file) = file.lock()
        {
            let _ = file.flush();
        }
    }
}

fn timestamp_utc() -> String {
    let now = OffsetDateTime::now_utc();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        now.year(),
        now.month() as u8,
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        now.millisecond()
    )
}
