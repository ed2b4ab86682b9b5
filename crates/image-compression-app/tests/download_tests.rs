//! Integration tests for the download action.

mod common;

use std::sync::Arc;

use image_compression_app::{AppError, UiEvent};
use image_compression_core::FileHandle;
use image_compression_ui::NoticeKind;

#[test]
fn download_tests_saves_returned_data_under_synthesized_name() {
    let transport = Arc::new(common::QueueTransport::default().then_ok(common::SHRUNK_BODY));
    let mut controller = common::controller(transport);
    controller
        .dispatch(UiEvent::PickerChange(vec![common::jpeg("a.jpg")]))
        .expect("selection");
    controller.dispatch(UiEvent::CompressClick).expect("compress");

    controller.dispatch(UiEvent::DownloadClick).expect("download");

    let saved = &controller.surface().saved;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].filename, "compressed_image.jpeg");
    assert_eq!(saved[0].href, "data:image/jpeg;base64,AAAA");
}

#[test]
fn download_tests_extension_follows_source_type() {
    let transport = Arc::new(common::QueueTransport::default().then_ok(common::GROWN_BODY));
    let mut controller = common::controller(transport);
    controller
        .dispatch(UiEvent::Drop(vec![FileHandle::new("c.png", "image/png", 4)]))
        .expect("selection");
    controller.dispatch(UiEvent::CompressClick).expect("compress");
    controller.dispatch(UiEvent::DownloadClick).expect("download");

    assert_eq!(controller.surface().saved[0].filename, "compressed_image.png");
}

#[test]
fn download_tests_without_result_fails_visibly() {
    let mut controller = common::controller(Arc::new(common::QueueTransport::default()));
    controller
        .dispatch(UiEvent::PickerChange(vec![common::jpeg("a.jpg")]))
        .expect("selection");

    let error = controller
        .dispatch(UiEvent::DownloadClick)
        .expect_err("nothing to download");

    assert!(matches!(error, AppError::NothingToDownload));
    assert!(!controller.ui().download_enabled);
    let notice = controller.surface().notices.last().expect("notice");
    assert_eq!(notice.kind, NoticeKind::Blocking);
    assert_eq!(notice.message, "No compressed image available!");
}

#[test]
fn download_tests_empty_encoded_data_disables_download() {
    let transport = Arc::new(common::QueueTransport::default().then_ok(
        r#"{"original_size":10,"compressed_size":5,"compression_ratio":50,"compressed_data":""}"#,
    ));
    let mut controller = common::controller(transport);
    controller
        .dispatch(UiEvent::PickerChange(vec![common::jpeg("a.jpg")]))
        .expect("selection");
    controller.dispatch(UiEvent::CompressClick).expect("compress");

    assert!(controller.ui().results_visible);
    assert!(!controller.ui().download_enabled);
    assert!(matches!(
        controller.dispatch(UiEvent::DownloadClick),
        Err(AppError::NothingToDownload)
    ));
}

#[test]
fn download_tests_save_failure_is_reported() {
    let transport = Arc::new(common::QueueTransport::default().then_ok(common::SHRUNK_BODY));
    let mut controller = common::controller(transport);
    controller
        .dispatch(UiEvent::PickerChange(vec![common::jpeg("a.jpg")]))
        .expect("selection");
    controller.dispatch(UiEvent::CompressClick).expect("compress");
    controller.surface_mut().save_failure = Some("disk full".to_string());

    assert!(matches!(
        controller.dispatch(UiEvent::DownloadClick),
        Err(AppError::Download(_))
    ));
    assert_eq!(
        controller.surface().notices.last().map(|notice| notice.message.as_str()),
        Some("Error downloading image: disk full")
    );
}
