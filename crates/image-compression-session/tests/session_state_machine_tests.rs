//! Integration tests for session state transitions.

use image_compression_core::{CompressionResult, FileHandle, ImageMime, SourceFile, SourceId};
use image_compression_session::{SessionError, SessionPhase, SessionState};

fn loaded(id: SourceId, name: &str) -> SourceFile {
    SourceFile::from_loaded(
        id,
        &FileHandle::new(name, "image/jpeg", 2),
        ImageMime::Jpeg,
        vec![0xff, 0xd8],
    )
}

fn result(compressed_data: &str) -> CompressionResult {
    CompressionResult {
        original_size: 1000,
        compressed_size: 400,
        compression_ratio: 60.0,
        compressed_data: compressed_data.to_string(),
    }
}

#[test]
fn session_state_machine_tests_new_selection_discards_result() {
    let mut session = SessionState::new();
    let first = session.begin_selection();
    session.select_file(loaded(first, "a.jpg")).expect("first selection");
    session
        .set_result(first, result("data:image/jpeg;base64,AAAA"))
        .expect("result for current source");
    assert_eq!(session.phase(), SessionPhase::Compressed);

    let second = session.begin_selection();
    assert_eq!(session.phase(), SessionPhase::Compressed);
    session.select_file(loaded(second, "b.jpg")).expect("second selection");

    assert_eq!(session.phase(), SessionPhase::Previewing);
    assert!(session.result().is_none());
    assert_eq!(session.source().map(SourceFile::name), Some("b.jpg"));
}

#[test]
fn session_state_machine_tests_discards_slow_stale_load() {
    let mut session = SessionState::new();
    let slow = session.begin_selection();
    let fast = session.begin_selection();

    session.select_file(loaded(fast, "fast.jpg")).expect("latest selection");
    assert_eq!(
        session.select_file(loaded(slow, "slow.jpg")),
        Err(SessionError::StaleSelection(slow))
    );
    assert_eq!(session.source().map(SourceFile::name), Some("fast.jpg"));
}

#[test]
fn session_state_machine_tests_discards_result_for_replaced_source() {
    let mut session = SessionState::new();
    let first = session.begin_selection();
    session.select_file(loaded(first, "a.jpg")).expect("first selection");
    let second = session.begin_selection();
    session.select_file(loaded(second, "b.jpg")).expect("second selection");

    assert_eq!(
        session.set_result(first, result("data:image/jpeg;base64,AAAA")),
        Err(SessionError::StaleResult {
            issued_for: first,
            current: second,
        })
    );
    assert_eq!(session.phase(), SessionPhase::Previewing);
}

#[test]
fn session_state_machine_tests_download_requires_encoded_data() {
    let mut session = SessionState::new();
    let id = session.begin_selection();
    session.select_file(loaded(id, "a.jpg")).expect("selection");
    session.set_result(id, result("")).expect("result");

    assert_eq!(session.phase(), SessionPhase::Compressed);
    assert!(!session.download_available());
}

#[test]
fn session_state_machine_tests_failed_load_keeps_previous_source() {
    let mut session = SessionState::new();
    let first = session.begin_selection();
    session.select_file(loaded(first, "a.jpg")).expect("first selection");

    let failed = session.begin_selection();
    assert!(session.abandon_selection(failed));
    assert!(!session.abandon_selection(failed));
    assert_eq!(session.source().map(SourceFile::id), Some(first));
}
