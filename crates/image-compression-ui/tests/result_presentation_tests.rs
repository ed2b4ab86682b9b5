//! Integration tests for result projection and emphasis.

use image_compression_core::CompressionResult;
use image_compression_ui::{Emphasis, present};

fn result(original_size: u64, compressed_size: u64, compression_ratio: f64) -> CompressionResult {
    CompressionResult {
        original_size,
        compressed_size,
        compression_ratio,
        compressed_data: "data:image/jpeg;base64,AAAA".to_string(),
    }
}

#[test]
fn result_presentation_tests_marks_growth_as_regression() {
    let view = present(&result(1000, 1200, -20.0));

    assert_eq!(view.ratio, "-20%");
    assert_eq!(view.original_size, "1000 B");
    assert_eq!(view.compressed_size, "1.17 KB");
    assert_eq!(view.ratio_emphasis, Emphasis::Regression);
    assert_eq!(view.compressed_emphasis, Emphasis::Regression);
    assert_eq!(Emphasis::Regression.style().border, "1px solid #ff6b6b");
}

#[test]
fn result_presentation_tests_neutral_when_output_shrinks_or_matches() {
    let shrunk = present(&result(1_500_000, 400, 99.97));
    assert_eq!(shrunk.original_size, "1.43 MB");
    assert_eq!(shrunk.ratio, "99.97%");
    assert_eq!(shrunk.ratio_emphasis, Emphasis::Neutral);

    let same = present(&result(1000, 1000, 0.0));
    assert_eq!(same.compressed_emphasis, Emphasis::Neutral);
    assert_eq!(Emphasis::Neutral.style().color, "");
}
