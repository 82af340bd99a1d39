//! Error detection dual view: the errors narrative beside the corrected code

use serde::{Deserialize, Serialize};

/// Heading above the dual view.
pub const RESULT_HEADING: &str = "Error Analysis Results";
pub const ERRORS_TAB: &str = "Errors";
pub const CORRECTED_TAB: &str = "Corrected Code";

/// Provider output for the error detection feature, already split into the
/// narrative and the corrected code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetectionResult {
    pub errors: String,
    pub corrected_code: String,
}

/// Two independently renderable, preformatted views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetectionView {
    pub errors_view: String,
    pub corrected_view: String,
}

/// Expose both fields as plain preformatted text.
///
/// No fence extraction is applied: corrected code may legitimately contain
/// backtick runs that a fence scanner would mangle.
pub fn present(result: &ErrorDetectionResult) -> ErrorDetectionView {
    ErrorDetectionView {
        errors_view: result.errors.clone(),
        corrected_view: result.corrected_code.clone(),
    }
}
