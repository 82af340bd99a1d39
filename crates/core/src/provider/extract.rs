use std::sync::LazyLock;

use regex::Regex;

use crate::error_detection::ErrorDetectionResult;
use crate::feature::FeatureKind;
use crate::response::ProviderOutput;

static CORRECTED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)corrected\s+code\s*:").expect("corrected marker pattern is valid")
});

static ERRORS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*errors\s*:").expect("errors label pattern is valid"));

/// Split an error detection reply into narrative and corrected code.
///
/// Without a `CORRECTED CODE:` marker the whole reply is the narrative.
pub fn parse_error_detection(raw: &str) -> ErrorDetectionResult {
    let Some(marker) = CORRECTED_MARKER.find(raw) else {
        return ErrorDetectionResult {
            errors: strip_errors_label(raw),
            corrected_code: String::new(),
        };
    };

    let errors = strip_errors_label(&raw[..marker.start()]);
    let corrected = raw[marker.end()..].trim();
    let corrected_code = single_fence_body(corrected).unwrap_or(corrected).to_string();

    ErrorDetectionResult {
        errors,
        corrected_code,
    }
}

/// Body of `text` when it is exactly one fenced block.
///
/// A line inside the block that opens with a fence means there is more than
/// one block, and `None` is returned.
fn single_fence_body(text: &str) -> Option<&str> {
    let (tag, body) = text.strip_prefix("```")?.split_once('\n')?;
    if tag.contains('`') {
        return None;
    }

    let body = body.strip_suffix("```")?;
    let body = body.strip_suffix('\n').unwrap_or(body);
    if body.lines().any(|line| line.trim_start().starts_with("```")) {
        return None;
    }

    Some(body)
}

fn strip_errors_label(text: &str) -> String {
    ERRORS_LABEL.replace(text, "").trim().to_string()
}

/// Turn the reply text into provider output for `feature`.
pub fn interpret_reply(feature: FeatureKind, raw: String) -> ProviderOutput {
    match feature {
        FeatureKind::ErrorDetection => ProviderOutput::ErrorDetection(parse_error_detection(&raw)),
        FeatureKind::Question
        | FeatureKind::Explanation
        | FeatureKind::Error
        | FeatureKind::Optimizer
        | FeatureKind::Translator => ProviderOutput::Text(raw),
    }
}
