use crate::feature::FeatureKind;
use crate::request::{FeatureOptions, RequestPayload};

/// Marker the error detection reply uses before the narrative.
pub const ERRORS_MARKER: &str = "ERRORS:";
/// Marker the error detection reply uses before the fixed code.
pub const CORRECTED_MARKER: &str = "CORRECTED CODE:";

/// Build the model prompt for a validated request.
///
/// The instruction comes first, then the user's input.
pub fn build_prompt(payload: &RequestPayload) -> String {
    let code = payload.code();

    let instruction = match (payload.feature_id(), payload.options()) {
        (FeatureKind::Question, _) => {
            return format!(
                "// Instruction\nAnswer the following coding question. Put any code in fenced code blocks.\n\n// Question\n{code}"
            );
        }
        (FeatureKind::Explanation, _) => {
            "Explain what the following code does in simple terms, step by step.".to_string()
        }
        (FeatureKind::Error, _) => {
            "Find the errors in the following code and explain each one and how to fix it."
                .to_string()
        }
        (FeatureKind::Optimizer, _) => {
            "Refactor the following code for efficiency and readability. Return the improved code in a fenced code block, then summarize the changes.".to_string()
        }
        (
            FeatureKind::Translator,
            Some(FeatureOptions::Translator {
                from_language,
                to_language,
            }),
        ) => format!(
            "Translate the following {} code to {}. Return the translated code in a fenced code block.",
            from_language.label(),
            to_language.label()
        ),
        (FeatureKind::ErrorDetection, Some(FeatureOptions::ErrorDetection { language })) => {
            format!(
                "Analyze the following {} code for errors. Reply with exactly two sections:\n{ERRORS_MARKER}\n<a numbered list of every error and why it is wrong>\n{CORRECTED_MARKER}\n<the complete corrected code in a single fenced code block>",
                language.label()
            )
        }
        // Unreachable through `build`
        (FeatureKind::Translator, _) | (FeatureKind::ErrorDetection, _) => {
            "Review the following code.".to_string()
        }
    };

    format!("// Instruction\n{instruction}\n\n// Code\n{code}")
}
