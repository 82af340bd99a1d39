//! Request building
//!
//! Maps a selected feature and the raw user input to a normalized
//! [`RequestPayload`]. Construction is pure; nothing here talks to the
//! provider.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feature::FeatureKind;
use crate::language::LanguageCode;

/// Translator source language before the user touches the selector.
pub const DEFAULT_FROM_LANGUAGE: LanguageCode = LanguageCode::Javascript;
/// Translator target language before the user touches the selector.
pub const DEFAULT_TO_LANGUAGE: LanguageCode = LanguageCode::Python;
/// Error detection language before the user touches the selector.
pub const DEFAULT_CODE_LANGUAGE: LanguageCode = LanguageCode::Javascript;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Input is empty. Enter a question or paste some code first")]
    EmptyInput,

    #[error("A request is already in flight for this slot")]
    RequestInFlight,
}

/// Feature-specific options, present only for the features that take them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureOptions {
    #[serde(rename_all = "camelCase")]
    Translator {
        from_language: LanguageCode,
        to_language: LanguageCode,
    },
    ErrorDetection { language: LanguageCode },
}

/// Selector values supplied alongside the input.
///
/// Fields the caller leaves unset fall back to the selector defaults.
/// Features that take no options ignore this entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtraOptions {
    pub from_language: Option<LanguageCode>,
    pub to_language: Option<LanguageCode>,
    pub language: Option<LanguageCode>,
}

/// A validated request, ready to hand to the provider.
///
/// Only [`build`] creates one, so `options` always matches `feature_id` and
/// `code` is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    feature_id: FeatureKind,
    code: String,
    options: Option<FeatureOptions>,
}

impl RequestPayload {
    pub fn feature_id(&self) -> FeatureKind {
        self.feature_id
    }

    /// The input exactly as typed.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn options(&self) -> Option<&FeatureOptions> {
        self.options.as_ref()
    }
}

/// Build the payload for `feature` from the raw input.
///
/// Fails with [`RequestError::EmptyInput`] when the input is blank after
/// trimming. The input itself is kept untrimmed.
pub fn build(
    feature: FeatureKind,
    raw_code: &str,
    extra: Option<&ExtraOptions>,
) -> Result<RequestPayload, RequestError> {
    if raw_code.trim().is_empty() {
        return Err(RequestError::EmptyInput);
    }

    let extra = extra.copied().unwrap_or_default();

    let options = match feature {
        FeatureKind::Translator => Some(FeatureOptions::Translator {
            from_language: extra.from_language.unwrap_or(DEFAULT_FROM_LANGUAGE),
            to_language: extra.to_language.unwrap_or(DEFAULT_TO_LANGUAGE),
        }),
        FeatureKind::ErrorDetection => Some(FeatureOptions::ErrorDetection {
            language: extra.language.unwrap_or(DEFAULT_CODE_LANGUAGE),
        }),
        FeatureKind::Question
        | FeatureKind::Explanation
        | FeatureKind::Error
        | FeatureKind::Optimizer => None,
    };

    Ok(RequestPayload {
        feature_id: feature,
        code: raw_code.to_string(),
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_extras() -> ExtraOptions {
        ExtraOptions {
            from_language: Some(LanguageCode::Go),
            to_language: Some(LanguageCode::Rust),
            language: Some(LanguageCode::Kotlin),
        }
    }

    // ============================================================================
    // Empty input
    // ============================================================================

    #[test]
    fn test_whitespace_only_input_rejected_for_every_feature() {
        for feature in FeatureKind::ALL {
            for input in ["", "   ", "\n\t  \r\n"] {
                assert_eq!(
                    build(feature, input, Some(&all_extras())),
                    Err(RequestError::EmptyInput),
                    "feature {feature} accepted {input:?}"
                );
            }
        }
    }

    #[test]
    fn test_input_is_not_trimmed() {
        let payload = build(FeatureKind::Question, "  what is a monad?\n", None).unwrap();
        assert_eq!(payload.code(), "  what is a monad?\n");
    }

    // ============================================================================
    // Options
    // ============================================================================

    #[test]
    fn test_language_agnostic_features_ignore_extras() {
        for feature in [
            FeatureKind::Question,
            FeatureKind::Explanation,
            FeatureKind::Error,
            FeatureKind::Optimizer,
        ] {
            let payload = build(feature, "let x = 1;", Some(&all_extras())).unwrap();
            assert_eq!(payload.options(), None);
            assert_eq!(payload.feature_id(), feature);
        }
    }

    #[test]
    fn test_translator_defaults() {
        let payload = build(FeatureKind::Translator, "print(1)", None).unwrap();
        assert_eq!(
            payload.options(),
            Some(&FeatureOptions::Translator {
                from_language: LanguageCode::Javascript,
                to_language: LanguageCode::Python,
            })
        );
    }

    #[test]
    fn test_translator_partial_extras_fill_defaults() {
        let extra = ExtraOptions {
            to_language: Some(LanguageCode::Rust),
            ..Default::default()
        };
        let payload = build(FeatureKind::Translator, "x", Some(&extra)).unwrap();
        assert_eq!(
            payload.options(),
            Some(&FeatureOptions::Translator {
                from_language: LanguageCode::Javascript,
                to_language: LanguageCode::Rust,
            })
        );
    }

    #[test]
    fn test_translator_never_carries_error_detection_options() {
        let payload = build(FeatureKind::Translator, "x", Some(&all_extras())).unwrap();
        assert_eq!(
            payload.options(),
            Some(&FeatureOptions::Translator {
                from_language: LanguageCode::Go,
                to_language: LanguageCode::Rust,
            })
        );
    }

    #[test]
    fn test_error_detection_default_and_explicit_language() {
        let payload = build(FeatureKind::ErrorDetection, "x", None).unwrap();
        assert_eq!(
            payload.options(),
            Some(&FeatureOptions::ErrorDetection {
                language: LanguageCode::Javascript
            })
        );

        let payload = build(FeatureKind::ErrorDetection, "x", Some(&all_extras())).unwrap();
        assert_eq!(
            payload.options(),
            Some(&FeatureOptions::ErrorDetection {
                language: LanguageCode::Kotlin
            })
        );
    }

    // ============================================================================
    // Serialization
    // ============================================================================

    #[test]
    fn test_payload_json_shape() {
        let payload = build(FeatureKind::Translator, "fn main() {}", None).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "featureId": "translator",
                "code": "fn main() {}",
                "options": { "fromLanguage": "javascript", "toLanguage": "python" }
            })
        );

        let payload = build(FeatureKind::Explanation, "x", None).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["options"], serde_json::Value::Null);
    }
}
