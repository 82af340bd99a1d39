//! Feature catalog
//!
//! The closed set of assistant capabilities and the static display metadata
//! attached to each one. Descriptors are defined once and never mutated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the six assistant capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Question,
    Explanation,
    Error,
    ErrorDetection,
    Optimizer,
    Translator,
}

impl FeatureKind {
    /// All features in catalog order.
    pub const ALL: [FeatureKind; 6] = [
        FeatureKind::Question,
        FeatureKind::Explanation,
        FeatureKind::Error,
        FeatureKind::ErrorDetection,
        FeatureKind::Optimizer,
        FeatureKind::Translator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Question => "question",
            FeatureKind::Explanation => "explanation",
            FeatureKind::Error => "error",
            FeatureKind::ErrorDetection => "error_detection",
            FeatureKind::Optimizer => "optimizer",
            FeatureKind::Translator => "translator",
        }
    }

    /// Static descriptor for this feature.
    pub fn descriptor(&self) -> &'static FeatureDescriptor {
        describe(*self)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid feature: '{0}'. Valid features: question, explanation, error, error_detection, optimizer, translator")]
pub struct InvalidFeature(pub String);

impl FromStr for FeatureKind {
    type Err = InvalidFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| InvalidFeature(s.to_string()))
    }
}

/// Display metadata for a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDescriptor {
    pub id: FeatureKind,
    pub name: &'static str,
    pub description: &'static str,
    pub icon_key: &'static str,
    pub placeholder_text: &'static str,
    pub submit_label: &'static str,
    /// Heading shown above a rendered result.
    pub result_title: &'static str,
    /// Short hint shown next to the input label.
    pub input_hint: &'static str,
}

const PASTE_HINT: &str = "Paste your code below";

static CATALOG: [FeatureDescriptor; 6] = [
    FeatureDescriptor {
        id: FeatureKind::Question,
        name: "Ask a Question",
        description: "Get AI-generated answers to your coding queries",
        icon_key: "MessageSquare",
        placeholder_text: "Ask any coding-related question...",
        submit_label: "Get Answer",
        result_title: "Answer",
        input_hint: "Ask anything coding related",
    },
    FeatureDescriptor {
        id: FeatureKind::Explanation,
        name: "Code Explanation",
        description: "Break down complex code into simple explanations",
        icon_key: "Code",
        placeholder_text: "Paste code you want explained...",
        submit_label: "Explain Code",
        result_title: "Code Explanation",
        input_hint: PASTE_HINT,
    },
    FeatureDescriptor {
        id: FeatureKind::Error,
        name: "Error Finder",
        description: "Detect and explain errors in your code",
        icon_key: "AlertTriangle",
        placeholder_text: "Paste code with errors...",
        submit_label: "Find Errors",
        result_title: "Error Analysis",
        input_hint: PASTE_HINT,
    },
    FeatureDescriptor {
        id: FeatureKind::ErrorDetection,
        name: "Error Detection",
        description: "Advanced error analysis with corrected code",
        icon_key: "BugOff",
        placeholder_text: "Paste code for error detection...",
        submit_label: "Detect Errors",
        result_title: "Error Detection",
        input_hint: PASTE_HINT,
    },
    FeatureDescriptor {
        id: FeatureKind::Optimizer,
        name: "Code Optimizer",
        description: "Refactor and improve your code efficiency",
        icon_key: "Sparkles",
        placeholder_text: "Paste code to optimize...",
        submit_label: "Optimize Code",
        result_title: "Optimized Code",
        input_hint: PASTE_HINT,
    },
    FeatureDescriptor {
        id: FeatureKind::Translator,
        name: "Language Translator",
        description: "Convert code between programming languages",
        icon_key: "ArrowLeftRight",
        placeholder_text: "Paste code to translate...",
        submit_label: "Translate Code",
        result_title: "Translated Code",
        input_hint: PASTE_HINT,
    },
];

/// Look up the descriptor for a feature.
pub fn describe(kind: FeatureKind) -> &'static FeatureDescriptor {
    match kind {
        FeatureKind::Question => &CATALOG[0],
        FeatureKind::Explanation => &CATALOG[1],
        FeatureKind::Error => &CATALOG[2],
        FeatureKind::ErrorDetection => &CATALOG[3],
        FeatureKind::Optimizer => &CATALOG[4],
        FeatureKind::Translator => &CATALOG[5],
    }
}

/// Look up a descriptor by its string id.
///
/// Fails with [`InvalidFeature`] for anything outside the six known ids.
pub fn describe_id(id: &str) -> Result<&'static FeatureDescriptor, InvalidFeature> {
    id.parse::<FeatureKind>().map(describe)
}

/// All descriptors in catalog order.
pub fn all() -> &'static [FeatureDescriptor] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_is_keyed_by_id() {
        for kind in FeatureKind::ALL {
            assert_eq!(describe(kind).id, kind);
        }
    }

    #[test]
    fn test_all_preserves_catalog_order() {
        let ids: Vec<&str> = all().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "question",
                "explanation",
                "error",
                "error_detection",
                "optimizer",
                "translator"
            ]
        );
    }

    #[test]
    fn test_describe_id_known() {
        let descriptor = describe_id("error_detection").unwrap();
        assert_eq!(descriptor.name, "Error Detection");
        assert_eq!(descriptor.submit_label, "Detect Errors");
        assert_eq!(descriptor.icon_key, "BugOff");
    }

    #[test]
    fn test_describe_id_unknown() {
        let err = describe_id("refactor").unwrap_err();
        assert_eq!(err, InvalidFeature("refactor".to_string()));
        assert!(err.to_string().contains("refactor"));
    }

    #[test]
    fn test_describe_id_is_case_sensitive() {
        assert!(describe_id("Question").is_err());
    }

    #[test]
    fn test_input_hints() {
        assert_eq!(
            FeatureKind::Question.descriptor().input_hint,
            "Ask anything coding related"
        );
        assert_eq!(
            FeatureKind::Translator.descriptor().input_hint,
            "Paste your code below"
        );
    }

    #[test]
    fn test_serde_uses_snake_case_ids() {
        let json = serde_json::to_string(&FeatureKind::ErrorDetection).unwrap();
        assert_eq!(json, "\"error_detection\"");

        let kind: FeatureKind = serde_json::from_str("\"optimizer\"").unwrap();
        assert_eq!(kind, FeatureKind::Optimizer);
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let value = serde_json::to_value(describe(FeatureKind::Question)).unwrap();
        assert_eq!(value["id"], "question");
        assert_eq!(value["submitLabel"], "Get Answer");
        assert_eq!(value["placeholderText"], "Ask any coding-related question...");
    }
}
