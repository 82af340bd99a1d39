//! Language codes for the translator and error detection options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Programming languages offered by the translator and error detection selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    Javascript,
    Typescript,
    Python,
    Java,
    C,
    Cpp,
    Csharp,
    Go,
    Ruby,
    Php,
    Swift,
    Kotlin,
    Rust,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 13] = [
        LanguageCode::Javascript,
        LanguageCode::Typescript,
        LanguageCode::Python,
        LanguageCode::Java,
        LanguageCode::C,
        LanguageCode::Cpp,
        LanguageCode::Csharp,
        LanguageCode::Go,
        LanguageCode::Ruby,
        LanguageCode::Php,
        LanguageCode::Swift,
        LanguageCode::Kotlin,
        LanguageCode::Rust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::Javascript => "javascript",
            LanguageCode::Typescript => "typescript",
            LanguageCode::Python => "python",
            LanguageCode::Java => "java",
            LanguageCode::C => "c",
            LanguageCode::Cpp => "cpp",
            LanguageCode::Csharp => "csharp",
            LanguageCode::Go => "go",
            LanguageCode::Ruby => "ruby",
            LanguageCode::Php => "php",
            LanguageCode::Swift => "swift",
            LanguageCode::Kotlin => "kotlin",
            LanguageCode::Rust => "rust",
        }
    }

    /// Selector label: the code with its first character upper-cased.
    ///
    /// "javascript" -> "Javascript", "cpp" -> "Cpp".
    pub fn label(&self) -> String {
        let code = self.as_str();
        let mut chars = code.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown language: '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for LanguageCode {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageCode::ALL
            .into_iter()
            .find(|lang| lang.as_str() == s)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_code() {
        for lang in LanguageCode::ALL {
            assert_eq!(lang.as_str().parse::<LanguageCode>().unwrap(), lang);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "cobol".parse::<LanguageCode>().unwrap_err(),
            UnknownLanguage("cobol".to_string())
        );
        // Membership only, no aliasing
        assert!("c++".parse::<LanguageCode>().is_err());
        assert!("JavaScript".parse::<LanguageCode>().is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(LanguageCode::Javascript.label(), "Javascript");
        assert_eq!(LanguageCode::Cpp.label(), "Cpp");
        assert_eq!(LanguageCode::C.label(), "C");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&LanguageCode::Csharp).unwrap(),
            "\"csharp\""
        );
    }
}
