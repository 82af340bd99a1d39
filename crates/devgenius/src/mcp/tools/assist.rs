use devgenius_core::language::LanguageCode;
use devgenius_core::render::render_rendered_html;
use devgenius_core::request::ExtraOptions;
use serde::Deserialize;

use super::{parse_arguments, CallToolResult, JsonRpcError};
use crate::ask::{assist_data, build_payload};
use crate::gemini::GeminiClient;

#[derive(Debug, Deserialize)]
struct AssistArgs {
    feature: String,
    code: String,
    from_language: Option<String>,
    to_language: Option<String>,
    language: Option<String>,
    format: Option<String>,
}

impl AssistArgs {
    fn extra(&self) -> Result<ExtraOptions, JsonRpcError> {
        Ok(ExtraOptions {
            from_language: parse_language(self.from_language.as_deref())?,
            to_language: parse_language(self.to_language.as_deref())?,
            language: parse_language(self.language.as_deref())?,
        })
    }
}

fn parse_language(value: Option<&str>) -> Result<Option<LanguageCode>, JsonRpcError> {
    value
        .map(|v| v.parse::<LanguageCode>())
        .transpose()
        .map_err(JsonRpcError::invalid_params)
}

pub async fn handle_assist(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let args: AssistArgs = parse_arguments(arguments)?;

    if global.verbose {
        anstream::eprintln!(
            "Calling assist: feature={}, code={} chars",
            args.feature,
            args.code.len()
        );
    }

    let html = match args.format.as_deref() {
        None | Some("json") => false,
        Some("html") => true,
        Some(other) => {
            return Err(JsonRpcError::invalid_params(format!(
                "Unknown format '{other}'. Use json or html"
            )))
        }
    };

    // Input errors never reach the provider
    let payload = build_payload(&args.feature, &args.code, &args.extra()?)
        .map_err(JsonRpcError::invalid_params)?;

    let config = global.provider_config().map_err(JsonRpcError::internal)?;
    let client = GeminiClient::new(config).map_err(JsonRpcError::internal)?;

    let output = assist_data(&client, payload)
        .await
        .map_err(JsonRpcError::internal)?;

    if let Some(message) = output.response.error() {
        return CallToolResult::failure(message.to_string()).into_value();
    }

    let text = match (html, output.rendered()) {
        (true, Some(rendered)) => render_rendered_html(&rendered),
        _ => serde_json::to_string_pretty(&output.to_json()).map_err(JsonRpcError::internal)?,
    };

    CallToolResult::text(text).into_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tests::test_global;

    #[tokio::test]
    async fn test_unknown_feature_is_invalid_params() {
        let err = handle_assist(
            Some(serde_json::json!({"feature": "summarize", "code": "x"})),
            &test_global(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, -32602);
        assert!(err.message.contains("summarize"));
    }

    #[tokio::test]
    async fn test_blank_code_is_invalid_params() {
        let err = handle_assist(
            Some(serde_json::json!({"feature": "question", "code": " \n\t "})),
            &test_global(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, -32602);
    }

    #[tokio::test]
    async fn test_unknown_language_is_invalid_params() {
        let err = handle_assist(
            Some(serde_json::json!({
                "feature": "translator",
                "code": "print(1)",
                "to_language": "cobol"
            })),
            &test_global(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, -32602);
        assert!(err.message.contains("cobol"));
    }

    #[tokio::test]
    async fn test_missing_code_is_invalid_params() {
        let err = handle_assist(
            Some(serde_json::json!({"feature": "question"})),
            &test_global(),
        )
        .await
        .unwrap_err();

        assert!(err.message.starts_with("Invalid arguments"));
    }

    #[tokio::test]
    async fn test_unknown_format_is_invalid_params() {
        let err = handle_assist(
            Some(serde_json::json!({"feature": "question", "code": "q", "format": "xml"})),
            &test_global(),
        )
        .await
        .unwrap_err();

        assert!(err.message.contains("xml"));
    }
}
