mod assist;
mod features;
mod image;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use super::{JsonRpcError, Tool};

const PROTOCOL_VERSION: &str = "2024-11-05";

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    pub fn text(text: String) -> Self {
        CallToolResult {
            content: vec![Content::Text { text }],
            is_error: None,
        }
    }

    /// A tool-level failure the model should see, not a protocol error.
    pub fn failure(message: String) -> Self {
        CallToolResult {
            content: vec![Content::Text { text: message }],
            is_error: Some(true),
        }
    }

    pub fn into_value(self) -> Result<serde_json::Value, JsonRpcError> {
        serde_json::to_value(self).map_err(JsonRpcError::internal)
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

/// Deserialize tool arguments, treating a missing object as empty.
pub fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<serde_json::Value>,
) -> Result<T, JsonRpcError> {
    let value = arguments.unwrap_or_else(|| serde_json::json!({}));
    serde_json::from_value(value)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid arguments: {e}")))
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "devgenius".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(JsonRpcError::internal)
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "list_features".to_string(),
            description: "List the DevGenius assistant features with their ids, names, descriptions, and submit labels.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        Tool {
            name: "assist".to_string(),
            description: "Run a DevGenius feature (question, explanation, error, error_detection, optimizer, translator) against a question or code snippet. Returns the AI response as text and code segments, or an errors/corrected-code pair for error_detection. Requires a Gemini API key (GEMINI_API_KEY or `devgenius key set`).".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "feature": {
                        "type": "string",
                        "enum": ["question", "explanation", "error", "error_detection", "optimizer", "translator"],
                        "description": "Feature id"
                    },
                    "code": {
                        "type": "string",
                        "description": "The question or code to send"
                    },
                    "from_language": {
                        "type": "string",
                        "description": "Source language for translator (default: javascript)"
                    },
                    "to_language": {
                        "type": "string",
                        "description": "Target language for translator (default: python)"
                    },
                    "language": {
                        "type": "string",
                        "description": "Code language for error_detection (default: javascript)"
                    },
                    "format": {
                        "type": "string",
                        "enum": ["json", "html"],
                        "description": "Output format (default: json)"
                    }
                },
                "required": ["feature", "code"]
            }),
        },
        Tool {
            name: "extract_image_text".to_string(),
            description: "Extract text from a JPEG, PNG, GIF, or WebP image (max 10 MiB) with Tesseract OCR.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path to the image file"
                    },
                    "mime": {
                        "type": "string",
                        "description": "Declared MIME type (inferred from the extension when omitted)"
                    },
                    "lang": {
                        "type": "string",
                        "description": "Tesseract language (default: eng)"
                    }
                },
                "required": ["path"]
            }),
        },
    ];

    serde_json::to_value(ToolsList { tools }).map_err(JsonRpcError::internal)
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams =
        serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {e}")))?;

    match params.name.as_str() {
        "list_features" => features::handle_list_features(global),
        "assist" => assist::handle_assist(params.arguments, global).await,
        "extract_image_text" => image::handle_extract_image_text(params.arguments, global).await,
        _ => Err(JsonRpcError::invalid_params(format!(
            "Unknown tool: {}",
            params.name
        ))),
    }
}
