mod cli;
mod stdio;
mod tools;

pub use cli::App;

use crate::prelude::*;
use serde::{Deserialize, Serialize};

const JSONRPC_VERSION: &str = "2.0";

// JSON-RPC 2.0 types
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<serde_json::Value>,
    method: String,
    params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn from_result(
        id: Option<serde_json::Value>,
        result: Result<serde_json::Value, JsonRpcError>,
    ) -> Self {
        let (result, error) = match result {
            Ok(value) => (Some(value), None),
            Err(error) => (None, Some(error)),
        };

        JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
            error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn parse_error(message: impl std::fmt::Display) -> Self {
        Self::new(-32700, format!("Parse error: {message}"))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(-32601, format!("Method not found: {method}"))
    }

    pub fn invalid_params(message: impl std::fmt::Display) -> Self {
        Self::new(-32602, message.to_string())
    }

    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self::new(-32603, format!("Internal error: {message}"))
    }

    fn new(code: i32, message: String) -> Self {
        JsonRpcError {
            code,
            message,
            data: None,
        }
    }
}

// MCP Protocol types
#[derive(Debug, Serialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        cli::Commands::Stdio => stdio::run_stdio(global).await,
    }
}

/// Handle one JSON-RPC message. Notifications get no response.
pub async fn handle_request(request_str: &str, global: &crate::Global) -> Option<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_str(request_str) {
        Ok(req) => req,
        Err(e) => {
            log::warn!("Rejected malformed JSON-RPC message: {}", e);
            return Some(JsonRpcResponse::from_result(
                None,
                Err(JsonRpcError::parse_error(e)),
            ));
        }
    };

    if request.id.is_none() && request.method.starts_with("notifications/") {
        log::debug!("Notification {}", request.method);
        return None;
    }

    log::debug!("Handling {}", request.method);

    let result = match request.method.as_str() {
        "initialize" => tools::handle_initialize(),
        "ping" => Ok(serde_json::json!({})),
        "tools/list" => tools::handle_tools_list(),
        "tools/call" => tools::handle_tools_call(request.params, global).await,
        method => Err(JsonRpcError::method_not_found(method)),
    };

    Some(JsonRpcResponse::from_result(request.id, result))
}
