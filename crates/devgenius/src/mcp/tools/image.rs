use serde::Deserialize;
use std::path::PathBuf;

use super::{parse_arguments, CallToolResult, JsonRpcError};
use crate::ocr::{extract_text, validate_file, TesseractOcr};

#[derive(Debug, Deserialize)]
struct ExtractImageTextArgs {
    path: PathBuf,
    mime: Option<String>,
    lang: Option<String>,
}

pub async fn handle_extract_image_text(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let args: ExtractImageTextArgs = parse_arguments(arguments)?;

    if global.verbose {
        anstream::eprintln!("Calling extract_image_text: path={}", args.path.display());
    }

    let image = validate_file(&args.path, args.mime.as_deref())
        .await
        .map_err(|e| JsonRpcError::invalid_params(format!("{e:#}")))?;

    let engine = TesseractOcr::locate(args.lang.unwrap_or_else(|| "eng".to_string()))
        .map_err(JsonRpcError::internal)?;

    let outcome = extract_text(&engine, &image)
        .await
        .map_err(JsonRpcError::internal)?;

    match outcome.text.error() {
        Some(message) => CallToolResult::failure(message.to_string()).into_value(),
        None => {
            let json = serde_json::to_string_pretty(&outcome.to_json())
                .map_err(JsonRpcError::internal)?;
            CallToolResult::text(json).into_value()
        }
    }
}
