use devgenius_core::feature::all;

use super::{CallToolResult, JsonRpcError};

pub fn handle_list_features(global: &crate::Global) -> Result<serde_json::Value, JsonRpcError> {
    if global.verbose {
        anstream::eprintln!("Calling list_features");
    }

    let json = serde_json::to_string_pretty(all()).map_err(JsonRpcError::internal)?;
    CallToolResult::text(json).into_value()
}
