use crate::prelude::{eprintln, *};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Newline-delimited JSON-RPC over stdin/stdout until EOF.
pub async fn run_stdio(global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Starting DevGenius MCP server on stdio...");
        eprintln!();
    }

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            log::debug!("stdin closed, stopping MCP server");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if global.verbose {
            eprintln!("Received: {trimmed}");
        }

        let Some(response) = super::handle_request(trimmed, &global).await else {
            continue;
        };
        let response_json = serde_json::to_string(&response)?;

        if global.verbose {
            eprintln!("Sending: {response_json}");
        }

        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
