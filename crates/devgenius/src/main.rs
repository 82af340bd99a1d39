use crate::prelude::*;
use clap::Parser;

mod ask;
mod credentials;
mod error;
mod features;
mod gemini;
mod mcp;
mod ocr;
mod prelude;
mod render;

use devgenius_core::config::{resolve_api_key, ProviderConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "AI-powered coding assistant: ask questions, explain, debug, optimize, and translate code"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Clone, clap::Args)]
pub struct Global {
    /// Gemini API key (falls back to the stored key)
    #[clap(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model name
    #[clap(long, env = "DEVGENIUS_MODEL", global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Gemini API base URL
    #[clap(long, env = "DEVGENIUS_BASE_URL", global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Whether to display additional information.
    #[clap(long, env = "DEVGENIUS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl std::fmt::Debug for Global {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Global")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl Global {
    /// Resolve the provider configuration, reading the stored key if no
    /// explicit one was given.
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        let store = credentials::FileCredentialStore::open_default()?;
        let api_key =
            resolve_api_key(self.api_key.as_deref(), &store)?.ok_or(Error::MissingApiKey)?;

        Ok(ProviderConfig::new(api_key)
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone()))
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// List the available assistant features
    Features(crate::features::App),

    /// Run a feature against a question or a piece of code
    Ask(crate::ask::AskOptions),

    /// Extract text from an image with OCR
    Ocr(crate::ocr::OcrOptions),

    /// Manage the stored Gemini API key
    Key(crate::credentials::App),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Features(sub_app) => crate::features::run(sub_app, app.global).await,
        SubCommands::Ask(options) => crate::ask::run(options, app.global).await,
        SubCommands::Ocr(options) => crate::ocr::run(options, app.global).await,
        SubCommands::Key(sub_app) => crate::credentials::run(sub_app, app.global).await,
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
