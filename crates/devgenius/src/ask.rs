use crate::prelude::{eprintln, println, *};
use devgenius_core::feature::FeatureKind;
use devgenius_core::language::LanguageCode;
use devgenius_core::provider::ProviderError;
use devgenius_core::render::render_rendered_html;
use devgenius_core::request::{build, ExtraOptions, RequestError, RequestPayload};
use devgenius_core::response::{
    render_output, AiResponse, ProviderOutput, Rendered, RequestSlot, ResponseState,
};
use std::future::Future;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use crate::gemini::GeminiClient;

/// The AI collaborator: one payload in, one reply out.
pub trait AiProvider {
    fn generate(
        &self,
        payload: &RequestPayload,
    ) -> impl Future<Output = Result<ProviderOutput, ProviderError>> + Send;
}

#[derive(Debug, clap::Args)]
pub struct AskOptions {
    /// Feature: question, explanation, error, error_detection, optimizer, translator
    #[arg(value_name = "FEATURE")]
    pub feature: FeatureKind,

    /// Question or code. Read from --file or stdin when omitted
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,

    /// Read the input from a file
    #[arg(short, long, conflicts_with = "input")]
    pub file: Option<PathBuf>,

    /// Source language (translator)
    #[arg(long)]
    pub from: Option<LanguageCode>,

    /// Target language (translator)
    #[arg(long)]
    pub to: Option<LanguageCode>,

    /// Language of the code (error_detection)
    #[arg(long)]
    pub language: Option<LanguageCode>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output escaped HTML
    #[arg(long, conflicts_with = "json")]
    pub html: bool,
}

impl AskOptions {
    fn extra(&self) -> ExtraOptions {
        ExtraOptions {
            from_language: self.from,
            to_language: self.to,
            language: self.language,
        }
    }
}

/// A finished request and the feature it was made for.
#[derive(Debug, Clone)]
pub struct AssistOutput {
    pub feature: FeatureKind,
    pub response: AiResponse,
}

impl AssistOutput {
    /// Render-ready output, when the request succeeded.
    pub fn rendered(&self) -> Option<Rendered> {
        self.response.content().map(render_output)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "feature": self.feature,
            "title": self.feature.descriptor().result_title,
            "response": self.response.to_json("content"),
            "rendered": self.rendered(),
        })
    }
}

pub async fn run(options: AskOptions, global: crate::Global) -> Result<()> {
    let input = read_input(&options)?;
    let payload = build(options.feature, &input, Some(&options.extra()))?;

    if options.feature != FeatureKind::Translator
        && options.feature != FeatureKind::ErrorDetection
        && (options.from.is_some() || options.to.is_some() || options.language.is_some())
    {
        log::debug!("Language options are ignored for {}", options.feature);
    }

    let config = global.provider_config()?;

    if global.verbose {
        eprintln!("Feature: {}", options.feature.descriptor().name);
        eprintln!("Model: {}", config.model);
        eprintln!("Input length: {} chars", payload.code().len());
    }

    let client = GeminiClient::new(config)?;
    let output = assist_data(&client, payload).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output.to_json())?);
        return Ok(());
    }

    match &output.response {
        ResponseState::Ready(reply) => {
            let rendered = render_output(reply);
            if options.html {
                println!("{}", render_rendered_html(&rendered));
            } else {
                println!(
                    "{}",
                    crate::render::format_rendered(output.feature, &rendered)
                );
            }
            Ok(())
        }
        ResponseState::Failed(message) => Err(Error::RequestFailed(message.clone()).into()),
        ResponseState::Loading => Err(eyre!("Request did not complete")),
    }
}

/// Run one request through a fresh slot and return its terminal state.
///
/// Provider failures end up in the `Failed` state rather than as errors.
pub async fn assist_data<P: AiProvider>(
    provider: &P,
    payload: RequestPayload,
) -> Result<AssistOutput> {
    let mut slot = RequestSlot::new();
    dispatch(provider, &mut slot, &payload).await?;

    let response = slot
        .take()
        .ok_or_eyre("Request slot was empty after dispatch")?;

    Ok(AssistOutput {
        feature: payload.feature_id(),
        response,
    })
}

/// Send `payload` through `slot`, refusing if the slot is still loading.
pub async fn dispatch<P: AiProvider>(
    provider: &P,
    slot: &mut RequestSlot<ProviderOutput>,
    payload: &RequestPayload,
) -> Result<(), RequestError> {
    let ticket = slot.begin()?;
    log::info!("Dispatching {} request", payload.feature_id());

    let result = provider.generate(payload).await;
    if let Err(e) = &result {
        log::warn!("Provider request failed: {}", e);
    }

    if !slot.resolve(ticket, result) {
        log::debug!("Discarded stale {} response", payload.feature_id());
    }

    Ok(())
}

/// Build the request from a bare feature id and input, for MCP reuse.
pub fn build_payload(
    feature: &str,
    input: &str,
    extra: &ExtraOptions,
) -> Result<RequestPayload> {
    let feature: FeatureKind = feature.parse()?;
    Ok(build(feature, input, Some(extra))?)
}

fn read_input(options: &AskOptions) -> Result<String> {
    if let Some(input) = &options.input {
        return Ok(input.clone());
    }

    if let Some(path) = &options.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file '{}'", path.display()));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }

    let mut input = String::new();
    stdin
        .read_to_string(&mut input)
        .context("Failed to read input from stdin")?;
    Ok(input)
}
