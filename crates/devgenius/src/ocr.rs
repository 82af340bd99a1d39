use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use devgenius_core::image::{preview_data_uri, validate, ImageMeta, ImageMime};
use devgenius_core::provider::ProviderError;
use devgenius_core::response::{ImageUploadResponse, RequestSlot, ResponseState};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;

/// Turns image bytes into text.
pub trait OcrEngine {
    fn recognize(
        &self,
        bytes: Vec<u8>,
        mime: ImageMime,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

#[derive(Debug, clap::Args)]
pub struct OcrOptions {
    /// Path to a JPEG, PNG, GIF, or WebP image
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Declared MIME type (inferred from the extension when omitted)
    #[arg(long)]
    pub mime: Option<String>,

    /// Also build a base64 data URI preview
    #[arg(long)]
    pub preview: bool,

    /// Tesseract language
    #[arg(long, default_value = "eng")]
    pub lang: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// The `tesseract` executable, fed through stdin.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: PathBuf,
    lang: String,
}

impl TesseractOcr {
    pub fn locate(lang: impl Into<String>) -> Result<Self, Error> {
        let binary = which::which("tesseract").map_err(|e| {
            Error::OcrUnavailable(format!("tesseract not found on PATH ({e})"))
        })?;
        log::debug!("Using tesseract at {}", binary.display());

        Ok(Self {
            binary,
            lang: lang.into(),
        })
    }
}

impl OcrEngine for TesseractOcr {
    async fn recognize(&self, bytes: Vec<u8>, mime: ImageMime) -> Result<String, ProviderError> {
        log::info!("Running tesseract on {} bytes of {}", bytes.len(), mime);

        let mut child = tokio::process::Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", &self.lang])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProviderError::Ocr(format!("Failed to start tesseract: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ProviderError::Ocr("tesseract stdin unavailable".to_string()))?;

        // stdin is written concurrently with draining stdout
        let writer = tokio::spawn(async move {
            stdin.write_all(&bytes).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ProviderError::Ocr(e.to_string()))?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("Writing image to tesseract failed: {}", e),
            Err(e) => log::warn!("tesseract writer task failed: {}", e),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// An image whose metadata passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    pub path: PathBuf,
    pub meta: ImageMeta,
    pub mime: ImageMime,
}

/// Result of one image intake: the validated file plus independent preview
/// and OCR outcomes.
#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub meta: ImageMeta,
    pub mime: ImageMime,
    pub preview: Option<ResponseState<String>>,
    pub text: ImageUploadResponse,
}

impl IntakeOutcome {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "file": self.meta,
            "mime": self.mime.as_mime(),
            "preview": self.preview.as_ref().map(|p| p.to_json("dataUri")),
            "response": self.text.to_json("text"),
        })
    }
}

pub async fn run(options: OcrOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Image: {}", options.image.display());
        eprintln!("OCR language: {}", options.lang);
    }

    let image = validate_file(&options.image, options.mime.as_deref()).await?;
    let engine = TesseractOcr::locate(options.lang.clone())?;

    let preview = options
        .preview
        .then(|| build_preview(&image.path, image.mime));
    let outcome = intake(&engine, &image, preview).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);
        return Ok(());
    }

    if let Some(preview) = &outcome.preview {
        match preview {
            ResponseState::Ready(uri) => {
                println!("{}", "Preview".bright_white().bold());
                println!("{}\n", uri.dimmed());
            }
            ResponseState::Failed(message) => {
                eprintln!("{} {}", "Preview failed:".yellow(), message)
            }
            ResponseState::Loading => {}
        }
    }

    match &outcome.text {
        ResponseState::Ready(text) => {
            println!("{}", "Extracted Text".bright_white().bold());
            println!("{}", "-".repeat(80).bright_cyan());
            println!("{}", text);
            Ok(())
        }
        ResponseState::Failed(message) => Err(Error::RequestFailed(message.clone()).into()),
        ResponseState::Loading => Err(eyre!("OCR did not complete")),
    }
}

/// Check the image's declared type and size without reading its contents.
///
/// `declared_type` overrides the type inferred from the extension.
pub async fn validate_file(path: &Path, declared_type: Option<&str>) -> Result<ValidatedImage> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to read image '{}'", path.display()))?;

    let mut meta = ImageMeta::from_path(path, metadata.len());
    if let Some(declared) = declared_type {
        meta.declared_type = declared.to_string();
    }

    let mime = validate(&meta)?;
    log::debug!("Accepted {} ({} bytes, {})", meta.name, meta.size, mime);

    Ok(ValidatedImage {
        path: path.to_path_buf(),
        meta,
        mime,
    })
}

/// Run the preview (when given) and OCR side by side.
///
/// Each lands in its own slot; one failing leaves the other untouched.
pub async fn intake<E, P>(
    engine: &E,
    image: &ValidatedImage,
    preview: Option<P>,
) -> Result<IntakeOutcome>
where
    E: OcrEngine,
    P: Future<Output = Result<String, std::io::Error>>,
{
    let preview = async {
        let preview = preview?;
        let mut slot = RequestSlot::new();
        let ticket = slot.begin().ok()?;
        let result = preview.await;
        if let Err(e) = &result {
            log::warn!("Preview of {} failed: {}", image.meta.name, e);
        }
        if !slot.resolve(ticket, result) {
            log::debug!("Discarded stale preview of {}", image.meta.name);
        }
        slot.take()
    };

    let text = async {
        let mut slot = RequestSlot::new();
        let ticket = slot.begin()?;
        let result = match tokio::fs::read(&image.path).await {
            Ok(bytes) => engine.recognize(bytes, image.mime).await,
            Err(e) => Err(ProviderError::Ocr(format!("Failed to read image: {e}"))),
        };
        if let Err(e) = &result {
            log::warn!("OCR failed: {}", e);
        }
        if !slot.resolve(ticket, result) {
            log::debug!("Discarded stale OCR result for {}", image.meta.name);
        }
        slot.take().ok_or_eyre("OCR slot was empty after resolve")
    };

    let (preview, text) = tokio::join!(preview, text);

    Ok(IntakeOutcome {
        meta: image.meta.clone(),
        mime: image.mime,
        preview,
        text: text?,
    })
}

/// OCR only, no preview.
pub async fn extract_text<E: OcrEngine>(engine: &E, image: &ValidatedImage) -> Result<IntakeOutcome> {
    intake(engine, image, None::<std::future::Ready<Result<String, std::io::Error>>>).await
}

/// Read the image and encode it as a `data:` URI.
pub async fn build_preview(path: &Path, mime: ImageMime) -> Result<String, std::io::Error> {
    let bytes = tokio::fs::read(path).await?;
    Ok(preview_data_uri(mime, &bytes))
}
