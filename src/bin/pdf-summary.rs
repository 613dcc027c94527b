//! Server binary for pdf-summary.
//!
//! Maps CLI flags and environment variables to `ServiceConfig`, checks the
//! external collaborators once, then serves the web form and JSON API.

use anyhow::{bail, Context, Result};
use clap::Parser;
use pdf_summary::{
    web, PdfiumBackend, ServiceConfig, SummaryService, TesseractEngine, DEFAULT_REQUEST_BODY_LIMIT,
};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the model provider's API key.
const API_KEY_VAR: &str = "GEMINI_API_KEY";

const AFTER_HELP: &str = r#"ENDPOINTS:
  GET  /                    upload form
  POST /resumen_pdf/        form page with summary or error (always 200)
  POST /api/resumen_pdf/    JSON {filename, extracted_text_length, summary}

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          API key for the generative model (required)
  IA_GENERATIVE_MODEL     Model ID (default: gemini-pro)
  TESSERACT_CMD           tesseract executable (default: tesseract on PATH)
  PDFIUM_LIB_PATH         pdfium library file or directory
  RUST_LOG                Log filter, overrides --verbose

  A .env file in the working directory is loaded first.

EXAMPLES:
  # Serve on 0.0.0.0:8000
  pdf-summary

  # Summarise from the command line
  curl -F 'file=@report.pdf;type=application/pdf' http://localhost:8000/api/resumen_pdf/
"#;

/// Summarise uploaded PDFs with OCR fallback and a generative model.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-summary",
    version,
    about = "Serve a web form and JSON API that summarise uploaded PDFs",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "PDF_SUMMARY_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, env = "PDF_SUMMARY_PORT", default_value_t = 8000)]
    port: u16,

    /// Model ID for summaries.
    #[arg(long, env = "IA_GENERATIVE_MODEL", default_value = pdf_summary::DEFAULT_MODEL)]
    model: String,

    /// edgequake-llm provider name.
    #[arg(long, env = "PDF_SUMMARY_PROVIDER", default_value = "gemini")]
    provider: String,

    /// Largest accepted upload, in KB.
    #[arg(long, env = "PDF_SUMMARY_MAX_UPLOAD_KB", default_value_t = 500)]
    max_upload_kb: usize,

    /// Rasterisation DPI for OCR (72–600).
    #[arg(long, env = "PDF_SUMMARY_OCR_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    ocr_dpi: u32,

    /// Tesseract language spec.
    #[arg(long, env = "PDF_SUMMARY_OCR_LANGUAGES", default_value = "spa+eng")]
    ocr_languages: String,

    /// Tesseract executable.
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    tesseract_cmd: PathBuf,

    /// pdfium library file or directory.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib_path: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_SUMMARY_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads its env fallbacks.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => {}
        _ => bail!(
            "{API_KEY_VAR} is not set.\n\
             Add it to the environment or to a .env file: {API_KEY_VAR}='your-api-key'"
        ),
    }

    let config = build_config(&cli)?;

    // ── Check external collaborators ─────────────────────────────────────
    PdfiumBackend::new(config.pdfium_lib_path.clone())
        .check_available()
        .context("PDFium is required to read PDFs")?;
    if !TesseractEngine::from_config(&config).is_available() {
        warn!("OCR fallback unavailable until tesseract is installed");
    }

    let service = SummaryService::from_config(config).context("Failed to set up the summariser")?;
    let app = web::router(service).context("Failed to load page templates")?;

    let addr = SocketAddr::new(cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

/// Map CLI args to `ServiceConfig`.
fn build_config(cli: &Cli) -> Result<ServiceConfig> {
    // The body limit must always admit a full-size upload.
    let upload_bytes = cli.max_upload_kb.saturating_mul(1024);
    let body_limit = upload_bytes.max(DEFAULT_REQUEST_BODY_LIMIT);

    let mut builder = ServiceConfig::builder()
        .model(cli.model.clone())
        .provider_name(cli.provider.clone())
        .max_upload_kb(cli.max_upload_kb)
        .request_body_limit(body_limit)
        .ocr_dpi(cli.ocr_dpi)
        .ocr_languages(cli.ocr_languages.clone())
        .tesseract_cmd(cli.tesseract_cmd.clone());

    if let Some(ref path) = cli.pdfium_lib_path {
        builder = builder.pdfium_lib_path(path.clone());
    }

    builder.build().context("Invalid configuration")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
