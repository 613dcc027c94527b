//! # pdf-summary
//!
//! Upload a PDF, extract its text, and get a summary from a generative
//! language model, through an HTML form or a JSON API.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Intake   content type must be application/pdf, size ≤ 500 KB
//!  ├─ 2. Extract  embedded text per page via pdfium (spawn_blocking)
//!  ├─ 3. OCR      any textless page ⇒ rasterise all pages, tesseract spa+eng
//!  ├─ 4. Summary  one prompt wrapping the full text → Gemini (edgequake-llm)
//!  └─ 5. Present  HTML page or {filename, extracted_text_length, summary}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_summary::{web, ServiceConfig, SummaryService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY from the environment.
//!     let service = SummaryService::from_config(ServiceConfig::default())?;
//!     let app = web::router(service)?;
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-summary` server binary (clap + anyhow + dotenvy + tracing-subscriber) |
//!
//! ## Runtime requirements
//!
//! * a pdfium shared library (`PDFIUM_LIB_PATH`, `./`, or system paths)
//! * the `tesseract` executable with the `spa` and `eng` language packs
//! * an API key for the model provider (`GEMINI_API_KEY`)

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod service;
pub mod web;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ServiceConfig, ServiceConfigBuilder, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL,
    DEFAULT_REQUEST_BODY_LIMIT,
};
pub use error::{OcrError, PageError, SummaryError};
pub use output::{ExtractedText, PageText, SummaryResult, TextSource};
pub use pipeline::intake::UploadedDocument;
pub use pipeline::ocr::{OcrEngine, TesseractEngine};
pub use pipeline::pdf::{PdfBackend, PdfiumBackend};
pub use pipeline::summarize::{LlmSummarizer, Summarize};
pub use service::SummaryService;
