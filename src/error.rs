//! Error types for the pdf-summary library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`SummaryError`] (**fatal**): the request cannot produce a summary
//!   (wrong content type, oversized upload, OCR engine missing, model API
//!   down). Exactly one is reported per request, and each variant knows the
//!   HTTP status it is reported with.
//!
//! * [`PageError`] (**non-fatal**): OCR failed on a single page. It is stored
//!   on the [`crate::output::PageText`] for that page and rendered as an
//!   inline marker, so one unreadable page never costs the whole document.

use thiserror::Error;

/// All fatal errors returned by the pdf-summary library.
#[derive(Debug, Error)]
pub enum SummaryError {
    // ── Intake errors ─────────────────────────────────────────────────────
    /// Declared content type is not `application/pdf`.
    #[error("The file must be a PDF.")]
    InvalidContentType { declared: Option<String> },

    /// Upload exceeds the configured ceiling.
    #[error("The file size exceeds the {limit_kb} KB limit.")]
    FileTooLarge { limit_kb: usize },

    /// The multipart form carried no `file` field.
    #[error("No file was uploaded.")]
    MissingFile,

    /// The multipart body could not be read.
    #[error("Could not read the uploaded form: {0}")]
    MalformedUpload(String),

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not parse the document.
    #[error("Internal server error while processing the PDF: {detail}")]
    CorruptPdf { detail: String },

    /// pdfium returned an error while rendering a page for OCR.
    #[error("Internal server error while processing the PDF: rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Internal server error while processing the PDF: failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR executable could not be started at all.
    #[error("The Tesseract OCR engine is not installed or was not found in PATH (tried '{command}'). Please install it.")]
    OcrEngineNotFound { command: String },

    /// Neither selectable text nor OCR produced anything.
    #[error("Could not extract text from the document.")]
    NoExtractableText,

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider could not be created (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The model API call failed or returned nothing usable.
    #[error("Error communicating with the language model API: {message}")]
    Summarizer { message: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal server error while processing the PDF: {0}")]
    Internal(String),
}

impl SummaryError {
    /// True for errors caused by the request itself rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SummaryError::InvalidContentType { .. }
                | SummaryError::FileTooLarge { .. }
                | SummaryError::MissingFile
                | SummaryError::MalformedUpload(_)
        )
    }
}

/// A non-fatal OCR failure for a single page.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The OCR engine ran but failed on this page.
    #[error("Page {page}: OCR failed: {detail}")]
    OcrFailed { page: usize, detail: String },
}

/// Failure reported by an [`crate::pipeline::ocr::OcrEngine`] for one image.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The engine binary is missing; every page would fail the same way.
    #[error("OCR engine '{command}' not found")]
    EngineNotFound { command: String },

    /// The engine ran and reported an error for this image.
    #[error("{0}")]
    Failed(String),
}
