//! The summary pipeline as one entry point.
//!
//! ```text
//! upload ──▶ intake ──▶ extract (pdfium, OCR fallback) ──▶ summarize (LLM)
//! ```
//!
//! [`SummaryService`] owns the three collaborators behind trait objects so
//! the HTTP layer and the tests drive exactly the same code path.

use crate::config::ServiceConfig;
use crate::error::SummaryError;
use crate::output::{ExtractedText, SummaryResult};
use crate::pipeline::extract;
use crate::pipeline::intake::{self, UploadedDocument};
use crate::pipeline::ocr::{OcrEngine, TesseractEngine};
use crate::pipeline::pdf::{PdfBackend, PdfiumBackend};
use crate::pipeline::summarize::{LlmSummarizer, Summarize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Cheap to clone; every clone shares the same collaborators.
#[derive(Clone)]
pub struct SummaryService {
    config: Arc<ServiceConfig>,
    pdf: Arc<dyn PdfBackend>,
    ocr: Arc<dyn OcrEngine>,
    summarizer: Arc<dyn Summarize>,
}

impl SummaryService {
    pub fn new(
        config: ServiceConfig,
        pdf: Arc<dyn PdfBackend>,
        ocr: Arc<dyn OcrEngine>,
        summarizer: Arc<dyn Summarize>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pdf,
            ocr,
            summarizer,
        }
    }

    /// Wire pdfium, Tesseract and the configured LLM provider.
    pub fn from_config(config: ServiceConfig) -> Result<Self, SummaryError> {
        let pdf = Arc::new(PdfiumBackend::new(config.pdfium_lib_path.clone()));
        let ocr = Arc::new(TesseractEngine::from_config(&config));
        let summarizer = Arc::new(LlmSummarizer::from_config(&config)?);
        Ok(Self::new(config, pdf, ocr, summarizer))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Validate an upload and pull its text, without calling the model.
    pub async fn extract(&self, doc: UploadedDocument) -> Result<ExtractedText, SummaryError> {
        intake::validate(&doc, self.config.max_upload_bytes)?;
        extract::extract_text(
            Arc::clone(&self.pdf),
            Arc::clone(&self.ocr),
            doc.data,
            &self.config,
        )
        .await
    }

    /// Run the whole pipeline for one upload.
    pub async fn summarize(&self, doc: UploadedDocument) -> Result<SummaryResult, SummaryError> {
        let start = Instant::now();
        let filename = doc.filename.clone();
        info!("Summarising '{}' ({} bytes)", filename, doc.data.len());

        let extracted = self.extract(doc).await?;
        let text = extracted.to_text();
        let extracted_text_length = text.chars().count();

        let summary = self.summarizer.summarize(&text).await?;

        info!(
            "Summarised '{}': {} chars in, {} chars out, {}ms",
            filename,
            extracted_text_length,
            summary.chars().count(),
            start.elapsed().as_millis()
        );

        Ok(SummaryResult {
            filename,
            extracted_text_length,
            summary,
        })
    }
}
