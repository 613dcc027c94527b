//! Result types produced by the pipeline.

use crate::error::PageError;
use serde::{Deserialize, Serialize};

/// Where a page's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// Embedded text pulled from the content stream.
    Selectable,
    /// Text recognised from the rasterised page.
    Ocr,
    /// OCR was attempted and failed; the fragment is an error marker.
    OcrFailed,
}

/// Text of one page from one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed).
    pub page_num: usize,
    pub source: TextSource,
    /// Empty for [`TextSource::OcrFailed`].
    pub text: String,
    /// Set only for [`TextSource::OcrFailed`].
    pub error: Option<PageError>,
}

impl PageText {
    pub fn selectable(page_num: usize, text: impl Into<String>) -> Self {
        Self {
            page_num,
            source: TextSource::Selectable,
            text: text.into(),
            error: None,
        }
    }

    pub fn ocr(page_num: usize, text: impl Into<String>) -> Self {
        Self {
            page_num,
            source: TextSource::Ocr,
            text: text.into(),
            error: None,
        }
    }

    pub fn ocr_failed(error: PageError) -> Self {
        let PageError::OcrFailed { page: page_num, .. } = error;
        Self {
            page_num,
            source: TextSource::OcrFailed,
            text: String::new(),
            error: Some(error),
        }
    }

    /// Render the fragment with its page header, as sent to the model.
    pub fn render(&self) -> String {
        match self.source {
            TextSource::Selectable => format!(
                "--- Page {} (selectable text) ---\n{}\n\n",
                self.page_num, self.text
            ),
            TextSource::Ocr => format!("--- Page {} (OCR) ---\n{}\n\n", self.page_num, self.text),
            TextSource::OcrFailed => format!("--- Error processing page {} ---\n\n", self.page_num),
        }
    }
}

/// All text pulled from one document, in output order.
///
/// When OCR runs it appends a fragment for every page after the selectable
/// fragments, so a page number can appear twice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedText {
    pub fragments: Vec<PageText>,
    /// Whether the OCR fallback ran for this document.
    pub used_ocr: bool,
}

impl ExtractedText {
    /// Concatenate every fragment into the text sent to the model.
    pub fn to_text(&self) -> String {
        self.fragments.iter().map(PageText::render).collect()
    }

    /// True when the concatenated text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.to_text().trim().is_empty()
    }

    /// Number of pages whose OCR failed.
    pub fn failed_pages(&self) -> usize {
        self.fragments
            .iter()
            .filter(|f| f.source == TextSource::OcrFailed)
            .count()
    }
}

/// A finished summary, as returned by the JSON endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Name of the uploaded file, as declared by the client.
    pub filename: String,
    /// Length in characters of the text sent to the model.
    pub extracted_text_length: usize,
    pub summary: String,
}
