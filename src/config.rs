//! Configuration for the summary service.
//!
//! Every knob lives in [`ServiceConfig`], built through its
//! [`ServiceConfigBuilder`]. The binary maps CLI flags and environment
//! variables onto the builder; tests build configs directly.

use crate::error::SummaryError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Upload ceiling applied when nothing else is configured: 500 KB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 500 * 1024;

/// Transport-level cap on a whole request body: 16 MiB.
pub const DEFAULT_REQUEST_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Model used when `IA_GENERATIVE_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Configuration for the PDF summary pipeline and its HTTP surface.
///
/// # Example
/// ```rust
/// use pdf_summary::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .ocr_dpi(200)
///     .model("gemini-1.5-flash")
///     .build()
///     .unwrap();
/// assert_eq!(config.max_upload_bytes, 500 * 1024);
/// ```
#[derive(Clone)]
pub struct ServiceConfig {
    /// Largest accepted upload in bytes. Default: 500 KB.
    pub max_upload_bytes: usize,

    /// Transport-level cap on a whole request body. Default: 16 MiB.
    ///
    /// Bodies past this cap are still reported as the upload size error;
    /// the cap only bounds how much a client can make the server read.
    pub request_body_limit: usize,

    /// Rasterisation DPI for OCR. Range: 72–600. Default: 300.
    pub ocr_dpi: u32,

    /// Longest edge of a rendered page in pixels. Default: 7000.
    ///
    /// An A4 page at 300 DPI is 2480 × 3508 px; the cap only bites on
    /// posters and other oversized pages.
    pub max_rendered_pixels: u32,

    /// Tesseract language spec. Default: `spa+eng`.
    pub ocr_languages: String,

    /// Tesseract executable. Default: `tesseract` (looked up on PATH).
    pub tesseract_cmd: PathBuf,

    /// pdfium library file or directory. If None, tries `./` then the system.
    pub pdfium_lib_path: Option<PathBuf>,

    /// LLM provider name passed to edgequake-llm. Default: `gemini`.
    pub provider_name: String,

    /// LLM model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_body_limit: DEFAULT_REQUEST_BODY_LIMIT,
            ocr_dpi: 300,
            max_rendered_pixels: 7000,
            ocr_languages: "spa+eng".to_string(),
            tesseract_cmd: PathBuf::from("tesseract"),
            pdfium_lib_path: None,
            provider_name: "gemini".to_string(),
            model: DEFAULT_MODEL.to_string(),
            provider: None,
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("request_body_limit", &self.request_body_limit)
            .field("ocr_dpi", &self.ocr_dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("ocr_languages", &self.ocr_languages)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .finish()
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// The upload ceiling in whole kilobytes, as shown to users.
    pub fn max_upload_kb(&self) -> usize {
        self.max_upload_bytes / 1024
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    pub fn max_upload_kb(self, kb: usize) -> Self {
        self.max_upload_bytes(kb.saturating_mul(1024))
    }

    pub fn request_body_limit(mut self, bytes: usize) -> Self {
        self.config.request_body_limit = bytes;
        self
    }

    pub fn ocr_dpi(mut self, dpi: u32) -> Self {
        self.config.ocr_dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        // pdfium takes pixel sizes as i32.
        self.config.max_rendered_pixels = px.clamp(100, i32::MAX as u32);
        self
    }

    pub fn ocr_languages(mut self, langs: impl Into<String>) -> Self {
        self.config.ocr_languages = langs.into();
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, SummaryError> {
        let c = &self.config;
        if c.max_upload_bytes == 0 {
            return Err(SummaryError::InvalidConfig(
                "Upload limit must be at least 1 byte".into(),
            ));
        }
        if c.request_body_limit < c.max_upload_bytes {
            return Err(SummaryError::InvalidConfig(format!(
                "Request body limit ({}) must not be below the upload limit ({})",
                c.request_body_limit, c.max_upload_bytes
            )));
        }
        if c.ocr_dpi < 72 || c.ocr_dpi > 600 {
            return Err(SummaryError::InvalidConfig(format!(
                "OCR DPI must be 72–600, got {}",
                c.ocr_dpi
            )));
        }
        if c.ocr_languages.trim().is_empty() {
            return Err(SummaryError::InvalidConfig(
                "OCR languages must not be empty".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(SummaryError::InvalidConfig("Model must not be empty".into()));
        }
        Ok(self.config)
    }
}
