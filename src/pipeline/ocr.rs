//! OCR of rasterised pages through the `tesseract` executable.
//!
//! Each page is written to a temporary PNG and recognised with
//! `tesseract <png> stdout -l <languages>`. Running the executable keeps the
//! build free of a C++ toolchain dependency; the cost is one process spawn per
//! page, which is small next to recognition time at 300 DPI.

use crate::config::ServiceConfig;
use crate::error::OcrError;
use crate::pipeline::encode::encode_png;
use image::DynamicImage;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Recognises the text in one page image. Blocking.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// [`OcrEngine`] that shells out to Tesseract.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: PathBuf,
    languages: String,
}

impl TesseractEngine {
    pub fn new(command: impl Into<PathBuf>, languages: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            languages: languages.into(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.tesseract_cmd.clone(), config.ocr_languages.clone())
    }

    /// Whether `tesseract --version` can be run at all.
    pub fn is_available(&self) -> bool {
        let ok = Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok();
        if !ok {
            warn!(
                "tesseract not found at '{}' - scanned PDFs will fail until it is installed",
                self.command.display()
            );
        }
        ok
    }

    fn command_name(&self) -> String {
        self.command.display().to_string()
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let png = encode_png(image)
            .map_err(|e| OcrError::Failed(format!("image encoding failed: {}", e)))?;

        let mut file = tempfile::Builder::new()
            .prefix("pdf-summary-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Failed(format!("temp file: {}", e)))?;
        file.write_all(&png)
            .and_then(|_| file.flush())
            .map_err(|e| OcrError::Failed(format!("temp file write: {}", e)))?;

        let output = Command::new(&self.command)
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => OcrError::EngineNotFound {
                    command: self.command_name(),
                },
                _ => OcrError::Failed(format!("failed to run tesseract: {}", e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Failed(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("tesseract recognised {} chars", text.len());
        Ok(text)
    }
}
