//! PDF access: embedded text per page and page rasterisation via pdfium.
//!
//! Both operations are blocking. Callers run them inside `spawn_blocking`
//! (see [`crate::pipeline::extract::extract_text`]).
//!
//! The [`PdfBackend`] trait is the seam between the pipeline and pdfium, so
//! the extraction rules can be exercised without a pdfium library on disk.

use crate::error::SummaryError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Source of page text and page images for one PDF held in memory.
pub trait PdfBackend: Send + Sync {
    /// Embedded text of every page, in page order. Pages without a text
    /// layer come back as empty strings.
    fn page_texts(&self, pdf: &[u8]) -> Result<Vec<String>, SummaryError>;

    /// Render every page at `dpi`, capping the longest edge at `max_pixels`.
    fn rasterize(
        &self,
        pdf: &[u8],
        dpi: u32,
        max_pixels: u32,
    ) -> Result<Vec<DynamicImage>, SummaryError>;
}

/// [`PdfBackend`] backed by a dynamically loaded pdfium library.
#[derive(Debug, Clone, Default)]
pub struct PdfiumBackend {
    library_path: Option<PathBuf>,
}

impl PdfiumBackend {
    /// Use the library at `path` (a file, or a directory holding the
    /// platform library), or search `./` then the system when `None`.
    pub fn new(library_path: Option<PathBuf>) -> Self {
        Self { library_path }
    }

    /// Bind once to fail fast at startup rather than on the first upload.
    pub fn check_available(&self) -> Result<(), SummaryError> {
        self.bind().map(|_| ())
    }

    fn bind(&self) -> Result<Pdfium, SummaryError> {
        let bindings = match &self.library_path {
            Some(path) => Pdfium::bind_to_library(library_file(path)),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| SummaryError::PdfiumBindingFailed(format!("{:?}", e)))?;

        Ok(Pdfium::new(bindings))
    }
}

/// Resolve a configured path to the library file itself.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

fn open<'a>(pdfium: &'a Pdfium, pdf: &'a [u8]) -> Result<PdfDocument<'a>, SummaryError> {
    pdfium
        .load_pdf_from_byte_slice(pdf, None)
        .map_err(|e| SummaryError::CorruptPdf {
            detail: format!("{:?}", e),
        })
}

impl PdfBackend for PdfiumBackend {
    fn page_texts(&self, pdf: &[u8]) -> Result<Vec<String>, SummaryError> {
        let pdfium = self.bind()?;
        let document = open(&pdfium, pdf)?;
        let pages = document.pages();
        info!("PDF loaded: {} pages", pages.len());

        pages
            .iter()
            .enumerate()
            .map(|(idx, page)| {
                let text = page
                    .text()
                    .map_err(|e| SummaryError::CorruptPdf {
                        detail: format!("page {}: {:?}", idx + 1, e),
                    })?
                    .all();
                debug!("Page {}: {} chars of embedded text", idx + 1, text.len());
                Ok(text)
            })
            .collect()
    }

    fn rasterize(
        &self,
        pdf: &[u8],
        dpi: u32,
        max_pixels: u32,
    ) -> Result<Vec<DynamicImage>, SummaryError> {
        let pdfium = self.bind()?;
        let document = open(&pdfium, pdf)?;
        let pages = document.pages();

        let mut images = Vec::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            let target_width = target_width_px(page.width().value, dpi, max_pixels);
            let render_config = PdfRenderConfig::new()
                .set_target_width(target_width)
                .set_maximum_width(pixel_cap(max_pixels))
                .set_maximum_height(pixel_cap(max_pixels));

            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                SummaryError::RasterisationFailed {
                    page: idx + 1,
                    detail: format!("{:?}", e),
                }
            })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );
            images.push(image);
        }

        Ok(images)
    }
}

/// Pixel width of a page `width_pt` points wide rendered at `dpi`.
fn target_width_px(width_pt: f32, dpi: u32, max_pixels: u32) -> i32 {
    let px = (width_pt / 72.0 * dpi as f32).round() as i32;
    px.clamp(1, pixel_cap(max_pixels))
}

/// `max_pixels` as the i32 pdfium expects, at least 1.
fn pixel_cap(max_pixels: u32) -> i32 {
    i32::try_from(max_pixels).unwrap_or(i32::MAX).max(1)
}
