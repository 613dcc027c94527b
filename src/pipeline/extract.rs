//! Text extraction with OCR fallback.
//!
//! Rules, applied to the whole document:
//!
//! 1. Pull the embedded text of every page. Pages whose text is blank after
//!    trimming contribute nothing and mark the document as a scan candidate.
//! 2. If the document is a scan candidate, or produced no text at all,
//!    rasterise **every** page and OCR it. OCR fragments are appended after
//!    the selectable ones, so pages that had text appear twice.
//! 3. A page whose OCR fails becomes an inline error marker. A missing OCR
//!    engine aborts the document instead, since every page would fail alike.
//! 4. If the final text is blank the document has no extractable text.

use crate::config::ServiceConfig;
use crate::error::{OcrError, PageError, SummaryError};
use crate::output::{ExtractedText, PageText};
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::pdf::PdfBackend;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run extraction on Tokio's blocking pool.
///
/// pdfium and the OCR engine are both blocking, CPU-heavy calls; running
/// them here keeps the async workers free while this request waits.
pub async fn extract_text(
    pdf: Arc<dyn PdfBackend>,
    ocr: Arc<dyn OcrEngine>,
    bytes: Vec<u8>,
    config: &ServiceConfig,
) -> Result<ExtractedText, SummaryError> {
    let dpi = config.ocr_dpi;
    let max_pixels = config.max_rendered_pixels;

    tokio::task::spawn_blocking(move || {
        extract_text_blocking(pdf.as_ref(), ocr.as_ref(), &bytes, dpi, max_pixels)
    })
    .await
    .map_err(|e| SummaryError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of the extraction rules.
pub fn extract_text_blocking(
    pdf: &dyn PdfBackend,
    ocr: &dyn OcrEngine,
    bytes: &[u8],
    dpi: u32,
    max_pixels: u32,
) -> Result<ExtractedText, SummaryError> {
    let page_texts = pdf.page_texts(bytes)?;
    let total_pages = page_texts.len();

    let mut extracted = ExtractedText::default();
    let mut scan_candidate = false;

    for (idx, text) in page_texts.into_iter().enumerate() {
        if text.trim().is_empty() {
            debug!("Page {}: no selectable text", idx + 1);
            scan_candidate = true;
        } else {
            extracted.fragments.push(PageText::selectable(idx + 1, text));
        }
    }

    if scan_candidate || extracted.is_blank() {
        info!(
            "Running OCR on all {} pages ({} had selectable text)",
            total_pages,
            extracted.fragments.len()
        );
        extracted.used_ocr = true;
        run_ocr(pdf, ocr, bytes, dpi, max_pixels, &mut extracted)?;
    }

    if extracted.is_blank() {
        return Err(SummaryError::NoExtractableText);
    }

    info!(
        "Extracted {} fragments from {} pages (ocr: {}, failed pages: {})",
        extracted.fragments.len(),
        total_pages,
        extracted.used_ocr,
        extracted.failed_pages()
    );
    Ok(extracted)
}

fn run_ocr(
    pdf: &dyn PdfBackend,
    ocr: &dyn OcrEngine,
    bytes: &[u8],
    dpi: u32,
    max_pixels: u32,
    extracted: &mut ExtractedText,
) -> Result<(), SummaryError> {
    let images = pdf.rasterize(bytes, dpi, max_pixels)?;

    for (idx, image) in images.iter().enumerate() {
        let page_num = idx + 1;
        match ocr.recognize(image) {
            Ok(text) => extracted.fragments.push(PageText::ocr(page_num, text)),
            Err(OcrError::EngineNotFound { command }) => {
                return Err(SummaryError::OcrEngineNotFound { command });
            }
            Err(OcrError::Failed(detail)) => {
                warn!("Page {}: OCR failed: {}", page_num, detail);
                extracted
                    .fragments
                    .push(PageText::ocr_failed(PageError::OcrFailed {
                        page: page_num,
                        detail,
                    }));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TextSource;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Pages given as embedded text; rasterising yields one blank image per page.
    struct FakePdf {
        texts: Vec<&'static str>,
        rasterize_calls: AtomicUsize,
    }

    impl FakePdf {
        fn new(texts: Vec<&'static str>) -> Self {
            Self {
                texts,
                rasterize_calls: AtomicUsize::new(0),
            }
        }
    }

    impl PdfBackend for FakePdf {
        fn page_texts(&self, _pdf: &[u8]) -> Result<Vec<String>, SummaryError> {
            Ok(self.texts.iter().map(|t| t.to_string()).collect())
        }

        fn rasterize(
            &self,
            _pdf: &[u8],
            _dpi: u32,
            _max_pixels: u32,
        ) -> Result<Vec<DynamicImage>, SummaryError> {
            self.rasterize_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .texts
                .iter()
                .map(|_| DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([255; 4]))))
                .collect())
        }
    }

    /// Replays scripted results, one per page.
    struct ScriptedOcr {
        results: Mutex<Vec<Result<String, OcrError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedOcr {
        fn new(mut results: Vec<Result<String, OcrError>>) -> Self {
            results.reverse();
            Self {
                results: Mutex::new(results),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl OcrEngine for ScriptedOcr {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("ocr text".to_string()))
        }
    }

    fn run(pdf: &FakePdf, ocr: &ScriptedOcr) -> Result<ExtractedText, SummaryError> {
        extract_text_blocking(pdf, ocr, b"%PDF-1.7", 300, 7000)
    }

    #[test]
    fn fully_selectable_document_skips_ocr() {
        let pdf = FakePdf::new(vec!["first page", "second page"]);
        let ocr = ScriptedOcr::new(vec![]);
        let out = run(&pdf, &ocr).unwrap();

        assert!(!out.used_ocr);
        assert_eq!(pdf.rasterize_calls.load(Ordering::SeqCst), 0);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
        assert_eq!(out.fragments.len(), 2);
        assert!(out.fragments.iter().all(|f| f.source == TextSource::Selectable));
    }

    #[test]
    fn one_textless_page_triggers_ocr_on_every_page() {
        let pdf = FakePdf::new(vec!["intro", "", "outro"]);
        let ocr = ScriptedOcr::new(vec![
            Ok("o1".into()),
            Ok("o2".into()),
            Ok("o3".into()),
        ]);
        let out = run(&pdf, &ocr).unwrap();

        assert!(out.used_ocr);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 3);
        let layout: Vec<(usize, TextSource)> =
            out.fragments.iter().map(|f| (f.page_num, f.source)).collect();
        assert_eq!(
            layout,
            vec![
                (1, TextSource::Selectable),
                (3, TextSource::Selectable),
                (1, TextSource::Ocr),
                (2, TextSource::Ocr),
                (3, TextSource::Ocr),
            ]
        );
    }

    #[test]
    fn whitespace_only_page_counts_as_textless() {
        let pdf = FakePdf::new(vec!["body", "  \n\t "]);
        let ocr = ScriptedOcr::new(vec![]);
        let out = run(&pdf, &ocr).unwrap();
        assert!(out.used_ocr);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn per_page_ocr_failure_becomes_marker() {
        let pdf = FakePdf::new(vec!["", ""]);
        let ocr = ScriptedOcr::new(vec![
            Err(OcrError::Failed("corrupt image".into())),
            Ok("page two".into()),
        ]);
        let out = run(&pdf, &ocr).unwrap();

        assert_eq!(out.failed_pages(), 1);
        let text = out.to_text();
        assert!(text.contains("--- Error processing page 1 ---"), "{text}");
        assert!(text.contains("--- Page 2 (OCR) ---\npage two"), "{text}");
    }

    #[test]
    fn missing_engine_aborts_document() {
        let pdf = FakePdf::new(vec!["", ""]);
        let ocr = ScriptedOcr::new(vec![Err(OcrError::EngineNotFound {
            command: "tesseract".into(),
        })]);
        let err = run(&pdf, &ocr).unwrap_err();
        assert!(matches!(err, SummaryError::OcrEngineNotFound { .. }));
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn blank_ocr_output_still_carries_page_header() {
        let pdf = FakePdf::new(vec![""]);
        let ocr = ScriptedOcr::new(vec![Ok("   \n".into())]);
        let out = run(&pdf, &ocr).unwrap();
        assert!(out.to_text().starts_with("--- Page 1 (OCR) ---"));
    }

    #[test]
    fn empty_document_has_no_extractable_text() {
        let pdf = FakePdf::new(vec![]);
        let ocr = ScriptedOcr::new(vec![]);
        let err = run(&pdf, &ocr).unwrap_err();
        assert!(matches!(err, SummaryError::NoExtractableText));
        assert_eq!(pdf.rasterize_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn async_wrapper_runs_on_blocking_pool() {
        let pdf: Arc<dyn PdfBackend> = Arc::new(FakePdf::new(vec!["hello"]));
        let ocr: Arc<dyn OcrEngine> = Arc::new(ScriptedOcr::new(vec![]));
        let out = extract_text(pdf, ocr, b"%PDF".to_vec(), &ServiceConfig::default())
            .await
            .unwrap();
        assert_eq!(out.to_text(), "--- Page 1 (selectable text) ---\nhello\n\n");
    }
}
