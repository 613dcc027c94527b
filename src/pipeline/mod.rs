//! Pipeline stages for summarising an uploaded PDF.
//!
//! Each submodule implements exactly one step, and the stages that touch
//! external libraries sit behind a trait so they can be swapped in tests.
//!
//! ## Data Flow
//!
//! ```text
//! intake ──▶ pdf ──▶ (ocr) ──▶ extract ──▶ summarize
//! (checks)  (pdfium) (tesseract) (rules)   (LLM)
//! ```
//!
//! 1. [`intake`] content-type and size checks on the upload
//! 2. [`pdf`] embedded page text and page rasterisation via pdfium
//! 3. [`encode`] PNG-encode rendered pages for the OCR engine
//! 4. [`ocr`] Tesseract, one process per page
//! 5. [`extract`] decide when OCR runs and assemble the page fragments
//! 6. [`summarize`] one prompt, one completion; the only network I/O

pub mod encode;
pub mod extract;
pub mod intake;
pub mod ocr;
pub mod pdf;
pub mod summarize;
