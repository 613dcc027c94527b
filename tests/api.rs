//! HTTP-level tests for the form and JSON endpoints.
//!
//! pdfium, Tesseract and the model are replaced by in-process fakes, so
//! these run everywhere without native libraries or network access.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use futures::future::BoxFuture;
use image::DynamicImage;
use pdf_summary::{
    web, OcrEngine, OcrError, PdfBackend, ServiceConfig, Summarize, SummaryError, SummaryService,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Fakes ────────────────────────────────────────────────────────────────────

/// A document with fixed per-page text; counts how often it is opened.
#[derive(Default)]
struct FakePdf {
    pages: Vec<&'static str>,
    opened: AtomicUsize,
    rasterized: AtomicUsize,
}

impl FakePdf {
    fn with_pages(pages: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            pages,
            ..Default::default()
        })
    }
}

impl PdfBackend for FakePdf {
    fn page_texts(&self, _pdf: &[u8]) -> Result<Vec<String>, SummaryError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages.iter().map(|s| s.to_string()).collect())
    }

    fn rasterize(&self, _: &[u8], _: u32, _: u32) -> Result<Vec<DynamicImage>, SummaryError> {
        self.rasterized.fetch_add(1, Ordering::SeqCst);
        // Page index encoded in the image width so the OCR fake can tell pages apart.
        Ok((1..=self.pages.len() as u32)
            .map(|n| DynamicImage::new_luma8(n, 1))
            .collect())
    }
}

#[derive(Default)]
struct FakeOcr {
    calls: AtomicUsize,
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("scanned {}", image.width()))
    }
}

/// Records the text it was given and returns a canned summary or error.
#[derive(Default)]
struct FakeModel {
    seen: Mutex<Vec<String>>,
    fail_with: Option<&'static str>,
}

impl Summarize for FakeModel {
    fn summarize<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String, SummaryError>> {
        Box::pin(async move {
            self.seen.lock().unwrap().push(text.to_string());
            match self.fail_with {
                Some(msg) => Err(SummaryError::Summarizer {
                    message: msg.to_string(),
                }),
                None => Ok("A short summary.".to_string()),
            }
        })
    }
}

struct Harness {
    server: TestServer,
    pdf: Arc<FakePdf>,
    ocr: Arc<FakeOcr>,
    model: Arc<FakeModel>,
}

fn harness_with(pdf: Arc<FakePdf>, model: FakeModel) -> Harness {
    harness_with_config(ServiceConfig::default(), pdf, model)
}

fn harness_with_config(config: ServiceConfig, pdf: Arc<FakePdf>, model: FakeModel) -> Harness {
    let ocr = Arc::new(FakeOcr::default());
    let model = Arc::new(model);
    let service = SummaryService::new(
        config,
        pdf.clone(),
        ocr.clone(),
        model.clone(),
    );
    let app = web::router(service).expect("templates load");
    Harness {
        server: TestServer::new(app).expect("test server"),
        pdf,
        ocr,
        model,
    }
}

fn harness(pages: Vec<&'static str>) -> Harness {
    harness_with(FakePdf::with_pages(pages), FakeModel::default())
}

fn upload(name: &str, mime: &str, bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes).file_name(name).mime_type(mime),
    )
}

fn pdf_form(bytes: usize) -> MultipartForm {
    upload("report.pdf", "application/pdf", vec![b'%'; bytes])
}

// ── JSON API ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn api_summarises_selectable_text_without_ocr() {
    let h = harness(vec!["First page.", "Second page."]);

    let res = h.server.post("/api/resumen_pdf/").multipart(pdf_form(1024)).await;

    res.assert_status_ok();
    let body: Value = res.json();
    let expected = "--- Page 1 (selectable text) ---\nFirst page.\n\n\
                    --- Page 2 (selectable text) ---\nSecond page.\n\n";
    assert_eq!(body["filename"], "report.pdf");
    assert_eq!(body["summary"], "A short summary.");
    assert_eq!(body["extracted_text_length"], expected.chars().count());

    assert_eq!(h.ocr.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.pdf.rasterized.load(Ordering::SeqCst), 0);
    assert_eq!(h.model.seen.lock().unwrap().as_slice(), [expected.to_string()]);
}

#[tokio::test]
async fn api_runs_ocr_on_every_page_when_one_is_textless() {
    let h = harness(vec!["Typed cover.", "", "Typed appendix."]);

    let res = h.server.post("/api/resumen_pdf/").multipart(pdf_form(2048)).await;

    res.assert_status_ok();
    assert_eq!(h.ocr.calls.load(Ordering::SeqCst), 3);

    let sent = h.model.seen.lock().unwrap()[0].clone();
    let expected = "--- Page 1 (selectable text) ---\nTyped cover.\n\n\
                    --- Page 3 (selectable text) ---\nTyped appendix.\n\n\
                    --- Page 1 (OCR) ---\nscanned 1\n\n\
                    --- Page 2 (OCR) ---\nscanned 2\n\n\
                    --- Page 3 (OCR) ---\nscanned 3\n\n";
    assert_eq!(sent, expected);

    let body: Value = res.json();
    assert_eq!(body["extracted_text_length"], expected.chars().count());
}

#[tokio::test]
async fn api_rejects_non_pdf_before_reading_it() {
    let h = harness(vec!["text"]);

    let res = h
        .server
        .post("/api/resumen_pdf/")
        .multipart(upload("notes.txt", "text/plain", b"plain text".to_vec()))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["detail"], "The file must be a PDF.");
    assert_eq!(h.pdf.opened.load(Ordering::SeqCst), 0);
    assert!(h.model.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn api_rejects_upload_over_limit() {
    let h = harness(vec!["text"]);

    let res = h
        .server
        .post("/api/resumen_pdf/")
        .multipart(pdf_form(500 * 1024 + 1))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["detail"], "The file size exceeds the 500 KB limit.");
    assert_eq!(h.pdf.opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn api_body_cut_off_by_transport_limit_reports_size_error() {
    let config = ServiceConfig::builder()
        .max_upload_bytes(1024)
        .request_body_limit(2048)
        .build()
        .unwrap();
    let h = harness_with_config(config, FakePdf::with_pages(vec!["text"]), FakeModel::default());

    // The padding field alone overruns the body limit before `file` is reached.
    let form = MultipartForm::new()
        .add_text("padding", "x".repeat(8000))
        .add_part(
            "file",
            Part::bytes(vec![b'%'; 16])
                .file_name("small.pdf")
                .mime_type("application/pdf"),
        );
    let res = h.server.post("/api/resumen_pdf/").multipart(form).await;

    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["detail"], "The file size exceeds the 1 KB limit.");
    assert_eq!(h.pdf.opened.load(Ordering::SeqCst), 0);
    assert!(h.model.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn api_accepts_upload_exactly_at_limit() {
    let h = harness(vec!["text"]);

    let res = h
        .server
        .post("/api/resumen_pdf/")
        .multipart(pdf_form(500 * 1024))
        .await;

    res.assert_status_ok();
}

#[tokio::test]
async fn api_without_file_field_is_bad_request() {
    let h = harness(vec!["text"]);

    let form = MultipartForm::new().add_text("comment", "forgot the file");
    let res = h.server.post("/api/resumen_pdf/").multipart(form).await;

    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["detail"], "No file was uploaded.");
}

#[tokio::test]
async fn api_reports_model_failure_as_server_error() {
    let h = harness_with(
        FakePdf::with_pages(vec!["text"]),
        FakeModel {
            fail_with: Some("quota exceeded"),
            ..Default::default()
        },
    );

    let res = h.server.post("/api/resumen_pdf/").multipart(pdf_form(64)).await;

    res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json();
    let detail = body["detail"].as_str().unwrap();
    assert!(
        detail.starts_with("Error communicating with the language model API"),
        "got: {detail}"
    );
    assert!(detail.contains("quota exceeded"), "got: {detail}");
}

// ── HTML form ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn index_serves_upload_form() {
    let h = harness(vec![]);

    let res = h.server.get("/").await;

    res.assert_status_ok();
    let html = res.text();
    assert!(html.contains(r#"name="file""#));
    assert!(html.contains("500 KB"));
    assert!(!html.contains(r#"class="summary""#));
    assert!(!html.contains(r#"class="error""#));
}

#[tokio::test]
async fn form_shows_summary_on_success() {
    let h = harness(vec!["Some text."]);

    let res = h.server.post("/resumen_pdf/").multipart(pdf_form(128)).await;

    res.assert_status_ok();
    let html = res.text();
    assert!(html.contains("A short summary."));
    assert!(!html.contains(r#"class="error""#));
}

#[tokio::test]
async fn form_shows_errors_with_ok_status() {
    let h = harness(vec!["text"]);

    let res = h
        .server
        .post("/resumen_pdf/")
        .multipart(upload("photo.png", "image/png", vec![0u8; 16]))
        .await;

    res.assert_status_ok();
    let html = res.text();
    assert!(html.contains(r#"class="error""#));
    assert!(html.contains("The file must be a PDF."));
    assert!(h.model.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn form_shows_model_failure_with_ok_status() {
    let h = harness_with(
        FakePdf::with_pages(vec!["text"]),
        FakeModel {
            fail_with: Some("backend unavailable"),
            ..Default::default()
        },
    );

    let res = h.server.post("/resumen_pdf/").multipart(pdf_form(64)).await;

    res.assert_status_ok();
    assert!(res.text().contains("backend unavailable"));
}
