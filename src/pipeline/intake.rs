//! Intake: the uploaded document and the checks it must pass.
//!
//! Only two things are checked, in this order: the declared content type
//! must be exactly `application/pdf`, and the body must not exceed the
//! configured ceiling. The bytes themselves are not inspected here; a
//! mislabelled or corrupt file fails later, when pdfium opens it.

use crate::error::SummaryError;
use tracing::debug;

/// The only content type accepted for uploads.
pub const PDF_MIME: &str = "application/pdf";

/// A file received in one request. Dropped when the request completes.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    /// Content type declared by the client, if any.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data: data.into(),
        }
    }
}

/// Reject anything whose declared type is not exactly `application/pdf`.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), SummaryError> {
    if content_type == Some(PDF_MIME) {
        Ok(())
    } else {
        debug!("Rejected upload with content type {:?}", content_type);
        Err(SummaryError::InvalidContentType {
            declared: content_type.map(str::to_string),
        })
    }
}

/// Reject bodies longer than `max_bytes`.
pub fn check_size(len: usize, max_bytes: usize) -> Result<(), SummaryError> {
    if len > max_bytes {
        debug!("Rejected upload of {} bytes (limit {})", len, max_bytes);
        Err(SummaryError::FileTooLarge {
            limit_kb: max_bytes / 1024,
        })
    } else {
        Ok(())
    }
}

/// Run both intake checks on a complete upload.
pub fn validate(doc: &UploadedDocument, max_bytes: usize) -> Result<(), SummaryError> {
    check_content_type(doc.content_type.as_deref())?;
    check_size(doc.data.len(), max_bytes)
}
