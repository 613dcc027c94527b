use crate::error::SummaryError;
use crate::pipeline::intake::{self, UploadedDocument};
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

/// Name of the form field carrying the PDF.
pub const FILE_FIELD: &str = "file";

/// Read the `file` field of a multipart upload.
///
/// The content type is checked from the part headers before any of the body
/// is read, and buffering stops as soon as the body passes `max_bytes`.
/// Other fields are read and discarded.
pub async fn read_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<UploadedDocument, SummaryError> {
    let map_err = |e: MultipartError| multipart_error(e, max_bytes);

    while let Some(mut field) = multipart.next_field().await.map_err(map_err)? {
        if field.name() != Some(FILE_FIELD) {
            while field.chunk().await.map_err(map_err)?.is_some() {}
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        let content_type = field.content_type().map(str::to_string);
        intake::check_content_type(content_type.as_deref())?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(map_err)? {
            data.extend_from_slice(&chunk);
            intake::check_size(data.len(), max_bytes)?;
        }

        return Ok(UploadedDocument::new(filename, content_type, data));
    }

    Err(SummaryError::MissingFile)
}

/// A body cut off by the transport limit is still an oversized upload.
fn multipart_error(e: MultipartError, max_bytes: usize) -> SummaryError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        SummaryError::FileTooLarge {
            limit_kb: max_bytes / 1024,
        }
    } else {
        SummaryError::MalformedUpload(e.body_text())
    }
}
