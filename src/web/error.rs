use crate::error::SummaryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

/// JSON error body returned by the API endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// A [`SummaryError`] on its way out of the JSON API.
#[derive(Debug)]
pub struct ApiError(pub SummaryError);

impl From<SummaryError> for ApiError {
    fn from(e: SummaryError) -> Self {
        Self(e)
    }
}

/// HTTP status a pipeline error is reported with.
pub fn status_code(error: &SummaryError) -> StatusCode {
    if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Log a pipeline error at a level matching who caused it.
pub fn log_error(error: &SummaryError) {
    match error {
        SummaryError::InvalidContentType { .. }
        | SummaryError::FileTooLarge { .. }
        | SummaryError::MissingFile
        | SummaryError::MalformedUpload(_) => {
            tracing::debug!("Client error: {}", error);
        }
        SummaryError::NoExtractableText => {
            tracing::info!("Document yielded no text: {}", error);
        }
        SummaryError::Summarizer { .. } => {
            tracing::warn!("Summariser error: {}", error);
        }
        _ => {
            tracing::error!("Internal service error: {:#}", error);
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log_error(&self.0);
        let status = status_code(&self.0);
        (
            status,
            Json(ErrorBody {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
