use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::response::{Html, Json};
use std::sync::Arc;

use crate::error::SummaryError;
use crate::output::SummaryResult;
use crate::web::error::{log_error, ApiError};
use crate::web::upload::read_upload;
use crate::web::AppState;

/// `GET /`: the empty upload form.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    state
        .templates
        .index_or_fallback(None, None, state.service.config().max_upload_kb())
}

/// `POST /resumen_pdf/`: always 200, with the summary or the error on the page.
pub async fn summarize_form(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Html<String> {
    let max_kb = state.service.config().max_upload_kb();
    match run(&state, multipart).await {
        Ok(result) => state
            .templates
            .index_or_fallback(Some(result.summary.as_str()), None, max_kb),
        Err(e) => {
            log_error(&e);
            let message = e.to_string();
            state
                .templates
                .index_or_fallback(None, Some(message.as_str()), max_kb)
        }
    }
}

/// `POST /api/resumen_pdf/`: JSON result, or an error status with `{"detail": …}`.
pub async fn summarize_api(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryResult>, ApiError> {
    Ok(Json(run(&state, multipart).await?))
}

async fn run(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<SummaryResult, SummaryError> {
    let multipart = multipart.map_err(|e| SummaryError::MalformedUpload(e.body_text()))?;
    let doc = read_upload(multipart, state.service.config().max_upload_bytes).await?;
    state.service.summarize(doc).await
}
