//! HTTP surface: an HTML upload form and a JSON API over the same pipeline.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | upload form |
//! | `POST /resumen_pdf/` | form page with the summary or an error message, always 200 |
//! | `POST /api/resumen_pdf/` | `{filename, extracted_text_length, summary}` or `{"detail": …}` with 400/500 |

pub mod error;
pub mod handlers;
pub mod template;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::service::SummaryService;
use template::Templates;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub service: SummaryService,
    pub templates: Templates,
}

/// Build the router for `service`.
pub fn router(service: SummaryService) -> Result<Router, minijinja::Error> {
    let body_limit = DefaultBodyLimit::max(service.config().request_body_limit);
    let state = Arc::new(AppState {
        service,
        templates: Templates::new()?,
    });

    Ok(Router::new()
        .route("/", get(handlers::index))
        .route("/resumen_pdf/", post(handlers::summarize_form))
        .route("/api/resumen_pdf/", post(handlers::summarize_api))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
