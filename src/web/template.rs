use axum::response::Html;
use minijinja::{context, Environment};
use tracing::error;

const INDEX_NAME: &str = "index.html";
const INDEX_HTML: &str = include_str!("../../templates/index.html");
const FALLBACK_HTML: &str =
    "<!doctype html><title>PDF summary</title><p>The page could not be rendered.</p>";

/// Compiled page templates, shared by all handlers.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_NAME, INDEX_HTML)?;
        Ok(Self { env })
    }

    /// Render the upload page, optionally showing a summary or an error.
    pub fn index(
        &self,
        summary: Option<&str>,
        error_message: Option<&str>,
        max_upload_kb: usize,
    ) -> Result<Html<String>, minijinja::Error> {
        let html = self.env.get_template(INDEX_NAME)?.render(context! {
            summary => summary,
            error_message => error_message,
            max_upload_kb => max_upload_kb,
        })?;
        Ok(Html(html))
    }

    /// Like [`Templates::index`], falling back to a bare page if rendering fails.
    pub fn index_or_fallback(
        &self,
        summary: Option<&str>,
        error_message: Option<&str>,
        max_upload_kb: usize,
    ) -> Html<String> {
        self.index(summary, error_message, max_upload_kb)
            .unwrap_or_else(|e| {
                error!("Template rendering failed: {:#}", e);
                Html(FALLBACK_HTML.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_has_no_result_blocks() {
        let t = Templates::new().unwrap();
        let Html(page) = t.index(None, None, 500).unwrap();
        assert!(page.contains("name=\"file\""));
        assert!(page.contains("500 KB"));
        assert!(!page.contains("class=\"summary\""));
        assert!(!page.contains("class=\"error\""));
    }

    #[test]
    fn summary_is_escaped() {
        let t = Templates::new().unwrap();
        let Html(page) = t.index(Some("<b>bold</b> & more"), None, 500).unwrap();
        assert!(page.contains("class=\"summary\""));
        assert!(page.contains("&lt;b&gt;bold"), "{page}");
        assert!(page.contains("&amp; more"), "{page}");
        assert!(!page.contains("<b>bold"));
    }

    #[test]
    fn error_message_is_shown() {
        let t = Templates::new().unwrap();
        let Html(page) = t.index(None, Some("The file must be a PDF."), 500).unwrap();
        assert!(page.contains("class=\"error\""));
        assert!(page.contains("The file must be a PDF."));
    }
}
