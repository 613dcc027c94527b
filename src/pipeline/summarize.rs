//! Summariser client: one prompt in, one free-text summary out.
//!
//! The call is made once. There is no timeout and no retry; any failure is
//! returned as [`SummaryError::Summarizer`] carrying the provider's message,
//! and an empty completion counts as a failure rather than an empty summary.

use crate::config::ServiceConfig;
use crate::error::SummaryError;
use crate::prompts::summary_prompt;
use edgequake_llm::{ChatMessage, LLMProvider, ProviderFactory};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Produces a summary of the extracted document text.
///
/// Returns a boxed future so the service can hold any implementation
/// behind `Arc<dyn Summarize>`.
pub trait Summarize: Send + Sync {
    fn summarize<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String, SummaryError>>;
}

/// [`Summarize`] backed by an edgequake-llm provider.
pub struct LlmSummarizer {
    provider: Arc<dyn LLMProvider>,
}

impl LlmSummarizer {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self { provider }
    }

    /// Use the provider from `config`, or create one by name and model.
    ///
    /// Named providers read their API key from the environment
    /// (`GEMINI_API_KEY` for `gemini`).
    pub fn from_config(config: &ServiceConfig) -> Result<Self, SummaryError> {
        if let Some(ref provider) = config.provider {
            return Ok(Self::new(Arc::clone(provider)));
        }

        let provider = ProviderFactory::create_llm_provider(&config.provider_name, &config.model)
            .map_err(|e| SummaryError::ProviderNotConfigured {
                provider: config.provider_name.clone(),
                hint: format!("{e}"),
            })?;
        info!(
            "Summaries via provider '{}' model '{}'",
            config.provider_name, config.model
        );
        Ok(Self::new(provider))
    }
}

impl Summarize for LlmSummarizer {
    fn summarize<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String, SummaryError>> {
        Box::pin(async move {
            let start = Instant::now();
            let messages = vec![ChatMessage::user(summary_prompt(text))];

            let response = self.provider.chat(&messages, None).await.map_err(|e| {
                warn!("Summary request failed: {}", e);
                SummaryError::Summarizer {
                    message: e.to_string(),
                }
            })?;

            debug!(
                "Summary: {} input tokens, {} output tokens, {:?}",
                response.prompt_tokens,
                response.completion_tokens,
                start.elapsed()
            );

            non_empty_summary(response.content)
        })
    }
}

/// Reject completions that carry no text.
fn non_empty_summary(content: String) -> Result<String, SummaryError> {
    if content.trim().is_empty() {
        Err(SummaryError::Summarizer {
            message: "the model returned an empty response".to_string(),
        })
    } else {
        Ok(content)
    }
}
