//! The instructional prompt sent with every document.
//!
//! Kept here so it can be inspected by tests and changed without touching
//! the client code in [`crate::pipeline::summarize`].

/// Instructions placed before the document text.
pub const SUMMARY_INSTRUCTIONS: &str = "You are an expert text analyst with an exceptional ability to identify the most relevant information. \
Your task is to read the following document and provide a concise, clear summary of its key points and what matters most. \
Make sure the summary captures the essence of the content, removing redundancy and focusing on the crucial data. \
Write the summary in the same language as the document.";

/// Closing line placed after the document text.
pub const SUMMARY_REQUEST: &str = "Please write the summary:";

/// Wrap the full extracted text in the summary instructions.
pub fn summary_prompt(document_text: &str) -> String {
    format!(
        "{}\nHere is the text of the document:\n\n{}\n\n{}",
        SUMMARY_INSTRUCTIONS, document_text, SUMMARY_REQUEST
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_wraps_whole_text() {
        let text = "--- Page 1 (OCR) ---\nFactura 2024\n\n";
        let prompt = summary_prompt(text);
        assert!(prompt.starts_with(SUMMARY_INSTRUCTIONS));
        assert!(prompt.contains(text));
        assert!(prompt.ends_with(SUMMARY_REQUEST));
    }
}
