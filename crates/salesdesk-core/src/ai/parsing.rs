//! JSON extraction helpers for completion responses
//!
//! Models often wrap the JSON payload in prose or markdown fences, so the
//! outermost `{ ... }` span is located before decoding.

use crate::error::{Error, Result};

/// Longest raw response excerpt quoted in an error message
const MAX_ERROR_EXCERPT: usize = 200;

/// Find the outermost JSON object in a model response
pub fn extract_json_object(response: &str) -> Result<&str> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::MalformedInput(format!(
            "No JSON found in AI response | Raw: {}",
            excerpt(response)
        ))),
    }
}

/// Clean up narrated text for display
pub fn clean_narration(response: &str) -> String {
    response.trim().to_string()
}

/// Truncate long responses for error messages (on a char boundary)
pub fn excerpt(text: &str) -> String {
    if text.len() <= MAX_ERROR_EXCERPT {
        return text.to_string();
    }
    let mut cut = MAX_ERROR_EXCERPT;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}
