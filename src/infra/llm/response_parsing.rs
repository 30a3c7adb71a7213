use serde_json::Value;

const MAX_ERROR_MESSAGE_LEN: usize = 256;
const COMMENT_OPEN: &str = "/*";

/// Optional cleanup applied to extracted text before it reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFilter {
    /// Cut the suggestion at the first `/*`. Code models tend to run on into
    /// a trailing block comment after the useful completion.
    TruncateAtCommentOpen,
}

impl OutputFilter {
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::TruncateAtCommentOpen => truncate_at_comment_open(text).to_string(),
        }
    }
}

pub fn truncate_at_comment_open(text: &str) -> &str {
    match text.find(COMMENT_OPEN) {
        Some(index) => &text[..index],
        None => text,
    }
}

pub(crate) fn truncate_message(body: &str) -> String {
    let compact = body.trim().replace('\n', " ");
    compact.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}

/// Pulls a human-readable message out of a provider error body. Providers
/// use `{"error": "..."}`, `{"error": {"message": "..."}}` or
/// `{"message": "..."}`.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    let message = match value.get("error") {
        Some(Value::String(message)) => Some(message.as_str()),
        Some(Value::Object(detail)) => detail.get("message").and_then(Value::as_str),
        _ => value.get("message").and_then(Value::as_str),
    }?;
    non_empty_owned(message).map(|message| truncate_message(&message))
}

/// Keeps generated text verbatim (leading indentation matters) unless it is
/// blank.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

pub(crate) fn non_empty_owned(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
