use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip model reasoning artifacts and normalize line breaks
pub fn clean_llm_response(response: &str) -> String {
    let cleaned = response.replace("\r\n", "\n");
    let cleaned = THINK_TAG_PATTERN.replace_all(&cleaned, "");
    let cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "");

    MULTIPLE_NEWLINES_PATTERN
        .replace_all(cleaned.trim(), "\n\n")
        .to_string()
}

/// Render a reply for the chat panel, which displays `<br>` line breaks
pub fn to_chat_html(response: &str) -> String {
    clean_llm_response(response).replace('\n', "<br>")
}
