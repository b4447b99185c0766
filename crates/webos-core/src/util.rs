//! Small text helpers shared by config parsing and error reporting.

/// Longest excerpt of a response body kept inside an error.
pub const ERROR_EXCERPT_CHARS: usize = 180;

/// Trimmed `value`, or `None` when it is missing or blank.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Whether `value` names an `http` or `https` URL.
pub fn is_http_url(value: &str) -> bool {
    let value = value.trim_start();
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.starts_with(scheme))
}

/// Trimmed `value` cut to [`ERROR_EXCERPT_CHARS`] characters.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(ERROR_EXCERPT_CHARS).collect()
}
