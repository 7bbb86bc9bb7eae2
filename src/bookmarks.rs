pub const MAX_BOOKMARK_LEN: usize = 40;

const FALLBACK_NAME: &str = "bookmark";

/// Derive a bookmark identifier from heading text.
///
/// Keeps ASCII letters and digits, turns whitespace into `_`, prefixes `h_`
/// when the result does not start with a letter, truncates to
/// [`MAX_BOOKMARK_LEN`] characters and lowercases. Headings with the same
/// sanitized text get the same name; duplicates are not renamed.
pub fn sanitize_bookmark_name(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let trimmed = kept.trim_matches('_');
    if trimmed.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    let mut name = String::with_capacity(trimmed.len() + 2);
    if !trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
        name.push_str("h_");
    }
    name.push_str(trimmed);
    name.truncate(MAX_BOOKMARK_LEN);
    name.make_ascii_lowercase();
    name
}
