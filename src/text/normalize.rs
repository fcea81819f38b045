/// Punctuation kept by the normalizer; everything else outside letters, digits and
/// whitespace is deleted.
pub const ALLOWED_PUNCTUATION: &[char] = &[',', '.', '-', '#', '/', '\'', '&', ':', '(', ')'];

/// Normalizes optional page text
///
/// `None` in, `None` out; see [`normalize_text`] for the rules.
pub fn normalize(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_text)
}

/// Canonicalizes extracted page text into a stable string
///
/// 1. Delete every character that is not alphanumeric, whitespace or in
///    [`ALLOWED_PUNCTUATION`]. Characters are deleted, not replaced, so tokens on either
///    side of a deleted character may merge.
/// 2. Split into lines, trim each line, drop lines left empty.
/// 3. Rejoin with `\n`.
///
/// Filtering happens before trimming so that a line made only of filtered characters
/// disappears instead of leaving a blank line behind. The result is a fixed point:
/// `normalize_text(&normalize_text(t)) == normalize_text(t)`.
///
/// # Examples
///
/// ```
/// use address_scout::text::normalize_text;
///
/// let raw = "  Visit us:\n\n\t★ 123 Main St, Springfield  \n";
/// assert_eq!(normalize_text(raw), "Visit us:\n123 Main St, Springfield");
/// ```
pub fn normalize_text(raw: &str) -> String {
    let filtered: String = raw.chars().filter(|c| is_allowed(*c)).collect();

    filtered
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(&c)
}
