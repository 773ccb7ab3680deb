//! Text normalization.

/// Canonical form of an answer: lowercased, trimmed, internal whitespace
/// runs collapsed to a single space.
///
/// Two answers are "the same answer" iff their normalized forms are equal.
///
/// ```
/// use answer_quorum_domain::answer::normalize;
///
/// assert_eq!(normalize("  New   York\tCity "), "new york city");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
