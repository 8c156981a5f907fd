use super::unique_values;
use regex::Regex;
use std::sync::LazyLock;

/// `local-part@domain` tokens
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+").expect("email pattern is valid")
});

/// Extracts email addresses, lower-cased and trimmed
///
/// A period closing the surrounding sentence is not part of the domain.
pub fn extract_emails(text: &str) -> Vec<String> {
    unique_values(
        EMAIL_REGEX
            .find_iter(text)
            .map(|m| m.as_str().trim().trim_end_matches('.').to_lowercase()),
    )
}
