use super::unique_values;
use regex::Regex;
use std::sync::LazyLock;

/// Digit runs with `()-. ` separators and an optional leading `+`
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?[0-9][0-9\s().-]{7,}[0-9]").expect("phone pattern is valid")
});

/// The only accepted stored shape: `+7` and ten digits
static CANONICAL_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+7[0-9]{10}$").expect("canonical phone pattern is valid"));

/// Extracts phone numbers in canonical `+7XXXXXXXXXX` form
///
/// Candidates that do not normalize are dropped silently.
pub fn extract_phones(text: &str) -> Vec<String> {
    unique_values(
        PHONE_REGEX
            .find_iter(text)
            .filter_map(|m| normalize_phone(m.as_str())),
    )
}

/// Rewrites a matched candidate into canonical form
///
/// - 11 digits starting with `8` or `7` become `+7` and the last ten digits
/// - exactly 10 digits get a `+7` prefix
/// - a candidate already starting with `+7` keeps its `+`/digit characters
///
/// Anything else, or a result that is not `+7` followed by ten digits, is
/// rejected.
pub fn normalize_phone(candidate: &str) -> Option<String> {
    let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();
    let normalized: String = candidate
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let formatted = if digits.len() == 11 && (digits.starts_with('8') || digits.starts_with('7'))
    {
        format!("+7{}", &digits[1..])
    } else if digits.len() == 10 {
        format!("+7{}", digits)
    } else if normalized.starts_with("+7") {
        normalized
    } else {
        return None;
    };

    CANONICAL_PHONE.is_match(&formatted).then_some(formatted)
}
