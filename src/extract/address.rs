use super::unique_values;
use regex::Regex;
use std::sync::LazyLock;

/// Cyrillic street addresses: optional postal code and city marker, a
/// locality or district phrase, a street-type keyword, the street name, a
/// building number and an optional `корп.` block suffix.
static ADDRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b([0-9]{6},?\s*)?(г\.?\s*)?[А-Яа-яёЁ\-\s]+,?\s*",
        r"(ул\.|улица|проспект|пр\.|пер\.|переулок|наб\.|набережная|шоссе|ш\.|бульвар|бул\.|пл\.|площадь)",
        r"\s+[А-Яа-яёЁ\-\s]+,?\s*(д\.|дом)?\s*[0-9]+[А-Яа-я]?(\s*корп\.?\s*[0-9]+)?",
    ))
    .expect("address pattern is valid")
});

/// Extracts street addresses as matched, trimmed
pub fn extract_addresses(text: &str) -> Vec<String> {
    unique_values(
        ADDRESS_REGEX
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string()),
    )
}
