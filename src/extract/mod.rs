//! Contact fact extraction from visible page text
//!
//! Each extractor pattern-matches candidates in plain text, normalizes them
//! and drops repeats, so one page yields each normalized value at most once
//! per kind. Extraction is best-effort; no extractor ever fails.

mod address;
mod email;
mod phone;

pub use address::extract_addresses;
pub use email::extract_emails;
pub use phone::{extract_phones, normalize_phone};

use crate::storage::FactKind;
use std::collections::HashSet;

/// Candidate facts found in one page's text, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFacts {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub addresses: Vec<String>,
}

impl ExtractedFacts {
    /// Iterates all candidates as `(kind, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (FactKind, &str)> + '_ {
        let emails = self.emails.iter().map(|v| (FactKind::Email, v.as_str()));
        let phones = self.phones.iter().map(|v| (FactKind::Phone, v.as_str()));
        let addresses = self
            .addresses
            .iter()
            .map(|v| (FactKind::Address, v.as_str()));
        emails.chain(phones).chain(addresses)
    }

    pub fn len(&self) -> usize {
        self.emails.len() + self.phones.len() + self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs every extractor over the text
pub fn extract_facts(text: &str) -> ExtractedFacts {
    ExtractedFacts {
        emails: extract_emails(text),
        phones: extract_phones(text),
        addresses: extract_addresses(text),
    }
}

/// Keeps the first occurrence of every non-blank value, in match order
fn unique_values(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.trim().is_empty())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
