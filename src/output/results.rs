//! Paginated, sorted read access to stored facts

use crate::storage::{ContactFact, FactStore, StorageResult};

/// Field a result page can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Email,
    Phone,
    /// Order in which the store returns facts
    #[default]
    StoreOrder,
}

impl SortKey {
    /// Maps a caller-supplied field name to a sort key
    ///
    /// Names are matched case-insensitively; unknown names keep store order.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "email" => Self::Email,
            "phone" => Self::Phone,
            _ => Self::StoreOrder,
        }
    }

    fn sort_value<'a>(&self, fact: &'a ContactFact) -> &'a str {
        let field = match self {
            Self::Email => fact.email(),
            Self::Phone => fact.phone(),
            Self::StoreOrder => None,
        };
        field.unwrap_or("")
    }
}

/// One page of results plus the size of the whole fact set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage {
    pub items: Vec<ContactFact>,
    pub total: usize,
}

/// Reads every stored fact, sorts, and returns the requested page
///
/// Facts without the sort field compare as the empty string and so come
/// first. The sort is stable: ties keep store order. Pages past the end are
/// empty.
pub fn get_results(
    store: &dyn FactStore,
    page: usize,
    size: usize,
    sort_by: SortKey,
) -> StorageResult<ResultPage> {
    let mut facts = store.find_all()?;
    let total = facts.len();

    if sort_by != SortKey::StoreOrder {
        facts.sort_by(|a, b| sort_by.sort_value(a).cmp(sort_by.sort_value(b)));
    }

    let items = facts
        .into_iter()
        .skip(page.saturating_mul(size))
        .take(size)
        .collect();

    Ok(ResultPage { items, total })
}
