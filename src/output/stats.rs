//! Statistics over the stored fact set
//!
//! This module provides functionality for summarising what the fact store
//! holds and printing it for the CLI.

use crate::storage::{FactKind, FactStore, StorageResult};
use std::collections::HashMap;

/// Fact store summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactStatistics {
    /// Total number of stored facts
    pub total_facts: u64,

    /// Count of facts by kind
    pub facts_by_kind: HashMap<FactKind, u64>,

    /// Number of distinct pages that contributed at least one fact
    pub source_pages: u64,
}

impl FactStatistics {
    pub fn count(&self, kind: FactKind) -> u64 {
        self.facts_by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Loads statistics from the store
pub fn load_statistics(store: &dyn FactStore) -> StorageResult<FactStatistics> {
    let facts_by_kind = store.count_by_kind()?;
    let source_pages = store.count_sources()?;

    Ok(FactStatistics {
        total_facts: facts_by_kind.values().sum(),
        facts_by_kind,
        source_pages,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &FactStatistics) {
    println!("=== Contact Statistics ===\n");

    println!("Overview:");
    println!("  Total facts: {}", stats.total_facts);
    println!("  Source pages: {}", stats.source_pages);
    println!();

    println!("Facts by Kind:");
    for kind in FactKind::ALL {
        let count = stats.count(kind);
        let percentage = if stats.total_facts > 0 {
            (count as f64 / stats.total_facts as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", kind, count, percentage);
    }
}
