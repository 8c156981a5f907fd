//! Output module for read access to harvested facts
//!
//! This module handles:
//! - Paginated, sorted result pages over the fact store
//! - Fact statistics for the CLI

mod results;
pub mod stats;

pub use results::{get_results, ResultPage, SortKey};
pub use stats::{load_statistics, print_statistics, FactStatistics};
