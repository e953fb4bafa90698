pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;
pub use config::Settings;

pub use adapters::{LocalStorage, OleRecordFinder, SolrIndexSearcher};
pub use core::engine::SearchEngine;
pub use domain::lookup::LookupTable;
pub use domain::model::{RunSummary, SearchRequest};
pub use utils::error::{FindRecordsError, Result};
