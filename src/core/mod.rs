pub mod engine;
pub mod marcxml;

pub use crate::domain::model::{MarcXmlRecord, RunSummary, SearchPage, SearchRequest};
pub use crate::domain::ports::{IndexSearcher, RecordFinder, Storage};
pub use crate::utils::error::Result;
