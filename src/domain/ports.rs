use crate::domain::model::{MarcXmlRecord, SearchPage, SearchTarget};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait IndexSearcher: Send + Sync {
    /// Fetches at most `rows` hits starting at the zero-based offset `start`.
    /// An empty page means the index has nothing past `start`.
    async fn search_page(
        &self,
        query_term: &str,
        target: &SearchTarget,
        start: usize,
        rows: usize,
    ) -> Result<SearchPage>;
}

#[async_trait]
pub trait RecordFinder: Send + Sync {
    /// An empty vector means the service knows no record for `bib_number`.
    async fn find_records(&self, bib_number: &str) -> Result<Vec<MarcXmlRecord>>;
}

pub trait Storage: Send + Sync {
    /// Writes a new file and never replaces an existing one; a name that is
    /// already taken yields `FindRecordsError::FileExists`.
    fn write_new_file(
        &self,
        name: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
}
