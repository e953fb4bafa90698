// Adapters layer: concrete implementations of the domain ports for the
// external systems (Solr index, OLE SRU, local filesystem).

pub mod ole;
pub mod solr;
pub mod storage;

pub use ole::OleRecordFinder;
pub use solr::SolrIndexSearcher;
pub use storage::LocalStorage;
