use crate::core::marcxml::records_from_sru_response;
use crate::domain::model::MarcXmlRecord;
use crate::domain::ports::RecordFinder;
use crate::utils::error::{FindRecordsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

pub const SRU_VERSION: &str = "1.2";
pub const RECORD_SCHEMA: &str = "marcxml";

/// A CQL `id` clause with the bib number as a quoted term.
pub fn id_query(bib_number: &str) -> String {
    let mut query = String::with_capacity(bib_number.len() + 5);
    query.push_str("id=\"");
    for c in bib_number.chars() {
        if c == '"' || c == '\\' {
            query.push('\\');
        }
        query.push(c);
    }
    query.push('"');
    query
}

/// Fetches MARC XML for a bib number through the OLE SRU `searchRetrieve`
/// operation.
pub struct OleRecordFinder {
    client: Client,
    base_url: Url,
}

impl OleRecordFinder {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl RecordFinder for OleRecordFinder {
    async fn find_records(&self, bib_number: &str) -> Result<Vec<MarcXmlRecord>> {
        let query = id_query(bib_number);
        tracing::debug!("SRU searchRetrieve {} query={}", self.base_url, query);

        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("operation", "searchRetrieve"),
                ("version", SRU_VERSION),
                ("query", query.as_str()),
                ("recordSchema", RECORD_SCHEMA),
                ("recordPacking", "xml"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FindRecordsError::HttpStatusError {
                service: "OLE SRU",
                status: status.as_u16(),
                url: self.base_url.to_string(),
            });
        }

        let body = response.text().await?;
        records_from_sru_response(&body, bib_number)
    }
}
