use crate::domain::model::{SearchHit, SearchPage, SearchTarget};
use crate::domain::ports::IndexSearcher;
use crate::utils::error::{FindRecordsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub const BIB_NUMBER_FIELD: &str = "controlfield_001";

const SOLR_SPECIAL_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\', '/',
];

#[derive(Debug, Deserialize)]
struct SelectResponse {
    response: SelectBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectBody {
    num_found: u64,
    #[serde(default)]
    docs: Vec<serde_json::Map<String, Value>>,
}

/// Backslash-escapes Solr query syntax so the term is matched literally.
pub fn escape_query_term(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.trim().chars() {
        if SOLR_SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// The index field a target maps to, or None for a whole-record search.
pub fn index_field(target: &SearchTarget) -> Option<String> {
    match target {
        SearchTarget::AllFields => None,
        SearchTarget::Field(tag) if tag.is_control_field() => Some(format!("controlfield_{}", tag)),
        SearchTarget::Field(tag) => Some(format!("mdf_{}", tag)),
        SearchTarget::Subfield(tag, code) => Some(format!("mdf_{}{}", tag, code)),
    }
}

pub fn build_query(query_term: &str, target: &SearchTarget) -> String {
    let term = escape_query_term(query_term);
    match index_field(target) {
        Some(field) => format!("{}:({})", field, term),
        None => format!("({})", term),
    }
}

/// Cores index `controlfield_001` as a string, a number, or a multivalued
/// field of either.
fn bib_number(doc: &serde_json::Map<String, Value>) -> Option<String> {
    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    match doc.get(BIB_NUMBER_FIELD)? {
        Value::Array(values) => values.first().and_then(scalar),
        value => scalar(value),
    }
}

pub struct SolrIndexSearcher {
    client: Client,
    select_url: Url,
}

impl SolrIndexSearcher {
    pub fn new(client: Client, base_url: &Url, core: &str) -> Result<Self> {
        let mut select_url = base_url.clone();
        select_url
            .path_segments_mut()
            .map_err(|_| FindRecordsError::InvalidConfigValueError {
                field: "SOLR_INDEX".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .push(core)
            .push("select");

        Ok(Self { client, select_url })
    }

    pub fn select_url(&self) -> &Url {
        &self.select_url
    }

    async fn fetch_page(&self, query: &str, start: usize, rows: usize) -> Result<SelectBody> {
        tracing::debug!(
            "Solr select {} q={} start={} rows={}",
            self.select_url,
            query,
            start,
            rows
        );

        let start = start.to_string();
        let rows = rows.to_string();
        let response = self
            .client
            .get(self.select_url.clone())
            .query(&[
                ("q", query),
                ("fl", BIB_NUMBER_FIELD),
                ("wt", "json"),
                ("start", start.as_str()),
                ("rows", rows.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FindRecordsError::HttpStatusError {
                service: "Solr index",
                status: status.as_u16(),
                url: self.select_url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: SelectResponse = serde_json::from_str(&body)?;
        Ok(parsed.response)
    }
}

#[async_trait]
impl IndexSearcher for SolrIndexSearcher {
    async fn search_page(
        &self,
        query_term: &str,
        target: &SearchTarget,
        start: usize,
        rows: usize,
    ) -> Result<SearchPage> {
        let query = build_query(query_term, target);
        let body = self.fetch_page(&query, start, rows).await?;

        Ok(SearchPage {
            num_found: body.num_found,
            hits: body
                .docs
                .iter()
                .map(|doc| SearchHit::new(bib_number(doc).as_deref()))
                .collect(),
        })
    }
}
