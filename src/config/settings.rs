use crate::utils::error::{FindRecordsError, Result};
use crate::utils::validation::{validate_core_name, validate_range, validate_url, Validate};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const OLE_INDEX_VAR: &str = "OLE_INDEX";
pub const SOLR_INDEX_VAR: &str = "SOLR_INDEX";
pub const SOLR_CORE_VAR: &str = "SOLR_CORE";
pub const TIMEOUT_VAR: &str = "FIND_RECORDS_TIMEOUT_SECS";

pub const DEFAULT_SOLR_CORE: &str = "ole";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Service endpoints, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub ole_index: String,
    pub solr_index: String,
    pub solr_core: String,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| FindRecordsError::MissingConfigError {
                field: name.to_string(),
            })
        };

        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| FindRecordsError::InvalidConfigValueError {
                    field: TIMEOUT_VAR.to_string(),
                    value: raw.clone(),
                    reason: format!("{}", e),
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            ole_index: required(OLE_INDEX_VAR)?,
            solr_index: required(SOLR_INDEX_VAR)?,
            solr_core: lookup(SOLR_CORE_VAR).unwrap_or_else(|| DEFAULT_SOLR_CORE.to_string()),
            timeout_secs,
        })
    }

    pub fn ole_url(&self) -> Result<Url> {
        validate_url(OLE_INDEX_VAR, &self.ole_index)
    }

    pub fn solr_url(&self) -> Result<Url> {
        validate_url(SOLR_INDEX_VAR, &self.solr_index)
    }

    /// One client shared by the Solr and SRU adapters.
    pub fn http_client(&self) -> Result<Client> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(concat!("find_records/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.ole_url()?;
        self.solr_url()?;
        validate_core_name(SOLR_CORE_VAR, &self.solr_core)?;
        validate_range(TIMEOUT_VAR, self.timeout_secs, 1, 600)?;

        tracing::debug!(
            "Configuration: solr={} core={} ole={} timeout={}s",
            self.solr_index,
            self.solr_core,
            self.ole_index,
            self.timeout_secs
        );
        Ok(())
    }
}
