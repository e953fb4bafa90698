use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FindRecordsError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status} for {url}")]
    HttpStatusError {
        service: &'static str,
        status: u16,
        url: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlError(#[from] roxmltree::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Missing configuration: {field} environment variable is required")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid MARC field tag '{value}': {reason}")]
    InvalidFieldTag { value: String, reason: String },

    #[error("Invalid MARC subfield code '{value}': {reason}")]
    InvalidSubfieldCode { value: String, reason: String },

    #[error("Unknown MARC field label '{label}'")]
    UnknownFieldLabel { label: String },

    #[error("Unknown subfield label '{label}' for MARC field {field}")]
    UnknownSubfieldLabel { field: String, label: String },

    #[error("Invalid field/subfield selection: {message}")]
    SelectorError { message: String },

    #[error("SRU diagnostic for bib number {bib_number}: {message}")]
    SruDiagnostic { bib_number: String, message: String },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl FindRecordsError {
    /// A one-line hint printed under the error message on the console.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) | Self::HttpStatusError { .. } => {
                "Check that SOLR_INDEX and OLE_INDEX point at reachable services"
            }
            Self::MissingConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Export OLE_INDEX and SOLR_INDEX as http(s) base URLs before running"
            }
            Self::UnknownFieldLabel { .. } | Self::UnknownSubfieldLabel { .. } => {
                "Run `find_records show_lookups` to list the valid labels"
            }
            Self::InvalidFieldTag { .. }
            | Self::InvalidSubfieldCode { .. }
            | Self::SelectorError { .. }
            | Self::ValidationError { .. } => "Run `find_records searching --help` for usage",
            Self::SruDiagnostic { .. } | Self::XmlError(_) => {
                "The OLE SRU rejected the request or returned malformed XML"
            }
            Self::SerializationError(_) => "The Solr index returned an unexpected response body",
            Self::IoError(_) | Self::FileExists { .. } => {
                "Check that the output directory exists and is writable"
            }
            Self::UrlError(_) => "Check the configured service URLs",
        }
    }
}

pub type Result<T> = std::result::Result<T, FindRecordsError>;
