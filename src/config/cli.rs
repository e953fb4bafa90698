use crate::domain::model::{
    FieldSelector, FieldTag, SearchRequest, SubfieldCode, SubfieldSelector,
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Multi-character short flags clap cannot express, mapped to their long form.
const LEGACY_SHORT_FLAGS: &[(&str, &str)] = &[
    ("-fl", "--field_label_lookup"),
    ("-sf", "--subfield_lookup"),
    ("-sfl", "--subfield_label_lookup"),
];

#[derive(Debug, Clone, Parser)]
#[command(name = "find_records", version)]
#[command(
    about = "Search the OLE Solr index by MARC field/subfield and extract MARC XML records from the OLE SRU"
)]
#[command(
    after_help = "Environment:\n  OLE_INDEX   base URL of the OLE SRU service (required)\n  SOLR_INDEX  base URL of the Solr index (required)\n  SOLR_CORE   Solr core name (default: ole)\n  FIND_RECORDS_TIMEOUT_SECS  HTTP timeout in seconds (default: 30)"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the MARC field and subfield labels accepted by -fl and -sfl
    #[command(name = "show_lookups")]
    ShowLookups,

    /// Search the index for a term, optionally within one MARC field/subfield
    #[command(name = "searching")]
    Searching(SearchArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[arg(
        short = 'f',
        long = "field_lookup",
        value_name = "FIELD",
        conflicts_with_all = ["field_label_lookup", "subfield_label_lookup"],
        help = "The MARC field tag to search in, e.g. 245"
    )]
    pub field_lookup: Option<FieldTag>,

    #[arg(
        long = "field_label_lookup",
        value_name = "FIELD_LABEL",
        conflicts_with = "subfield_lookup",
        help = "The label of the MARC field to search in, see show_lookups (short: -fl)"
    )]
    pub field_label_lookup: Option<String>,

    #[arg(
        long = "subfield_lookup",
        value_name = "SUBFIELD",
        requires = "field_lookup",
        conflicts_with = "subfield_label_lookup",
        help = "The MARC subfield code to search in, e.g. a (short: -sf)"
    )]
    pub subfield_lookup: Option<SubfieldCode>,

    #[arg(
        long = "subfield_label_lookup",
        value_name = "SUBFIELD_LABEL",
        requires = "field_label_lookup",
        help = "The label of the MARC subfield to search in, see show_lookups (short: -sfl)"
    )]
    pub subfield_label_lookup: Option<String>,

    #[arg(
        long = "extract_records",
        help = "Fetch each matching record from the OLE SRU and save it as <hex>.xml"
    )]
    pub extract_records: bool,

    #[arg(long, value_name = "N", help = "Process at most N search results")]
    pub limit: Option<NonZeroUsize>,

    #[arg(
        long = "output_dir",
        value_name = "DIR",
        default_value = ".",
        help = "Directory extracted records are written to"
    )]
    pub output_dir: PathBuf,

    #[arg(value_name = "QUERY_TERM", help = "The term to search for (stemmed)")]
    pub query_term: String,
}

impl SearchArgs {
    pub fn to_request(&self) -> SearchRequest {
        let field = match (&self.field_lookup, &self.field_label_lookup) {
            (Some(tag), _) => Some(FieldSelector::Code(*tag)),
            (None, Some(label)) => Some(FieldSelector::Label(label.clone())),
            (None, None) => None,
        };
        let subfield = match (&self.subfield_lookup, &self.subfield_label_lookup) {
            (Some(code), _) => Some(SubfieldSelector::Code(*code)),
            (None, Some(label)) => Some(SubfieldSelector::Label(label.clone())),
            (None, None) => None,
        };

        SearchRequest {
            query_term: self.query_term.clone(),
            field,
            subfield,
            extract_records: self.extract_records,
            limit: self.limit.map(NonZeroUsize::get),
        }
    }
}

fn rewrite_legacy_flag(arg: &str) -> Option<String> {
    LEGACY_SHORT_FLAGS.iter().find_map(|(short, long)| {
        if arg == *short {
            return Some(long.to_string());
        }
        arg.strip_prefix(short)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|value| format!("{}={}", long, value))
    })
}

/// Rewrites `-fl`, `-sf` and `-sfl` to their long options so clap does not
/// read them as clusters of single-letter flags. Arguments after `--` are
/// passed through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut after_terminator = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if after_terminator {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    after_terminator = true;
                    arg
                }
                Some(s) => rewrite_legacy_flag(s).map(OsString::from).unwrap_or(arg),
                None => arg,
            }
        })
        .collect()
}
