use crate::utils::error::FindRecordsError;
use std::fmt;
use std::str::FromStr;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A MARC tag, 001 through 999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldTag(u16);

impl FieldTag {
    pub fn new(tag: u16) -> Result<Self, FindRecordsError> {
        if (1..=999).contains(&tag) {
            Ok(Self(tag))
        } else {
            Err(FindRecordsError::InvalidFieldTag {
                value: tag.to_string(),
                reason: "tags range from 001 to 999".to_string(),
            })
        }
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    /// Tags 001-009 hold control fields, which have no subfields.
    pub fn is_control_field(&self) -> bool {
        self.0 < 10
    }
}

impl FromStr for FieldTag {
    type Err = FindRecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.len() > 3 || !trimmed.chars().all(|c| c.is_ascii_digit())
        {
            return Err(FindRecordsError::InvalidFieldTag {
                value: s.to_string(),
                reason: "expected a number of at most three digits".to_string(),
            });
        }

        let tag = trimmed
            .parse::<u16>()
            .map_err(|e| FindRecordsError::InvalidFieldTag {
                value: s.to_string(),
                reason: e.to_string(),
            })?;

        Self::new(tag)
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// A MARC subfield code, stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubfieldCode(char);

impl SubfieldCode {
    pub fn new(code: char) -> Result<Self, FindRecordsError> {
        if code.is_ascii_alphanumeric() {
            Ok(Self(code.to_ascii_lowercase()))
        } else {
            Err(FindRecordsError::InvalidSubfieldCode {
                value: code.to_string(),
                reason: "codes are a single letter or digit".to_string(),
            })
        }
    }

    pub fn value(&self) -> char {
        self.0
    }
}

impl FromStr for SubfieldCode {
    type Err = FindRecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('$');
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c).map_err(|_| FindRecordsError::InvalidSubfieldCode {
                value: s.to_string(),
                reason: "codes are a single letter or digit".to_string(),
            }),
            _ => Err(FindRecordsError::InvalidSubfieldCode {
                value: s.to_string(),
                reason: "expected exactly one character".to_string(),
            }),
        }
    }
}

impl fmt::Display for SubfieldCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelector {
    Code(FieldTag),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubfieldSelector {
    Code(SubfieldCode),
    Label(String),
}

/// Everything the `searching` workflow needs, independent of how it was parsed.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query_term: String,
    pub field: Option<FieldSelector>,
    pub subfield: Option<SubfieldSelector>,
    pub extract_records: bool,
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn new(query_term: impl Into<String>) -> Self {
        Self {
            query_term: query_term.into(),
            field: None,
            subfield: None,
            extract_records: false,
            limit: None,
        }
    }
}

/// The MARC location a query is restricted to, with labels already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    AllFields,
    Field(FieldTag),
    Subfield(FieldTag, SubfieldCode),
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllFields => write!(f, "all fields"),
            Self::Field(tag) => write!(f, "{}", tag),
            Self::Subfield(tag, code) => write!(f, "{}${}", tag, code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub bib_number: Option<String>,
}

impl SearchHit {
    pub fn new(bib_number: Option<&str>) -> Self {
        let bib_number = bib_number
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string);
        Self { bib_number }
    }
}

/// One page of index hits. `num_found` is the index-wide match count, not
/// the page length.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub num_found: u64,
    pub hits: Vec<SearchHit>,
}

/// One `<record>` element, serialized without an XML declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarcXmlRecord {
    pub xml: String,
}

impl MarcXmlRecord {
    pub fn new(xml: String) -> Self {
        Self { xml }
    }

    /// The record as a standalone UTF-8 document.
    pub fn to_document_bytes(&self) -> Vec<u8> {
        format!("{}\n{}\n", XML_DECLARATION, self.xml).into_bytes()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub num_found: u64,
    pub total_hits: usize,
    pub listed: usize,
    pub missing_bib_numbers: usize,
    pub records_written: usize,
    pub collisions: usize,
    pub fetch_failures: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_tag_parsing() {
        assert_eq!("245".parse::<FieldTag>().unwrap().value(), 245);
        assert_eq!("1".parse::<FieldTag>().unwrap().to_string(), "001");
        assert_eq!("010".parse::<FieldTag>().unwrap().to_string(), "010");
        assert!("0".parse::<FieldTag>().is_err());
        assert!("1000".parse::<FieldTag>().is_err());
        assert!("24a".parse::<FieldTag>().is_err());
        assert!("".parse::<FieldTag>().is_err());
    }

    #[test]
    fn test_control_field_tags() {
        assert!(FieldTag::new(1).unwrap().is_control_field());
        assert!(FieldTag::new(8).unwrap().is_control_field());
        assert!(!FieldTag::new(10).unwrap().is_control_field());
    }

    #[test]
    fn test_subfield_code_parsing() {
        assert_eq!("a".parse::<SubfieldCode>().unwrap().value(), 'a');
        assert_eq!("A".parse::<SubfieldCode>().unwrap().value(), 'a');
        assert_eq!("$c".parse::<SubfieldCode>().unwrap().value(), 'c');
        assert_eq!("6".parse::<SubfieldCode>().unwrap().value(), '6');
        assert!("ab".parse::<SubfieldCode>().is_err());
        assert!("%".parse::<SubfieldCode>().is_err());
        assert!("".parse::<SubfieldCode>().is_err());
    }

    #[test]
    fn test_search_hit_trims_bib_number() {
        assert_eq!(
            SearchHit::new(Some(" 12345\n")).bib_number.as_deref(),
            Some("12345")
        );
        assert_eq!(SearchHit::new(Some("   ")).bib_number, None);
        assert_eq!(SearchHit::new(None).bib_number, None);
    }

    #[test]
    fn test_record_document_has_declaration() {
        let record = MarcXmlRecord::new("<record/>".to_string());
        let doc = String::from_utf8(record.to_document_bytes()).unwrap();
        assert!(doc.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(doc.contains("<record/>"));
    }
}
