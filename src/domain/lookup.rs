//! Human-readable labels for MARC21 bibliographic fields and subfields.
//!
//! Labels let a developer target `-fl "Title Statement" -sfl title` instead
//! of remembering `-f 245 -sf a`. Matching ignores case, punctuation and
//! the difference between spaces, underscores and hyphens.

use crate::domain::model::{FieldSelector, FieldTag, SearchTarget, SubfieldCode, SubfieldSelector};
use crate::utils::error::{FindRecordsError, Result};

#[derive(Debug)]
pub struct FieldDefinition {
    pub tag: u16,
    pub label: &'static str,
    pub subfields: &'static [(char, &'static str)],
}

const MARC21_BIBLIOGRAPHIC: &[FieldDefinition] = &[
    FieldDefinition { tag: 1, label: "Control Number", subfields: &[] },
    FieldDefinition { tag: 3, label: "Control Number Identifier", subfields: &[] },
    FieldDefinition { tag: 5, label: "Date and Time of Latest Transaction", subfields: &[] },
    FieldDefinition { tag: 8, label: "Fixed-Length Data Elements", subfields: &[] },
    FieldDefinition {
        tag: 10,
        label: "Library of Congress Control Number",
        subfields: &[('a', "LC control number"), ('z', "Canceled/invalid LC control number")],
    },
    FieldDefinition {
        tag: 20,
        label: "International Standard Book Number",
        subfields: &[
            ('a', "International Standard Book Number"),
            ('c', "Terms of availability"),
            ('q', "Qualifying information"),
            ('z', "Canceled/invalid ISBN"),
        ],
    },
    FieldDefinition {
        tag: 22,
        label: "International Standard Serial Number",
        subfields: &[
            ('a', "International Standard Serial Number"),
            ('l', "ISSN-L"),
            ('y', "Incorrect ISSN"),
            ('z', "Canceled ISSN"),
        ],
    },
    FieldDefinition {
        tag: 35,
        label: "System Control Number",
        subfields: &[('a', "System control number"), ('z', "Canceled/invalid control number")],
    },
    FieldDefinition {
        tag: 40,
        label: "Cataloging Source",
        subfields: &[
            ('a', "Original cataloging agency"),
            ('b', "Language of cataloging"),
            ('c', "Transcribing agency"),
            ('d', "Modifying agency"),
            ('e', "Description conventions"),
        ],
    },
    FieldDefinition {
        tag: 41,
        label: "Language Code",
        subfields: &[
            ('a', "Language code of text/sound track or separate title"),
            ('h', "Language code of original"),
        ],
    },
    FieldDefinition {
        tag: 50,
        label: "Library of Congress Call Number",
        subfields: &[('a', "Classification number"), ('b', "Item number")],
    },
    FieldDefinition {
        tag: 82,
        label: "Dewey Decimal Classification Number",
        subfields: &[
            ('a', "Classification number"),
            ('b', "Item number"),
            ('2', "Edition number"),
        ],
    },
    FieldDefinition {
        tag: 100,
        label: "Main Entry - Personal Name",
        subfields: &[
            ('a', "Personal name"),
            ('b', "Numeration"),
            ('c', "Titles and words associated with a name"),
            ('d', "Dates associated with a name"),
            ('e', "Relator term"),
            ('q', "Fuller form of name"),
        ],
    },
    FieldDefinition {
        tag: 110,
        label: "Main Entry - Corporate Name",
        subfields: &[
            ('a', "Corporate name or jurisdiction name as entry element"),
            ('b', "Subordinate unit"),
            ('e', "Relator term"),
        ],
    },
    FieldDefinition {
        tag: 111,
        label: "Main Entry - Meeting Name",
        subfields: &[
            ('a', "Meeting name or jurisdiction name as entry element"),
            ('c', "Location of meeting"),
            ('d', "Date of meeting"),
            ('n', "Number of part/section/meeting"),
        ],
    },
    FieldDefinition {
        tag: 130,
        label: "Main Entry - Uniform Title",
        subfields: &[
            ('a', "Uniform title"),
            ('l', "Language of a work"),
            ('p', "Name of part/section of a work"),
        ],
    },
    FieldDefinition {
        tag: 240,
        label: "Uniform Title",
        subfields: &[('a', "Uniform title"), ('l', "Language of a work")],
    },
    FieldDefinition {
        tag: 245,
        label: "Title Statement",
        subfields: &[
            ('a', "Title"),
            ('b', "Remainder of title"),
            ('c', "Statement of responsibility"),
            ('f', "Inclusive dates"),
            ('h', "Medium"),
            ('n', "Number of part/section of a work"),
            ('p', "Name of part/section of a work"),
        ],
    },
    FieldDefinition {
        tag: 246,
        label: "Varying Form of Title",
        subfields: &[
            ('a', "Title proper/short title"),
            ('b', "Remainder of title"),
            ('i', "Display text"),
        ],
    },
    FieldDefinition {
        tag: 250,
        label: "Edition Statement",
        subfields: &[('a', "Edition statement"), ('b', "Remainder of edition statement")],
    },
    FieldDefinition {
        tag: 260,
        label: "Publication, Distribution, etc. (Imprint)",
        subfields: &[
            ('a', "Place of publication, distribution, etc."),
            ('b', "Name of publisher, distributor, etc."),
            ('c', "Date of publication, distribution, etc."),
        ],
    },
    FieldDefinition {
        tag: 264,
        label: "Production, Publication, Distribution, Manufacture, and Copyright Notice",
        subfields: &[
            ('a', "Place of production, publication, distribution, manufacture"),
            ('b', "Name of producer, publisher, distributor, manufacturer"),
            ('c', "Date of production, publication, distribution, manufacture, or copyright notice"),
        ],
    },
    FieldDefinition {
        tag: 300,
        label: "Physical Description",
        subfields: &[
            ('a', "Extent"),
            ('b', "Other physical details"),
            ('c', "Dimensions"),
            ('e', "Accompanying material"),
        ],
    },
    FieldDefinition {
        tag: 336,
        label: "Content Type",
        subfields: &[('a', "Content type term"), ('b', "Content type code"), ('2', "Source")],
    },
    FieldDefinition {
        tag: 337,
        label: "Media Type",
        subfields: &[('a', "Media type term"), ('b', "Media type code"), ('2', "Source")],
    },
    FieldDefinition {
        tag: 338,
        label: "Carrier Type",
        subfields: &[('a', "Carrier type term"), ('b', "Carrier type code"), ('2', "Source")],
    },
    FieldDefinition {
        tag: 490,
        label: "Series Statement",
        subfields: &[
            ('a', "Series statement"),
            ('v', "Volume/sequential designation"),
            ('x', "International Standard Serial Number"),
        ],
    },
    FieldDefinition { tag: 500, label: "General Note", subfields: &[('a', "General note")] },
    FieldDefinition {
        tag: 504,
        label: "Bibliography, Etc. Note",
        subfields: &[('a', "Bibliography, etc. note")],
    },
    FieldDefinition {
        tag: 505,
        label: "Formatted Contents Note",
        subfields: &[
            ('a', "Formatted contents note"),
            ('r', "Statement of responsibility"),
            ('t', "Title"),
        ],
    },
    FieldDefinition {
        tag: 520,
        label: "Summary, Etc.",
        subfields: &[('a', "Summary, etc."), ('b', "Expansion of summary note")],
    },
    FieldDefinition { tag: 546, label: "Language Note", subfields: &[('a', "Language note")] },
    FieldDefinition {
        tag: 600,
        label: "Subject Added Entry - Personal Name",
        subfields: &[
            ('a', "Personal name"),
            ('d', "Dates associated with a name"),
            ('t', "Title of a work"),
            ('v', "Form subdivision"),
            ('x', "General subdivision"),
            ('y', "Chronological subdivision"),
            ('z', "Geographic subdivision"),
        ],
    },
    FieldDefinition {
        tag: 610,
        label: "Subject Added Entry - Corporate Name",
        subfields: &[
            ('a', "Corporate name or jurisdiction name as entry element"),
            ('b', "Subordinate unit"),
            ('v', "Form subdivision"),
            ('x', "General subdivision"),
            ('y', "Chronological subdivision"),
            ('z', "Geographic subdivision"),
        ],
    },
    FieldDefinition {
        tag: 650,
        label: "Subject Added Entry - Topical Term",
        subfields: &[
            ('a', "Topical term or geographic name entry element"),
            ('v', "Form subdivision"),
            ('x', "General subdivision"),
            ('y', "Chronological subdivision"),
            ('z', "Geographic subdivision"),
        ],
    },
    FieldDefinition {
        tag: 651,
        label: "Subject Added Entry - Geographic Name",
        subfields: &[
            ('a', "Geographic name"),
            ('v', "Form subdivision"),
            ('x', "General subdivision"),
            ('y', "Chronological subdivision"),
            ('z', "Geographic subdivision"),
        ],
    },
    FieldDefinition {
        tag: 655,
        label: "Index Term - Genre/Form",
        subfields: &[
            ('a', "Genre/form data or focus term"),
            ('v', "Form subdivision"),
            ('x', "General subdivision"),
            ('y', "Chronological subdivision"),
            ('z', "Geographic subdivision"),
            ('2', "Source of term"),
        ],
    },
    FieldDefinition {
        tag: 700,
        label: "Added Entry - Personal Name",
        subfields: &[
            ('a', "Personal name"),
            ('d', "Dates associated with a name"),
            ('e', "Relator term"),
            ('t', "Title of a work"),
        ],
    },
    FieldDefinition {
        tag: 710,
        label: "Added Entry - Corporate Name",
        subfields: &[
            ('a', "Corporate name or jurisdiction name as entry element"),
            ('b', "Subordinate unit"),
            ('e', "Relator term"),
        ],
    },
    FieldDefinition {
        tag: 740,
        label: "Added Entry - Uncontrolled Related/Analytical Title",
        subfields: &[('a', "Uncontrolled related/analytical title")],
    },
    FieldDefinition {
        tag: 776,
        label: "Additional Physical Form Entry",
        subfields: &[
            ('a', "Main entry heading"),
            ('t', "Title"),
            ('w', "Record control number"),
            ('z', "International Standard Book Number"),
        ],
    },
    FieldDefinition {
        tag: 830,
        label: "Series Added Entry - Uniform Title",
        subfields: &[('a', "Uniform title"), ('v', "Volume/sequential designation")],
    },
    FieldDefinition {
        tag: 856,
        label: "Electronic Location and Access",
        subfields: &[
            ('u', "Uniform Resource Identifier"),
            ('y', "Link text"),
            ('z', "Public note"),
            ('3', "Materials specified"),
        ],
    },
];

/// Lowercases and collapses every run of non-alphanumeric characters into a
/// single space.
pub fn normalize_label(label: &str) -> String {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct LookupTable {
    fields: &'static [FieldDefinition],
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::marc21_bibliographic()
    }
}

impl LookupTable {
    pub fn marc21_bibliographic() -> Self {
        Self {
            fields: MARC21_BIBLIOGRAPHIC,
        }
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        self.fields
    }

    pub fn field_by_label(&self, label: &str) -> Option<&FieldDefinition> {
        let wanted = normalize_label(label);
        if wanted.is_empty() {
            return None;
        }
        self.fields
            .iter()
            .find(|f| normalize_label(f.label) == wanted)
    }

    pub fn field_by_tag(&self, tag: FieldTag) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.tag == tag.value())
    }

    /// The listing printed by `show_lookups`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Valid MARC field lookups\n");
        out.push_str("  fields:    -fl/--field_label_lookup \"<label>\"\n");
        out.push_str("  subfields: -sfl/--subfield_label_lookup \"<label>\"\n\n");

        for field in self.fields {
            // Tags in the table are always in range.
            out.push_str(&format!("{:03}  {}\n", field.tag, field.label));
            for (code, label) in field.subfields {
                out.push_str(&format!("       ${}  {}\n", code, label));
            }
        }

        out
    }

    /// Turns the parsed selectors into the MARC location a search targets.
    pub fn resolve(
        &self,
        field: Option<&FieldSelector>,
        subfield: Option<&SubfieldSelector>,
    ) -> Result<SearchTarget> {
        let target = match (field, subfield) {
            (None, None) => SearchTarget::AllFields,
            (None, Some(_)) => {
                return Err(FindRecordsError::SelectorError {
                    message: "a subfield can only be searched together with its field"
                        .to_string(),
                })
            }
            (Some(FieldSelector::Code(tag)), None) => SearchTarget::Field(*tag),
            (Some(FieldSelector::Code(tag)), Some(SubfieldSelector::Code(code))) => {
                SearchTarget::Subfield(*tag, *code)
            }
            (Some(FieldSelector::Label(label)), None) => {
                SearchTarget::Field(self.resolve_field_label(label)?.0)
            }
            (Some(FieldSelector::Label(label)), Some(SubfieldSelector::Label(sublabel))) => {
                let (tag, definition) = self.resolve_field_label(label)?;
                let code = Self::resolve_subfield_label(definition, sublabel)?;
                SearchTarget::Subfield(tag, code)
            }
            (Some(FieldSelector::Code(_)), Some(SubfieldSelector::Label(_))) => {
                return Err(FindRecordsError::SelectorError {
                    message: "a subfield label cannot be combined with -f/--field_lookup"
                        .to_string(),
                })
            }
            (Some(FieldSelector::Label(_)), Some(SubfieldSelector::Code(_))) => {
                return Err(FindRecordsError::SelectorError {
                    message: "a subfield code cannot be combined with -fl/--field_label_lookup"
                        .to_string(),
                })
            }
        };

        if let SearchTarget::Subfield(tag, _) = target {
            if tag.is_control_field() {
                return Err(FindRecordsError::SelectorError {
                    message: format!("control field {} has no subfields", tag),
                });
            }
        }

        tracing::debug!("Resolved search target: {}", target);
        Ok(target)
    }

    fn resolve_field_label(&self, label: &str) -> Result<(FieldTag, &FieldDefinition)> {
        let definition = self
            .field_by_label(label)
            .ok_or_else(|| FindRecordsError::UnknownFieldLabel {
                label: label.to_string(),
            })?;
        Ok((FieldTag::new(definition.tag)?, definition))
    }

    fn resolve_subfield_label(definition: &FieldDefinition, label: &str) -> Result<SubfieldCode> {
        let wanted = normalize_label(label);
        let unknown = || FindRecordsError::UnknownSubfieldLabel {
            field: format!("{:03}", definition.tag),
            label: label.to_string(),
        };

        if wanted.is_empty() {
            return Err(unknown());
        }

        let (code, _) = definition
            .subfields
            .iter()
            .find(|(_, l)| normalize_label(l) == wanted)
            .ok_or_else(unknown)?;
        SubfieldCode::new(*code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tag(t: u16) -> FieldTag {
        FieldTag::new(t).unwrap()
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Title Statement"), "title statement");
        assert_eq!(normalize_label("title_statement"), "title statement");
        assert_eq!(normalize_label("  TITLE--statement "), "title statement");
        assert_eq!(
            normalize_label("Publication, Distribution, etc. (Imprint)"),
            "publication distribution etc imprint"
        );
        assert_eq!(normalize_label("!!"), "");
    }

    #[test]
    fn test_table_labels_are_unique() {
        let table = LookupTable::default();
        let mut seen = HashSet::new();
        for field in table.fields() {
            assert!(seen.insert(normalize_label(field.label)), "{}", field.label);
            assert!(FieldTag::new(field.tag).is_ok());

            let mut subs = HashSet::new();
            for (code, label) in field.subfields {
                assert!(subs.insert(normalize_label(label)), "{} ${}", field.tag, code);
                assert!(SubfieldCode::new(*code).is_ok());
            }
            if field.tag < 10 {
                assert!(field.subfields.is_empty());
            }
        }
    }

    #[test]
    fn test_render_lists_fields_and_subfields() {
        let output = LookupTable::default().render();
        assert!(!output.is_empty());
        assert!(output.contains("001  Control Number"));
        assert!(output.contains("245  Title Statement"));
        assert!(output.contains("       $a  Title\n"));
        assert!(output.contains("856  Electronic Location and Access"));
    }

    #[test]
    fn test_resolve_without_selectors() {
        let table = LookupTable::default();
        assert_eq!(table.resolve(None, None).unwrap(), SearchTarget::AllFields);
    }

    #[test]
    fn test_resolve_codes() {
        let table = LookupTable::default();
        let field = FieldSelector::Code(tag(245));
        let sub = SubfieldSelector::Code(SubfieldCode::new('a').unwrap());

        assert_eq!(
            table.resolve(Some(&field), None).unwrap(),
            SearchTarget::Field(tag(245))
        );
        assert_eq!(
            table.resolve(Some(&field), Some(&sub)).unwrap(),
            SearchTarget::Subfield(tag(245), SubfieldCode::new('a').unwrap())
        );
    }

    #[test]
    fn test_resolve_codes_outside_table() {
        // Local fields are not in the table but can still be searched by code.
        let table = LookupTable::default();
        let field = FieldSelector::Code(tag(949));
        assert_eq!(
            table.resolve(Some(&field), None).unwrap(),
            SearchTarget::Field(tag(949))
        );
    }

    #[test]
    fn test_resolve_labels() {
        let table = LookupTable::default();
        let field = FieldSelector::Label("title_statement".to_string());
        let sub = SubfieldSelector::Label("Statement of Responsibility".to_string());

        assert_eq!(
            table.resolve(Some(&field), None).unwrap(),
            SearchTarget::Field(tag(245))
        );
        assert_eq!(
            table.resolve(Some(&field), Some(&sub)).unwrap(),
            SearchTarget::Subfield(tag(245), SubfieldCode::new('c').unwrap())
        );
    }

    #[test]
    fn test_subfield_labels_resolve_within_their_field() {
        let table = LookupTable::default();
        let sub = SubfieldSelector::Label("Relator term".to_string());

        let personal = FieldSelector::Label("Added Entry - Personal Name".to_string());
        assert_eq!(
            table.resolve(Some(&personal), Some(&sub)).unwrap(),
            SearchTarget::Subfield(tag(700), SubfieldCode::new('e').unwrap())
        );

        let title = FieldSelector::Label("Title Statement".to_string());
        let err = table.resolve(Some(&title), Some(&sub)).unwrap_err();
        assert!(matches!(err, FindRecordsError::UnknownSubfieldLabel { ref field, .. } if field == "245"));
    }

    #[test]
    fn test_unknown_field_label() {
        let table = LookupTable::default();
        let field = FieldSelector::Label("Favourite Colour".to_string());
        let err = table.resolve(Some(&field), None).unwrap_err();
        assert!(matches!(err, FindRecordsError::UnknownFieldLabel { .. }));
    }

    #[test]
    fn test_mixed_selectors_are_rejected() {
        let table = LookupTable::default();
        let code_field = FieldSelector::Code(tag(245));
        let label_field = FieldSelector::Label("Title Statement".to_string());
        let code_sub = SubfieldSelector::Code(SubfieldCode::new('a').unwrap());
        let label_sub = SubfieldSelector::Label("Title".to_string());

        assert!(matches!(
            table.resolve(Some(&code_field), Some(&label_sub)),
            Err(FindRecordsError::SelectorError { .. })
        ));
        assert!(matches!(
            table.resolve(Some(&label_field), Some(&code_sub)),
            Err(FindRecordsError::SelectorError { .. })
        ));
        assert!(matches!(
            table.resolve(None, Some(&code_sub)),
            Err(FindRecordsError::SelectorError { .. })
        ));
    }

    #[test]
    fn test_control_fields_have_no_subfields() {
        let table = LookupTable::default();
        let field = FieldSelector::Code(tag(1));
        let sub = SubfieldSelector::Code(SubfieldCode::new('a').unwrap());
        assert!(matches!(
            table.resolve(Some(&field), Some(&sub)),
            Err(FindRecordsError::SelectorError { .. })
        ));
        assert_eq!(
            table.resolve(Some(&field), None).unwrap(),
            SearchTarget::Field(tag(1))
        );
    }
}
