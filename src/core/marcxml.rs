//! MARC XML extraction from SRU `searchRetrieve` responses.
//!
//! Records are cut out of the SRU envelope and re-serialized from the parsed
//! tree, carrying along every namespace declaration they depend on, so each
//! one can be written out as a standalone document.

use crate::domain::model::MarcXmlRecord;
use crate::utils::error::{FindRecordsError, Result};
use roxmltree::{Document, Node};
use std::collections::HashSet;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Returns every record found in the response; no records is not an error.
pub fn records_from_sru_response(body: &str, bib_number: &str) -> Result<Vec<MarcXmlRecord>> {
    let doc = Document::parse(body)?;

    if let Some(message) = diagnostic_message(&doc) {
        return Err(FindRecordsError::SruDiagnostic {
            bib_number: bib_number.to_string(),
            message,
        });
    }

    let mut records = Vec::new();

    for data in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "recordData")
    {
        if let Some(element) = data.children().find(|c| c.is_element()) {
            records.push(MarcXmlRecord::new(serialize_element(element)));
            continue;
        }

        // recordPacking=string: the record arrives as escaped text.
        let packed: String = data
            .children()
            .filter(|c| c.is_text())
            .filter_map(|c| c.text())
            .collect();
        let packed = packed.trim();
        if packed.is_empty() {
            tracing::warn!("Empty recordData element for bib number {}", bib_number);
            continue;
        }

        let inner = Document::parse(packed)?;
        records.push(MarcXmlRecord::new(serialize_element(inner.root_element())));
    }

    tracing::debug!(
        "SRU response for bib number {} held {} record(s)",
        bib_number,
        records.len()
    );
    Ok(records)
}

fn diagnostic_message(doc: &Document) -> Option<String> {
    let diagnostic = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "diagnostic")?;

    ["message", "details", "uri"]
        .iter()
        .find_map(|name| child_text(diagnostic, name))
        .or_else(|| Some("unspecified SRU diagnostic".to_string()))
}

fn child_text(node: Node, name: &str) -> Option<String> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
        .and_then(|c| c.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Serializes `node` and its subtree as a self-contained element.
pub fn serialize_element(node: Node) -> String {
    let used = used_namespaces(node);
    let mut out = String::new();
    write_element(node, None, &used, &mut out);
    out
}

fn used_namespaces<'a>(root: Node<'a, '_>) -> HashSet<&'a str> {
    let mut used = HashSet::new();
    for node in root.descendants().filter(|n| n.is_element()) {
        if let Some(uri) = node.tag_name().namespace() {
            used.insert(uri);
        }
        for attr in node.attributes() {
            if let Some(uri) = attr.namespace() {
                used.insert(uri);
            }
        }
    }
    used
}

fn default_namespace<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.namespaces()
        .find(|ns| ns.name().is_none())
        .map(|ns| ns.uri())
        .filter(|uri| !uri.is_empty())
}

fn prefix_for<'a>(node: Node<'a, '_>, uri: &str) -> Option<&'a str> {
    if uri == XML_NAMESPACE {
        return Some("xml");
    }
    node.namespaces()
        .find(|ns| ns.name().is_some() && ns.uri() == uri)
        .and_then(|ns| ns.name())
}

fn element_name(node: Node) -> String {
    let local = node.tag_name().name();
    match node.tag_name().namespace() {
        Some(uri) if default_namespace(node) == Some(uri) => local.to_string(),
        Some(uri) => match prefix_for(node, uri) {
            Some(prefix) => format!("{}:{}", prefix, local),
            None => local.to_string(),
        },
        None => local.to_string(),
    }
}

fn write_element(node: Node, parent: Option<Node>, used: &HashSet<&str>, out: &mut String) {
    let name = element_name(node);
    out.push('<');
    out.push_str(&name);

    for ns in node.namespaces() {
        if ns.name() == Some("xml") || ns.uri().is_empty() {
            continue;
        }
        let declare = match parent {
            // The root declares whatever in-scope namespace its subtree uses.
            None => used.contains(ns.uri()),
            Some(p) => !p
                .namespaces()
                .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri()),
        };
        if !declare {
            continue;
        }
        match ns.name() {
            Some(prefix) => out.push_str(&format!(" xmlns:{}=\"", prefix)),
            None => out.push_str(" xmlns=\""),
        }
        escape_into(ns.uri(), true, out);
        out.push('"');
    }

    if let Some(p) = parent {
        if default_namespace(p).is_some() && default_namespace(node).is_none() {
            out.push_str(" xmlns=\"\"");
        }
    }

    for attr in node.attributes() {
        out.push(' ');
        if let Some(prefix) = attr.namespace().and_then(|uri| prefix_for(node, uri)) {
            out.push_str(prefix);
            out.push(':');
        }
        out.push_str(attr.name());
        out.push_str("=\"");
        escape_into(attr.value(), true, out);
        out.push('"');
    }

    let content: Vec<Node> = node
        .children()
        .filter(|c| c.is_element() || c.is_text())
        .collect();

    if content.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in content {
        if child.is_element() {
            write_element(child, Some(node), used, out);
        } else if let Some(text) = child.text() {
            escape_into(text, false, out);
        }
    }
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\'' if attribute => out.push_str("&apos;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\t' if attribute => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
}
