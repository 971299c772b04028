//! C3 — Mapping Extractor (§4.3).

use crate::dom::ElementNode;
use crate::emitter::Messages;
use crate::error::MessageKind;
use crate::host::{HostLanguage, RdfaVersion};
use std::collections::HashMap;

/// A prefix that must never be mapped, on either source (§3 "Prefix `_`").
const BLANK_NODE_PREFIX: &str = "_";

/// Extracts `xmlns` declarations and the `prefix` attribute from `element`
/// into `uri_mappings`/`namespaces`, in the order specified by §4.3: xmlns
/// first, then `prefix` (1.1 only, so its entries can override xmlns ones).
pub fn extract_mappings<E: ElementNode>(
    element: &E,
    host: HostLanguage,
    version: RdfaVersion,
    uri_mappings: &mut HashMap<String, String>,
    namespaces: &mut HashMap<String, String>,
    messages: &mut Messages,
) {
    extract_xmlns(element, host, version, uri_mappings, namespaces);
    if version.has_prefix_attribute() {
        if let Some(prefix_attr) = element.attribute("prefix") {
            extract_prefix_attribute(prefix_attr, uri_mappings, messages);
        }
    }
}

fn extract_xmlns<E: ElementNode>(
    element: &E,
    host: HostLanguage,
    version: RdfaVersion,
    uri_mappings: &mut HashMap<String, String>,
    namespaces: &mut HashMap<String, String>,
) {
    let declarations = element.namespace_declarations();
    if !declarations.is_empty() {
        for (prefix, iri) in declarations {
            apply_xmlns(prefix, iri, version, uri_mappings, namespaces);
        }
        return;
    }
    if !host.is_html() {
        // Non-HTML hosts with no namespace nodes genuinely have none
        // declared on this element; nothing to scan for.
        return;
    }
    // HTML hosts may not expose namespace nodes at all: fall back to
    // scanning attributes matching `xmlns` or `xmlns:<prefix>` (§4.3 item 1).
    for (name, value) in element.attributes() {
        if name == "xmlns" {
            apply_xmlns(None, value, version, uri_mappings, namespaces);
        } else if let Some(prefix) = name.strip_prefix("xmlns:") {
            apply_xmlns(Some(prefix), value, version, uri_mappings, namespaces);
        }
    }
}

fn apply_xmlns(
    prefix: Option<&str>,
    iri: &str,
    version: RdfaVersion,
    uri_mappings: &mut HashMap<String, String>,
    namespaces: &mut HashMap<String, String>,
) {
    let Some(prefix) = prefix else {
        // "The unprefixed `xmlns` sets the empty-prefix namespace only."
        namespaces.insert(String::new(), iri.to_owned());
        uri_mappings.insert(String::new(), iri.to_owned());
        return;
    };
    if prefix == BLANK_NODE_PREFIX {
        return;
    }
    let key = if matches!(version, RdfaVersion::Rdfa11) {
        prefix.to_ascii_lowercase()
    } else {
        prefix.to_owned()
    };
    namespaces.insert(key.clone(), iri.to_owned());
    uri_mappings.insert(key, iri.to_owned());
}

/// Parses the `prefix` attribute's whitespace-separated `NCName:` `<IRI>`
/// pairs (§4.3 item 2, RDFa 1.1 only).
fn extract_prefix_attribute(
    value: &str,
    uri_mappings: &mut HashMap<String, String>,
    messages: &mut Messages,
) {
    let tokens: Vec<&str> = value.split_ascii_whitespace().collect();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        let Some(prefix) = token.strip_suffix(':') else {
            // "A token lacking the trailing colon terminates the current
            // pair and is ignored."
            i += 1;
            continue;
        };
        let Some(&iri) = tokens.get(i + 1) else {
            // No IRI token follows; nothing to pair this prefix with.
            break;
        };
        i += 2;
        if prefix == BLANK_NODE_PREFIX {
            continue;
        }
        if !is_restricted_prefix(prefix) {
            messages.push(
                MessageKind::PrefixError,
                format!("'{prefix}' is not a valid NCName-restricted prefix"),
            );
            continue;
        }
        uri_mappings.insert(prefix.to_ascii_lowercase(), iri.to_owned());
    }
}

/// The restricted NCName form the `prefix` attribute requires (§3 invariant
/// "Prefix NCName"): `[A-Za-z_][A-Za-z0-9_.-]*`.
pub fn is_restricted_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
