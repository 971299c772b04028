//! C7 — Emitter / Processor Graph (§4.7, §7).
//!
//! Statement emission itself is just `results.push(...)` against the
//! `Vec<Triple>` the traversal engine is handed (the same shape as
//! `oxrdfxml`'s `parse_event(event, results: &mut Vec<Triple>)`); this
//! module only owns the *diagnostic* side: the append-only message buffer
//! and, optionally, turning those messages into a processor graph.

use crate::error::MessageKind;
use crate::vocab;
use oxrdf::{BlankNode, NamedNode, Triple};

/// One diagnostic record (§7 "Propagation... written to the processor
/// graph and/or debug buffer").
#[derive(Debug, Clone)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    /// An XPath-like pointer to the element that produced the message, if
    /// the DOM adapter can supply one (§4.7 `ptr:expression`).
    pub element_path: Option<String>,
}

/// The append-only diagnostic buffer (§6.1 `debug` option).
#[derive(Debug, Clone, Default)]
pub struct Messages(Vec<Message>);

impl Messages {
    pub fn push(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.0.push(Message {
            kind,
            text: text.into(),
            element_path: None,
        });
    }

    pub fn push_at(&mut self, kind: MessageKind, text: impl Into<String>, element_path: String) {
        self.0.push(Message {
            kind,
            text: text.into(),
            element_path: Some(element_path),
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.0.iter()
    }

    /// Whether any recorded message is always-fatal (§7 `DocumentError`).
    pub fn has_document_error(&self) -> bool {
        self.0.iter().any(|m| m.kind.is_always_fatal())
    }
}

impl IntoIterator for Messages {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Renders every recorded [`Message`] as a processor-graph fragment (§4.7):
/// for each message, a fresh blank node `n` carrying `rdf:type`,
/// `dc:description`, `dc:date`, `rdfa:context`, plus a pointer blank node
/// typed `ptr:XPathPointer` with `ptr:expression` when an element path was
/// recorded. `now` is supplied by the caller (RDFa has no notion of
/// wall-clock time internally; see SPEC_FULL.md §A.4 on why this crate
/// never calls `Utc::now()`/`SystemTime::now()` itself).
pub fn to_processor_graph(
    messages: &Messages,
    document_base: Option<&NamedNode>,
    now: &str,
) -> Vec<Triple> {
    let mut triples = Vec::new();
    for message in messages.iter() {
        let node = BlankNode::default();
        triples.push(Triple::new(
            node.clone(),
            oxrdf::vocab::rdf::TYPE,
            vocab::message_class(message.kind),
        ));
        triples.push(Triple::new(
            node.clone(),
            vocab::DC_DESCRIPTION,
            oxrdf::Literal::new_simple_literal(message.text.clone()),
        ));
        triples.push(Triple::new(
            node.clone(),
            vocab::DC_DATE,
            oxrdf::Literal::new_simple_literal(now),
        ));
        if let Some(base) = document_base {
            triples.push(Triple::new(
                node.clone(),
                vocab::RDFA_CONTEXT,
                base.clone(),
            ));
        }
        if let Some(path) = &message.element_path {
            let pointer = BlankNode::default();
            triples.push(Triple::new(
                node,
                oxrdf::NamedNode::new_unchecked("http://www.w3.org/ns/rdfa#hasContext"),
                pointer.clone(),
            ));
            triples.push(Triple::new(
                pointer.clone(),
                oxrdf::vocab::rdf::TYPE,
                vocab::PTR_XPATH_POINTER,
            ));
            triples.push(Triple::new(
                pointer,
                vocab::PTR_EXPRESSION,
                oxrdf::Literal::new_simple_literal(path.clone()),
            ));
        }
    }
    triples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processor_graph_has_one_type_triple_per_message() {
        let mut messages = Messages::default();
        messages.push(MessageKind::Warning, "unresolved CURIE 'foo:bar'");
        let triples = to_processor_graph(&messages, None, "2024-01-01T00:00:00Z");
        let type_triples = triples
            .iter()
            .filter(|t| t.predicate == oxrdf::vocab::rdf::TYPE)
            .count();
        assert_eq!(type_triples, 1);
    }

    #[test]
    fn processor_graph_adds_pointer_when_path_known() {
        let mut messages = Messages::default();
        messages.push_at(MessageKind::Error, "boom", "/html/body/div[1]".to_owned());
        let triples = to_processor_graph(&messages, None, "2024-01-01T00:00:00Z");
        assert!(triples
            .iter()
            .any(|t| t.predicate == vocab::PTR_EXPRESSION));
    }
}
