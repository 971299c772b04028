//! C8 — Reader Facade (§6.1). Wires a parsed [`Document`] + base IRI +
//! options into the traversal engine (C6) and exposes a statement iterator,
//! the same shape as `oxrdfxml`'s `RdfXmlParser` / `FromReadRdfXmlReader`.

use crate::context::EvaluationContext;
use crate::dom::{Document, ElementNode};
use crate::emitter::{to_processor_graph, Messages};
use crate::error::{MessageKind, RdfaParseError, RdfaSyntaxError};
use crate::host::{DetectionHints, HostLanguage, RdfaVersion};
use crate::profile::{NullProfileLoader, Profile, ProfileLoader, XHTML_PROFILE_IRI, XML_PROFILE_IRI};
use crate::resolve::BlankNodeScope;
use crate::traversal::{process_element, StepOutcome};
use crate::vocab::XHTML_1_0_DEFAULT_TERMS;
use oxiri::Iri;
use oxrdf::{NamedNode, Triple};
use std::collections::HashMap;

/// Builder for an RDFa parse, mirroring `oxrdfxml::RdfXmlParser`'s
/// `#[derive(Default)] #[must_use]` + chainable `with_*` shape (§6.1).
#[derive(Default)]
#[must_use]
pub struct RdfaParser {
    base_uri: Option<String>,
    host_language: Option<HostLanguage>,
    version: Option<RdfaVersion>,
    encoding: Option<String>,
    validate: bool,
    canonicalize: bool,
    intern: bool,
    prefixes: HashMap<String, String>,
    processor_graph: bool,
    debug: bool,
}

impl RdfaParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the IRI relative IRIs are resolved against (default: none).
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_uri = Some(base_iri.into());
        self
    }

    /// Forces the host language instead of letting C1 detect it.
    pub fn with_host_language(mut self, host_language: HostLanguage) -> Self {
        self.host_language = Some(host_language);
        self
    }

    /// Forces the RDFa version instead of letting C1 detect it.
    pub fn with_version(mut self, version: RdfaVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Declares the input byte encoding (default: UTF-8; a `meta charset`
    /// found in the document may override it -- §6.1 `encoding`). The
    /// reader works from an already-parsed [`Document`], so this only
    /// documents intent for callers decoding bytes upstream.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// On a fatal validation error, fail the parse (§6.1 `validate`).
    pub fn with_validation(mut self) -> Self {
        self.validate = true;
        self
    }

    /// Interns resolved IRIs (§6.1 `intern`). A no-op placeholder here: RDF
    /// term interning is a property of the `oxrdf` term types themselves,
    /// not of this crate's resolution logic.
    pub fn with_interning(mut self) -> Self {
        self.intern = true;
        self
    }

    /// Keeps the recorded diagnostic buffer on [`RdfaOutput`] (§6.1
    /// `debug`); when unset, non-fatal messages are discarded after the
    /// `validate` check runs.
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Canonicalises literals/IRIs on emission (§6.1 `canonicalize`).
    /// Currently a no-op placeholder matching the option surface;
    /// canonicalisation rules are not part of RDFa Core.
    pub fn with_canonicalization(mut self) -> Self {
        self.canonicalize = true;
        self
    }

    /// Seeds the initial prefix -> IRI map (§6.1 `prefixes`).
    pub fn with_prefix(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), iri.into());
        self
    }

    /// Enables rendering recorded messages into an RDF processor graph
    /// (§6.1 `processor_graph`, §4.7).
    pub fn with_processor_graph(mut self) -> Self {
        self.processor_graph = true;
        self
    }

    /// Parses `document` into a buffer of triples, using `loader` for any
    /// referenced profile documents and `detection` to seed C1's hints.
    pub fn parse_document<D: Document>(
        &self,
        document: &D,
        detection: DetectionHints<'_>,
        loader: &mut impl ProfileLoader,
    ) -> Result<RdfaOutput, RdfaParseError> {
        let Some(root) = document.root() else {
            return Err(RdfaSyntaxError::msg(
                MessageKind::DocumentError,
                "document has no root element",
            )
            .into());
        };

        let (host, version) = crate::host::detect(&detection);
        let host = self.host_language.unwrap_or(host);
        let version = self.version.unwrap_or(version);

        let base = self
            .base_uri
            .clone()
            .or_else(|| document.find_head_base())
            .and_then(|b| Iri::parse(b).ok());
        let document_base = base
            .as_ref()
            .map(|iri| NamedNode::new_unchecked(iri.as_str()));

        let mut context = EvaluationContext::initial(base);
        for (prefix, iri) in &self.prefixes {
            context.uri_mappings_mut().insert(prefix.clone(), iri.clone());
        }
        if matches!(version, RdfaVersion::Rdfa10) {
            for term in XHTML_1_0_DEFAULT_TERMS {
                context.term_mappings_mut().insert(
                    (*term).to_owned(),
                    NamedNode::new_unchecked(format!("{}{term}", crate::vocab::XHV)),
                );
            }
        }

        let mut messages = Messages::default();
        if matches!(version, RdfaVersion::Rdfa11) {
            if let Err(error) =
                merge_default_profile(&mut context, XML_PROFILE_IRI, loader, &mut messages)
            {
                if self.validate {
                    return Err(RdfaSyntaxError::msg(error.kind(), error.to_string()).into());
                }
            }
            if host.has_head_body_rule() {
                if let Err(error) =
                    merge_default_profile(&mut context, XHTML_PROFILE_IRI, loader, &mut messages)
                {
                    if self.validate {
                        return Err(RdfaSyntaxError::msg(error.kind(), error.to_string()).into());
                    }
                }
            }
        }

        let mut blank_nodes = BlankNodeScope::new();
        let mut triples = Vec::new();
        walk(
            &root,
            &context,
            true,
            host,
            version,
            document_base.as_ref(),
            &mut blank_nodes,
            &mut messages,
            &mut triples,
        );

        if self.validate && messages.has_document_error() {
            return Err(RdfaSyntaxError::msg(
                MessageKind::DocumentError,
                "validation failed: a fatal diagnostic was recorded",
            )
            .into());
        }

        let processor_graph = if self.processor_graph {
            Some(to_processor_graph(
                &messages,
                document_base.as_ref(),
                "1970-01-01T00:00:00Z",
            ))
        } else {
            None
        };

        if !self.debug {
            messages = Messages::default();
        }

        Ok(RdfaOutput {
            triples,
            messages,
            processor_graph,
        })
    }
}

/// Merges the profile named by `iri` into `context`. A fetch/parse failure
/// is always recorded as a message; the caller decides whether `validate`
/// mode promotes the returned error to an abort (§4.2 "Loader failure in
/// validating mode aborts parsing; otherwise, an error is recorded and
/// processing continues").
fn merge_default_profile(
    context: &mut EvaluationContext,
    iri: &str,
    loader: &mut impl ProfileLoader,
    messages: &mut Messages,
) -> Result<(), crate::profile::ProfileReferenceError> {
    let Ok(parsed) = Iri::parse(iri.to_owned()) else {
        return Ok(());
    };
    match loader.find_profile(&parsed, context.base.as_ref()) {
        Ok(profile) => {
            merge_profile(context, profile);
            Ok(())
        }
        Err(error) => {
            messages.push(error.kind(), error.to_string());
            Err(error)
        }
    }
}

fn merge_profile(context: &mut EvaluationContext, profile: Profile) {
    for (prefix, iri) in profile.prefixes {
        context.uri_mappings_mut().entry(prefix).or_insert(iri);
    }
    for (term, iri) in profile.terms {
        context.term_mappings_mut().entry(term).or_insert(iri);
    }
    if context.default_vocabulary.is_none() {
        context.default_vocabulary = profile.vocabulary;
    }
}

/// Depth-first walk driving [`process_element`] over every element,
/// document order (§5 "Ordering").
#[allow(clippy::too_many_arguments)]
fn walk<E: ElementNode>(
    element: &E,
    context: &EvaluationContext,
    is_root: bool,
    host: HostLanguage,
    version: RdfaVersion,
    document_base: Option<&NamedNode>,
    blank_nodes: &mut BlankNodeScope,
    messages: &mut Messages,
    triples: &mut Vec<Triple>,
) {
    let outcome = process_element(
        element,
        context,
        is_root,
        host,
        version,
        document_base,
        blank_nodes,
        messages,
        triples,
    );
    let StepOutcome::Continue(child_context) = outcome else {
        return;
    };
    for child in element.children() {
        if let crate::dom::ChildNode::Element(child_element) = child {
            walk(
                &child_element,
                &child_context,
                false,
                host,
                version,
                document_base,
                blank_nodes,
                messages,
                triples,
            );
        }
    }
}

/// The result of a completed parse: the emitted triples plus diagnostics
/// (§6.1 `debug`/`processor_graph`).
pub struct RdfaOutput {
    pub triples: Vec<Triple>,
    pub messages: Messages,
    pub processor_graph: Option<Vec<Triple>>,
}

impl RdfaOutput {
    /// *each_statement*/*each_triple* surface (§6.1): an iterator over the
    /// emitted triples in document order.
    pub fn iter_triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ChildNode;

    #[derive(Clone, Default)]
    struct FixtureElement {
        name: &'static str,
        attrs: Vec<(&'static str, &'static str)>,
        children: Vec<FixtureElement>,
    }

    impl ElementNode for FixtureElement {
        fn local_name(&self) -> &str {
            self.name
        }

        fn namespace_uri(&self) -> Option<&str> {
            None
        }

        fn attribute(&self, name: &str) -> Option<&str> {
            self.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
        }

        fn attributes(&self) -> Vec<(&str, &str)> {
            self.attrs.clone()
        }

        fn namespace_declarations(&self) -> Vec<(Option<&str>, &str)> {
            Vec::new()
        }

        fn children(&self) -> Vec<ChildNode<Self>> {
            self.children
                .iter()
                .cloned()
                .map(ChildNode::Element)
                .collect()
        }

        fn text_content(&self) -> String {
            String::new()
        }

        fn serialize_inner_xml(&self) -> Result<String, String> {
            Ok(String::new())
        }
    }

    struct FixtureDocument(FixtureElement);

    impl Document for FixtureDocument {
        type Node = FixtureElement;

        fn root(&self) -> Option<Self::Node> {
            Some(self.0.clone())
        }
    }

    #[test]
    fn parses_nested_chaining_document() {
        let document = FixtureDocument(FixtureElement {
            name: "div",
            attrs: vec![("about", "http://a.example/s")],
            children: vec![FixtureElement {
                name: "span",
                attrs: vec![
                    ("rel", "http://a.example/p"),
                    ("resource", "http://a.example/o"),
                ],
                children: Vec::new(),
            }],
        });
        let parser = RdfaParser::new().with_version(RdfaVersion::Rdfa11);
        let result = parser
            .parse_document(
                &document,
                DetectionHints {
                    host_language: Some(HostLanguage::Xml1),
                    version: Some(RdfaVersion::Rdfa11),
                    ..Default::default()
                },
                &mut NullProfileLoader,
            )
            .unwrap();
        assert_eq!(result.triples.len(), 1);
    }

    #[test]
    fn profile_loader_failure_is_recorded_but_not_fatal_by_default() {
        let document = FixtureDocument(FixtureElement {
            name: "div",
            attrs: vec![("about", "http://a.example/s")],
            children: Vec::new(),
        });
        let parser = RdfaParser::new();
        let result = parser
            .parse_document(
                &document,
                DetectionHints {
                    host_language: Some(HostLanguage::Xml1),
                    version: Some(RdfaVersion::Rdfa11),
                    ..Default::default()
                },
                &mut NullProfileLoader,
            )
            .unwrap();
        assert!(result.triples.is_empty());
    }

    #[test]
    fn profile_loader_failure_aborts_parse_under_validation() {
        let document = FixtureDocument(FixtureElement {
            name: "div",
            attrs: vec![("about", "http://a.example/s")],
            children: Vec::new(),
        });
        let parser = RdfaParser::new().with_validation();
        let result = parser.parse_document(
            &document,
            DetectionHints {
                host_language: Some(HostLanguage::Xml1),
                version: Some(RdfaVersion::Rdfa11),
                ..Default::default()
            },
            &mut NullProfileLoader,
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_document_is_a_document_error() {
        struct EmptyDocument;
        impl Document for EmptyDocument {
            type Node = FixtureElement;
            fn root(&self) -> Option<Self::Node> {
                None
            }
        }
        let parser = RdfaParser::new();
        let result = parser.parse_document(
            &EmptyDocument,
            DetectionHints::default(),
            &mut NullProfileLoader,
        );
        assert!(result.is_err());
    }
}
