//! C6 — Traversal Engine (§4.5). The per-element procedure; driving the
//! recursion over a concrete [`ElementNode`] tree is the reader's job
//! (`src/reader.rs`), so this module exposes a single-element step rather
//! than a self-contained walk.

use crate::context::{Direction, EvaluationContext, IncompleteTriple};
use crate::dom::ElementNode;
use crate::emitter::Messages;
use crate::host::{HostLanguage, RdfaVersion};
use crate::literal::{build_literal, LiteralInput};
use crate::resolve::{resolve, BlankNodeScope, Resource, Restrictions};
use crate::vocab::RDFA_USES_VOCABULARY;
use oxiri::Iri;
use oxrdf::vocab::rdf;
use oxrdf::{NamedNode, Subject, Term, Triple};

/// What the caller should do after processing one element (§4.5 Step 12).
pub enum StepOutcome {
    /// The element produced an XML literal in RDFa 1.0; its children are
    /// markup, not RDFa-bearing elements, and must not be walked.
    Stop,
    /// Descend into the element's children under this context.
    Continue(EvaluationContext),
}

fn attr<'a, E: ElementNode>(element: &'a E, name: &str) -> Option<&'a str> {
    element.attribute(name).map(str::trim)
}

fn base_as_subject(base: &Option<Iri<String>>) -> Option<Subject> {
    base.as_ref()
        .map(|iri| Subject::from(NamedNode::new_unchecked(iri.as_str())))
}

fn resolve_attr<E: ElementNode>(
    element: &E,
    name: &str,
    restrictions: Restrictions,
    context: &EvaluationContext,
    version: RdfaVersion,
    blank_nodes: &mut BlankNodeScope,
    messages: &mut Messages,
) -> Option<Subject> {
    attr(element, name)
        .and_then(|v| resolve(v, restrictions, context, version, blank_nodes, messages))
        .map(Subject::from)
}

fn resolve_token_list<E: ElementNode>(
    element: &E,
    name: &str,
    restrictions: Restrictions,
    context: &EvaluationContext,
    version: RdfaVersion,
    blank_nodes: &mut BlankNodeScope,
    messages: &mut Messages,
) -> Vec<NamedNode> {
    let Some(value) = attr(element, name) else {
        return Vec::new();
    };
    value
        .split_whitespace()
        .filter_map(|token| {
            match resolve(token, restrictions, context, version, blank_nodes, messages) {
                Some(Resource::Iri(iri)) => Some(iri),
                _ => None,
            }
        })
        .collect()
}

/// Runs the per-element procedure of §4.5 for `element` under `context`,
/// pushing emitted triples onto `triples` and returning the context its
/// children should be walked under (or [`StepOutcome::Stop`] when the
/// element's children are XML-literal markup).
#[allow(clippy::too_many_arguments)]
pub fn process_element<E: ElementNode>(
    element: &E,
    context: &EvaluationContext,
    is_root: bool,
    host: HostLanguage,
    version: RdfaVersion,
    document_base: Option<&NamedNode>,
    blank_nodes: &mut BlankNodeScope,
    messages: &mut Messages,
    triples: &mut Vec<Triple>,
) -> StepOutcome {
    let mut ctx = context.clone();
    let mut recurse = true;
    let mut skip = false;

    // Base update (§4.5 "Base update").
    if host.supports_xml_base() {
        if let Some(value) = attr(element, "xml:base") {
            if !value.is_empty() {
                let resolved = match &ctx.base {
                    Some(base) => base.resolve(value),
                    None => Iri::parse(value.to_owned()),
                };
                match resolved {
                    Ok(iri) => ctx.base = Some(iri),
                    Err(error) => messages.push(
                        crate::error::MessageKind::UnresolvedCurie,
                        format!("invalid xml:base '{value}': {error}"),
                    ),
                }
            }
        }
    }

    // Step 2 -- @vocab.
    if let Some(value) = attr(element, "vocab") {
        if value.is_empty() {
            // "reset default_vocabulary to host default" -- no host defines
            // one beyond the 1.0 term map (which is unaffected by @vocab),
            // so the host default is the absence of a default vocabulary.
            ctx.default_vocabulary = None;
        } else if let Some(Resource::Iri(iri)) = resolve(
            value,
            Restrictions::uri_only(),
            &ctx,
            version,
            blank_nodes,
            messages,
        ) {
            ctx.default_vocabulary = Some(iri.clone());
            if let Some(base) = document_base {
                triples.push(Triple::new(base.clone(), RDFA_USES_VOCABULARY, iri));
            }
        }
    }

    // Step 3 -- mappings.
    crate::mapping::extract_mappings(
        element,
        host,
        version,
        ctx.uri_mappings_mut(),
        ctx.namespaces_mut(),
        messages,
    );

    // Step 4 -- language. The literal spec text's "HTML hosts prefer
    // xml:lang over lang" is already implied by checking xml:lang first
    // regardless of host.
    match attr(element, "xml:lang").or_else(|| attr(element, "lang")) {
        Some("") => ctx.language = None,
        Some(value) => ctx.language = Some(value.to_owned()),
        None => {}
    }

    let has_rel_rev = element.attribute("rel").is_some() || element.attribute("rev").is_some();
    let typeof_present = attr(element, "typeof").is_some();
    let local_name = element.local_name();
    let is_head_or_body =
        host.has_head_body_rule() && matches!(local_name, "head" | "body");

    let mut new_subject: Option<Subject>;
    let mut current_object_resource: Option<Subject> = None;

    if !has_rel_rev {
        // Step 5 -- subject when no @rel/@rev.
        new_subject = resolve_attr(
            element,
            "about",
            Restrictions::safe_curie_or_curie_or_uri(version),
            &ctx,
            version,
            blank_nodes,
            messages,
        )
        .or_else(|| {
            resolve_attr(
                element,
                "src",
                Restrictions::uri_only(),
                &ctx,
                version,
                blank_nodes,
                messages,
            )
        })
        .or_else(|| {
            resolve_attr(
                element,
                "resource",
                Restrictions::safe_curie_or_curie_or_uri(version),
                &ctx,
                version,
                blank_nodes,
                messages,
            )
        })
        .or_else(|| {
            resolve_attr(
                element,
                "href",
                Restrictions::uri_only(),
                &ctx,
                version,
                blank_nodes,
                messages,
            )
        });

        if new_subject.is_none() {
            if is_head_or_body {
                new_subject = base_as_subject(&ctx.base);
            } else if is_root && ctx.base.is_some() {
                new_subject = base_as_subject(&ctx.base);
            } else if typeof_present {
                new_subject = Some(Subject::from(blank_nodes.fresh()));
            } else {
                new_subject = context.parent_object.clone();
                if attr(element, "property").is_none() {
                    skip = true;
                }
            }
        }
    } else {
        // Step 6 -- subject when @rel or @rev present.
        new_subject = resolve_attr(
            element,
            "about",
            Restrictions::safe_curie_or_curie_or_uri(version),
            &ctx,
            version,
            blank_nodes,
            messages,
        )
        .or_else(|| {
            resolve_attr(
                element,
                "src",
                Restrictions::uri_only(),
                &ctx,
                version,
                blank_nodes,
                messages,
            )
        });

        if new_subject.is_none() {
            if is_head_or_body {
                new_subject = base_as_subject(&ctx.base);
            } else if is_root && ctx.base.is_some() {
                new_subject = base_as_subject(&ctx.base);
            } else if typeof_present {
                new_subject = Some(Subject::from(blank_nodes.fresh()));
            } else {
                new_subject = context.parent_object.clone();
            }
        }

        current_object_resource = resolve_attr(
            element,
            "resource",
            Restrictions::safe_curie_or_curie_or_uri(version),
            &ctx,
            version,
            blank_nodes,
            messages,
        )
        .or_else(|| {
            resolve_attr(
                element,
                "href",
                Restrictions::uri_only(),
                &ctx,
                version,
                blank_nodes,
                messages,
            )
        });
    }

    // Step 7 -- @typeof.
    if let Some(subject) = &new_subject {
        for type_iri in resolve_token_list(
            element,
            "typeof",
            Restrictions::term_or_curie_or_abs_uri(version),
            &ctx,
            version,
            blank_nodes,
            messages,
        ) {
            triples.push(Triple::new(subject.clone(), rdf::TYPE, type_iri));
        }
    }

    // Step 8 -- complete rel/rev locally.
    if let (Some(subject), Some(object)) = (&new_subject, &current_object_resource) {
        let object_term: Term = object.clone().into();
        let subject_term: Term = subject.clone().into();
        for predicate in resolve_token_list(
            element,
            "rel",
            Restrictions::term_or_curie_or_abs_uri(version),
            &ctx,
            version,
            blank_nodes,
            messages,
        ) {
            triples.push(Triple::new(subject.clone(), predicate, object_term.clone()));
        }
        for predicate in resolve_token_list(
            element,
            "rev",
            Restrictions::term_or_curie_or_abs_uri(version),
            &ctx,
            version,
            blank_nodes,
            messages,
        ) {
            triples.push(Triple::new(object.clone(), predicate, subject_term.clone()));
        }
    }

    // Step 9 -- defer to a child.
    let mut local_incomplete = Vec::new();
    if has_rel_rev && current_object_resource.is_none() {
        current_object_resource = Some(Subject::from(blank_nodes.fresh()));
        for predicate in resolve_token_list(
            element,
            "rel",
            Restrictions::term_or_curie_or_abs_uri(version),
            &ctx,
            version,
            blank_nodes,
            messages,
        ) {
            local_incomplete.push(IncompleteTriple {
                predicate,
                direction: Direction::Forward,
            });
        }
        for predicate in resolve_token_list(
            element,
            "rev",
            Restrictions::term_or_curie_or_abs_uri(version),
            &ctx,
            version,
            blank_nodes,
            messages,
        ) {
            local_incomplete.push(IncompleteTriple {
                predicate,
                direction: Direction::Reverse,
            });
        }
    }

    // Step 11 -- complete incoming incomplete triples. Runs before Step 10's
    // literal emission so that, within one element, completions precede the
    // literal triples in the emitted order (§5 "Ordering").
    if !skip {
        if let Some(subject) = &new_subject {
            if let Some(parent_subject) = &context.parent_subject {
                let subject_term: Term = subject.clone().into();
                let parent_term: Term = parent_subject.clone().into();
                for pending in &context.incomplete_triples {
                    match pending.direction {
                        Direction::Forward => triples.push(Triple::new(
                            parent_subject.clone(),
                            pending.predicate.clone(),
                            subject_term.clone(),
                        )),
                        Direction::Reverse => triples.push(Triple::new(
                            subject.clone(),
                            pending.predicate.clone(),
                            parent_term.clone(),
                        )),
                    }
                }
            }
        }
    }

    // Step 10 -- @property (literal emission).
    if let Some(property_value) = attr(element, "property") {
        let predicates: Vec<NamedNode> = property_value
            .split_whitespace()
            .filter_map(|token| {
                match resolve(
                    token,
                    Restrictions::term_or_curie_or_abs_uri_prop(version),
                    &ctx,
                    version,
                    blank_nodes,
                    messages,
                ) {
                    Some(Resource::Iri(iri)) => Some(iri),
                    _ => None,
                }
            })
            .collect();

        if !predicates.is_empty() {
            let content_attr = attr(element, "content");
            let datatype_attr = attr(element, "datatype");
            let datatype_iri = match datatype_attr {
                Some(d) if !d.is_empty() => match resolve(
                    d,
                    Restrictions::term_or_curie_or_abs_uri(version),
                    &ctx,
                    version,
                    blank_nodes,
                    messages,
                ) {
                    Some(Resource::Iri(iri)) => Some(iri),
                    _ => None,
                },
                _ => None,
            };
            let input = LiteralInput {
                content_attr,
                datatype_attr,
                datatype_iri,
                language: ctx.language.as_deref(),
            };
            if let Some((value, recurse_flag)) =
                build_literal(element, &input, &ctx.namespaces, version, messages)
            {
                recurse = recurse_flag;
                if let Some(subject) = &new_subject {
                    let literal = value.into_literal();
                    for predicate in &predicates {
                        triples.push(Triple::new(
                            subject.clone(),
                            predicate.clone(),
                            literal.clone(),
                        ));
                    }
                }
            }
        }
    }

    // Step 12 -- recurse.
    if !recurse {
        return StepOutcome::Stop;
    }

    if skip {
        // `ctx` already equals "reuse parent's context, overlaid with any
        // locally-changed fields" -- it was cloned from `context` and only
        // the fields §3's Lifecycle names (base, uri_mappings, namespaces,
        // language, term_mappings, default_vocabulary) were ever mutated in
        // place; parent_subject/parent_object/incomplete_triples are
        // untouched. Map-valued fields stay `Rc`-aliased with the parent
        // when nothing actually changed (§9 "copy-on-mutate lazily").
        StepOutcome::Continue(ctx)
    } else {
        let parent_object = current_object_resource
            .clone()
            .or_else(|| new_subject.clone())
            .or_else(|| context.parent_subject.clone());
        let child = EvaluationContext {
            base: ctx.base,
            parent_subject: new_subject.or_else(|| context.parent_subject.clone()),
            parent_object,
            uri_mappings: ctx.uri_mappings,
            namespaces: ctx.namespaces,
            incomplete_triples: local_incomplete,
            language: ctx.language,
            term_mappings: ctx.term_mappings,
            default_vocabulary: ctx.default_vocabulary,
        };
        StepOutcome::Continue(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ChildNode;

    #[derive(Clone, Default)]
    struct FakeElement {
        name: &'static str,
        attrs: Vec<(&'static str, &'static str)>,
    }

    impl FakeElement {
        fn new(name: &'static str, attrs: Vec<(&'static str, &'static str)>) -> Self {
            Self { name, attrs }
        }
    }

    impl ElementNode for FakeElement {
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
            Vec::new()
        }

        fn text_content(&self) -> String {
            String::new()
        }

        fn serialize_inner_xml(&self) -> Result<String, String> {
            Ok(String::new())
        }
    }

    fn fresh_state() -> (BlankNodeScope, Messages, Vec<Triple>) {
        (BlankNodeScope::new(), Messages::default(), Vec::new())
    }

    #[test]
    fn s1_chaining_through_resource_and_rel() {
        let root = FakeElement::new("div", vec![("about", "http://a.example/s")]);
        let child = FakeElement::new(
            "span",
            vec![
                ("rel", "http://a.example/p"),
                ("resource", "http://a.example/o"),
            ],
        );
        let (mut blanks, mut messages, mut triples) = fresh_state();
        let ctx = EvaluationContext::initial(None);
        let outcome = process_element(
            &root,
            &ctx,
            true,
            HostLanguage::Xml1,
            RdfaVersion::Rdfa11,
            None,
            &mut blanks,
            &mut messages,
            &mut triples,
        );
        let StepOutcome::Continue(child_ctx) = outcome else {
            panic!("expected to recurse");
        };
        process_element(
            &child,
            &child_ctx,
            false,
            HostLanguage::Xml1,
            RdfaVersion::Rdfa11,
            None,
            &mut blanks,
            &mut messages,
            &mut triples,
        );
        assert_eq!(triples.len(), 1);
        let t = &triples[0];
        assert_eq!(t.subject, NamedNode::new_unchecked("http://a.example/s").into());
        assert_eq!(t.predicate, NamedNode::new_unchecked("http://a.example/p"));
        assert_eq!(t.object, NamedNode::new_unchecked("http://a.example/o").into());
    }

    #[test]
    fn s2_typeof_on_anonymous_produces_fresh_blank_subject() {
        let element = FakeElement::new("div", vec![("typeof", "http://a.example/T")]);
        let (mut blanks, mut messages, mut triples) = fresh_state();
        let ctx = EvaluationContext::initial(None);
        process_element(
            &element,
            &ctx,
            true,
            HostLanguage::Xml1,
            RdfaVersion::Rdfa11,
            None,
            &mut blanks,
            &mut messages,
            &mut triples,
        );
        assert_eq!(triples.len(), 1);
        assert!(matches!(triples[0].subject, Subject::BlankNode(_)));
        assert_eq!(
            triples[0].object,
            NamedNode::new_unchecked("http://a.example/T").into()
        );
    }

    #[test]
    fn s4_incomplete_triple_completed_by_descendant() {
        let root = FakeElement::new(
            "div",
            vec![
                ("about", "http://a.example/s"),
                ("rel", "http://a.example/p"),
            ],
        );
        let child = FakeElement::new("span", vec![("about", "http://a.example/o")]);
        let (mut blanks, mut messages, mut triples) = fresh_state();
        let ctx = EvaluationContext::initial(None);
        let outcome = process_element(
            &root,
            &ctx,
            true,
            HostLanguage::Xml1,
            RdfaVersion::Rdfa11,
            None,
            &mut blanks,
            &mut messages,
            &mut triples,
        );
        let StepOutcome::Continue(child_ctx) = outcome else {
            panic!("expected to recurse");
        };
        // Deferred: no triple yet (object was a fresh blank, not completed).
        assert!(triples.is_empty());
        process_element(
            &child,
            &child_ctx,
            false,
            HostLanguage::Xml1,
            RdfaVersion::Rdfa11,
            None,
            &mut blanks,
            &mut messages,
            &mut triples,
        );
        assert_eq!(triples.len(), 1);
        let t = &triples[0];
        assert_eq!(t.subject, NamedNode::new_unchecked("http://a.example/s").into());
        assert_eq!(t.predicate, NamedNode::new_unchecked("http://a.example/p"));
        assert_eq!(t.object, NamedNode::new_unchecked("http://a.example/o").into());
    }

    #[test]
    fn s6_vocab_reset_clears_default_vocabulary() {
        let outer = FakeElement::new("div", vec![("vocab", "http://v.example/")]);
        let inner = FakeElement::new("span", vec![("vocab", "")]);
        let (mut blanks, mut messages, mut triples) = fresh_state();
        let ctx = EvaluationContext::initial(None);
        let outcome = process_element(
            &outer,
            &ctx,
            true,
            HostLanguage::Xml1,
            RdfaVersion::Rdfa11,
            None,
            &mut blanks,
            &mut messages,
            &mut triples,
        );
        let StepOutcome::Continue(outer_ctx) = outcome else {
            panic!("expected to recurse");
        };
        assert_eq!(
            outer_ctx.default_vocabulary,
            Some(NamedNode::new_unchecked("http://v.example/"))
        );
        let outcome = process_element(
            &inner,
            &outer_ctx,
            false,
            HostLanguage::Xml1,
            RdfaVersion::Rdfa11,
            None,
            &mut blanks,
            &mut messages,
            &mut triples,
        );
        let StepOutcome::Continue(inner_ctx) = outcome else {
            panic!("expected to recurse");
        };
        assert_eq!(inner_ctx.default_vocabulary, None);
    }
}
