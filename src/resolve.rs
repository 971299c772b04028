//! C4 — Reference Resolver (§4.4).

use crate::context::EvaluationContext;
use crate::emitter::Messages;
use crate::error::MessageKind;
use crate::host::RdfaVersion;
use crate::utils::is_nc_name;
use crate::vocab::XHV;
use oxiri::Iri;
use oxrdf::{BlankNode, NamedNode};
use std::collections::HashMap;

/// Either kind of resource a resolved reference can denote (§4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Iri(NamedNode),
    Blank(BlankNode),
}

impl From<Resource> for oxrdf::Subject {
    fn from(r: Resource) -> Self {
        match r {
            Resource::Iri(n) => n.into(),
            Resource::Blank(b) => b.into(),
        }
    }
}

impl From<Resource> for oxrdf::Term {
    fn from(r: Resource) -> Self {
        match r {
            Resource::Iri(n) => n.into(),
            Resource::Blank(b) => b.into(),
        }
    }
}

/// A bitset of the restrictions a single reference-resolution call accepts
/// (§9 design note: "express restrictions as a bitset").
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Restrictions(u8);

impl Restrictions {
    const SAFE_CURIE: u8 = 1 << 0;
    const CURIE: u8 = 1 << 1;
    const TERM: u8 = 1 << 2;
    const URI: u8 = 1 << 3;
    const ABSURI: u8 = 1 << 4;
    const BNODE: u8 = 1 << 5;

    const fn new(bits: u8) -> Self {
        Self(bits)
    }

    fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// `SafeCURIEorCURIEorURI`, used for `@about`/`@resource` (§4.4).
    pub fn safe_curie_or_curie_or_uri(version: RdfaVersion) -> Self {
        match version {
            RdfaVersion::Rdfa10 => Self::new(Self::TERM | Self::SAFE_CURIE | Self::URI | Self::BNODE),
            RdfaVersion::Rdfa11 => {
                Self::new(Self::SAFE_CURIE | Self::CURIE | Self::TERM | Self::URI | Self::BNODE)
            }
        }
    }

    /// `TERMorCURIEorAbsURI`, used for `@typeof`/`@rel`/`@rev`/`@datatype`
    /// (§4.4).
    pub fn term_or_curie_or_abs_uri(version: RdfaVersion) -> Self {
        match version {
            RdfaVersion::Rdfa10 => Self::new(Self::TERM | Self::CURIE),
            RdfaVersion::Rdfa11 => Self::new(Self::TERM | Self::CURIE | Self::ABSURI),
        }
    }

    /// `TERMorCURIEorAbsURIprop`, used for `@property` (§4.4).
    pub fn term_or_curie_or_abs_uri_prop(version: RdfaVersion) -> Self {
        match version {
            RdfaVersion::Rdfa10 => Self::new(Self::CURIE),
            RdfaVersion::Rdfa11 => Self::new(Self::TERM | Self::CURIE | Self::ABSURI),
        }
    }

    /// `URI` only, used for `@src`/`@href` (§4.5 Step 5/6).
    pub fn uri_only() -> Self {
        Self::new(Self::URI)
    }
}

/// Per-document blank-node label scope (§3 "Blank Node", §9 "Blank-node
/// identity"). Two references with the same label denote the same node;
/// unlabelled nodes get a fresh identity at each call site.
#[derive(Debug, Default)]
pub struct BlankNodeScope(HashMap<String, BlankNode>);

impl BlankNodeScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up (or creates) the node for `label`, including the empty
    /// label (§4.4.2 "empty reference is allowed and has a stable identity
    /// within the document").
    pub fn labelled(&mut self, label: &str) -> BlankNode {
        self.0
            .entry(label.to_owned())
            .or_insert_with(BlankNode::default)
            .clone()
    }

    /// A fresh, never-reused node (§9 "unlabelled nodes get a fresh
    /// identity with each call site").
    pub fn fresh(&self) -> BlankNode {
        BlankNode::default()
    }
}

/// Resolves `token` under `restrictions`, following the first-applicable-
/// rule algorithm of §4.4. Never fails outright: malformed input is
/// recorded as a message and resolves to `None` (§4.4 step 7).
#[allow(clippy::too_many_arguments)]
pub fn resolve(
    token: &str,
    restrictions: Restrictions,
    context: &EvaluationContext,
    version: RdfaVersion,
    blank_nodes: &mut BlankNodeScope,
    messages: &mut Messages,
) -> Option<Resource> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    // Step 1: safe CURIE.
    if restrictions.has(Restrictions::SAFE_CURIE) {
        if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            return resolve_curie(inner, restrictions, context, version, blank_nodes, messages)
                .into_resolved();
        }
    }

    // Step 2: term.
    if restrictions.has(Restrictions::TERM) && is_nc_name(token) {
        return resolve_term(token, context, messages).map(Resource::Iri);
    }

    // Step 3: CURIE. A bnode-shaped token (`_:label`) is recognised under
    // the `bnode` restriction alone, even where the general `curie`
    // restriction is absent (the RDFa 1.0 `SafeCURIEorCURIEorURI` preset
    // allows bnodes but not bare, unbracketed CURIEs).
    if restrictions.has(Restrictions::CURIE) || restrictions.has(Restrictions::BNODE) {
        if let CurieOutcome::Resolved(r) =
            resolve_curie(token, restrictions, context, version, blank_nodes, messages)
        {
            return Some(r);
        }
        // An unsuccessful CURIE attempt (malformed prefix, or simply not a
        // CURIE) falls through to steps 4-6, unlike the safe-CURIE case in
        // step 1 which returns immediately (§4.4 step 3 is an "else if"
        // chain; step 1 is the one documented exception).
    }

    // Step 4: reserved-prefix guard, RDFa 1.0 only.
    if matches!(version, RdfaVersion::Rdfa10) && token.to_ascii_lowercase().starts_with("xml") {
        return None;
    }

    // Step 5: absolute URI only.
    if restrictions.has(Restrictions::ABSURI) {
        return match Iri::parse(token.to_owned()) {
            Ok(iri) => Some(Resource::Iri(NamedNode::new_unchecked(iri.into_inner()))),
            Err(_) => {
                messages.push(
                    MessageKind::UnresolvedCurie,
                    format!("'{token}' is not an absolute IRI"),
                );
                None
            }
        };
    }

    // Step 6: URI resolved against base.
    if restrictions.has(Restrictions::URI) {
        return resolve_uri(token, context, messages).map(Resource::Iri);
    }

    None
}

fn resolve_uri(token: &str, context: &EvaluationContext, messages: &mut Messages) -> Option<NamedNode> {
    let resolved = match &context.base {
        Some(base) => base.resolve(token),
        None => Iri::parse(token.to_owned()),
    };
    match resolved {
        Ok(iri) => Some(NamedNode::new_unchecked(iri.into_inner())),
        Err(error) => {
            messages.push(MessageKind::UnresolvedCurie, crate::error::invalid_iri(token, error));
            None
        }
    }
}

/// §4.4.1 Term resolution.
fn resolve_term(term: &str, context: &EvaluationContext, messages: &mut Messages) -> Option<NamedNode> {
    if let Some(iri) = context.term_mappings.get(term) {
        return Some(iri.clone());
    }
    if let Some(iri) = context.term_mapping_case_insensitive(term) {
        return Some(iri.clone());
    }
    if let Some(vocab) = &context.default_vocabulary {
        return Some(NamedNode::new_unchecked(format!("{}{term}", vocab.as_str())));
    }
    messages.push(
        MessageKind::UnresolvedTerm,
        format!("term '{term}' has no mapping and no default vocabulary is set"),
    );
    None
}

enum CurieOutcome {
    Resolved(Resource),
    NotACurie,
    Failed,
}

impl CurieOutcome {
    fn into_resolved(self) -> Option<Resource> {
        match self {
            Self::Resolved(r) => Some(r),
            Self::NotACurie | Self::Failed => None,
        }
    }
}

/// §4.4.2 CURIE resolution.
fn resolve_curie(
    token: &str,
    restrictions: Restrictions,
    context: &EvaluationContext,
    version: RdfaVersion,
    blank_nodes: &mut BlankNodeScope,
    messages: &mut Messages,
) -> CurieOutcome {
    let Some((prefix, reference)) = token.split_once(':') else {
        return CurieOutcome::NotACurie;
    };

    if prefix == "_" && restrictions.has(Restrictions::BNODE) {
        return CurieOutcome::Resolved(Resource::Blank(blank_nodes.labelled(reference)));
    }
    if !restrictions.has(Restrictions::CURIE) {
        // Only the `bnode` restriction was requested and this wasn't a
        // `_:`-prefixed token: nothing else in the CURIE algorithm applies.
        return CurieOutcome::NotACurie;
    }

    if prefix.is_empty() {
        // Empty-prefix CURIE: explicit declaration wins over the XHV
        // default (SPEC_FULL.md §D, resolving spec.md §9's open question).
        let iri = context
            .uri_mappings
            .get("")
            .cloned()
            .unwrap_or_else(|| XHV.to_owned());
        return CurieOutcome::Resolved(Resource::Iri(NamedNode::new_unchecked(format!(
            "{iri}{reference}"
        ))));
    }

    let lookup_prefix = if matches!(version, RdfaVersion::Rdfa11) {
        prefix.to_ascii_lowercase()
    } else {
        prefix.to_owned()
    };
    let Some(iri) = context.uri_mappings.get(&lookup_prefix) else {
        messages.push(
            MessageKind::UnresolvedCurie,
            format!("no prefix mapping for '{prefix}' in '{token}'"),
        );
        return CurieOutcome::Failed;
    };
    CurieOutcome::Resolved(Resource::Iri(NamedNode::new_unchecked(format!(
        "{iri}{reference}"
    ))))
}
