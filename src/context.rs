//! The per-element Evaluation Context (§3) that the traversal engine (C6)
//! carries down the recursion.

use oxiri::Iri;
use oxrdf::{NamedNode, Subject};
use std::collections::HashMap;
use std::rc::Rc;

/// Whether a pending [`IncompleteTriple`] completes as `(parent, p, child)`
/// (`rel`) or `(child, p, parent)` (`rev`), §4.5 Step 9.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// A pending `(predicate, direction)` entry awaiting a subject from a
/// descendant (§3 "incomplete_triples", GLOSSARY "Incomplete Triple").
#[derive(Debug, Clone)]
pub struct IncompleteTriple {
    pub predicate: NamedNode,
    pub direction: Direction,
}

/// The evaluation context itself (§3 table). Cloned on the way down and
/// mutated locally per element; a clone's mutations never back-propagate
/// to its parent (§3 invariant "Context scoping").
///
/// `uri_mappings`, `namespaces` and `term_mappings` are `Rc`-wrapped so
/// that a "skip" element that changes none of them (§3 Lifecycle) can reuse
/// its parent's maps without a deep copy; any element that *does* touch a
/// map calls `Rc::make_mut` (via the `*_mut` helpers below), which clones
/// only then (§9 "copy-on-mutate lazily").
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    pub base: Option<Iri<String>>,
    pub parent_subject: Option<Subject>,
    pub parent_object: Option<Subject>,
    pub uri_mappings: Rc<HashMap<String, String>>,
    pub namespaces: Rc<HashMap<String, String>>,
    pub incomplete_triples: Vec<IncompleteTriple>,
    pub language: Option<String>,
    pub term_mappings: Rc<HashMap<String, NamedNode>>,
    pub default_vocabulary: Option<NamedNode>,
}

impl EvaluationContext {
    /// Builds the document's initial context (§4.5 Preamble), before any
    /// profile has been merged.
    pub fn initial(base: Option<Iri<String>>) -> Self {
        Self {
            base,
            parent_subject: None,
            parent_object: None,
            uri_mappings: Rc::new(HashMap::new()),
            namespaces: Rc::new(HashMap::new()),
            incomplete_triples: Vec::new(),
            language: None,
            term_mappings: Rc::new(HashMap::new()),
            default_vocabulary: None,
        }
    }

    /// Mutable access to `uri_mappings`, cloning the shared map only on
    /// first write (§9).
    pub fn uri_mappings_mut(&mut self) -> &mut HashMap<String, String> {
        Rc::make_mut(&mut self.uri_mappings)
    }

    /// Mutable access to `namespaces`, cloning the shared map only on first
    /// write (§9).
    pub fn namespaces_mut(&mut self) -> &mut HashMap<String, String> {
        Rc::make_mut(&mut self.namespaces)
    }

    /// Mutable access to `term_mappings`, cloning the shared map only on
    /// first write (§9).
    pub fn term_mappings_mut(&mut self) -> &mut HashMap<String, NamedNode> {
        Rc::make_mut(&mut self.term_mappings)
    }

    /// A case-insensitive lookup used by 1.1's prefix and term resolution
    /// (§4.4.1 step 2, §3 "uri_mappings... case-insensitive in 1.1").
    pub fn uri_mapping_case_insensitive(&self, prefix: &str) -> Option<&str> {
        self.uri_mappings
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(prefix))
            .map(|(_, v)| v.as_str())
    }

    /// A case-insensitive lookup used by term resolution (§4.4.1 step 2).
    pub fn term_mapping_case_insensitive(&self, term: &str) -> Option<&NamedNode> {
        self.term_mappings
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(term))
            .map(|(_, v)| v)
    }
}
