//! Namespace constants used by the processor that are not already part of
//! [`oxrdf::vocab`].

use oxrdf::NamedNodeRef;

/// The [XHTML Vocabulary](https://www.w3.org/1999/xhtml/vocab#), used to
/// expand the bare RDFa 1.0 term map and the empty-prefix CURIE on XHTML
/// hosts (§4.4.2, GLOSSARY "XHV").
pub const XHV: &str = "http://www.w3.org/1999/xhtml/vocab#";

/// `rdfa:usesVocabulary`, emitted whenever `@vocab` sets a non-empty default
/// vocabulary (§4.5 Step 2).
pub const RDFA_USES_VOCABULARY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/rdfa#usesVocabulary");

/// `rdfa:context`, used on processor-graph diagnostic nodes (§4.7).
pub const RDFA_CONTEXT: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/rdfa#context");

/// `dc:description`, used on processor-graph diagnostic nodes (§4.7).
pub const DC_DESCRIPTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");

/// `dc:date`, used on processor-graph diagnostic nodes (§4.7).
pub const DC_DATE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/terms/date");

/// The class IRI for a given [`MessageKind`](crate::error::MessageKind), per
/// §4.7's enumeration ("Info, Warning, Error, DocumentError,
/// ProfileReferenceError, UnresolvedCURIE, UnresolvedTerm").
pub fn message_class(kind: crate::error::MessageKind) -> NamedNodeRef<'static> {
    use crate::error::MessageKind::*;
    NamedNodeRef::new_unchecked(match kind {
        Info => "http://www.w3.org/ns/rdfa#Info",
        Warning => "http://www.w3.org/ns/rdfa#Warning",
        Error | LiteralError | PrefixError => "http://www.w3.org/ns/rdfa#Error",
        DocumentError => "http://www.w3.org/ns/rdfa#DocumentError",
        ProfileReferenceError => "http://www.w3.org/ns/rdfa#ProfileReferenceError",
        UnresolvedCurie => "http://www.w3.org/ns/rdfa#UnresolvedCURIE",
        UnresolvedTerm => "http://www.w3.org/ns/rdfa#UnresolvedTerm",
    })
}

/// `ptr:XPathPointer`, used as the `rdf:type` of the pointer blank node
/// attached to a diagnostic (§4.7).
pub const PTR_XPATH_POINTER: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2009/pointers#XPathPointer");

/// `ptr:expression`, carrying the element's path on a pointer blank node
/// (§4.7).
pub const PTR_EXPRESSION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2009/pointers#expression");

/// The default RDFa 1.0 term mappings, seeded into `term_mappings` before any
/// profile is merged (§4.5 Preamble): each bare term below expands into
/// `XHV` + the term itself.
pub const XHTML_1_0_DEFAULT_TERMS: &[&str] = &[
    "alternate",
    "appendix",
    "bookmark",
    "cite",
    "chapter",
    "contents",
    "copyright",
    "first",
    "glossary",
    "help",
    "icon",
    "index",
    "last",
    "license",
    "meta",
    "next",
    "p3pv1",
    "prev",
    "role",
    "section",
    "stylesheet",
    "subsection",
    "start",
    "top",
    "up",
];
