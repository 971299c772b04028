//! The DOM boundary (spec.md §1: "The HTML/XML parser producing the DOM" is
//! an external collaborator; only its interface is defined here, per
//! SPEC_FULL.md §B).
//!
//! The traversal engine (§4.5) only ever needs to ask an element for its
//! name, its attributes, its namespace declarations, and its children in
//! document order. Any tree — an `html5ever` `RcDom`, a `scraper::Html`, a
//! hand-rolled `quick_xml`-backed tree — can satisfy that by implementing
//! [`ElementNode`] and [`Document`].

/// A child of an element: either a nested element or a text run, in
/// document order. Mirrors how `quick_xml`/DOM APIs expose mixed content.
#[derive(Clone)]
pub enum ChildNode<E> {
    Element(E),
    Text(String),
}

/// The read-only view the traversal engine needs of one element.
pub trait ElementNode: Clone {
    /// The element's local name (no namespace prefix), e.g. `"span"`.
    fn local_name(&self) -> &str;

    /// The element's namespace IRI, if the host DOM tracks one.
    fn namespace_uri(&self) -> Option<&str>;

    /// Looks up an attribute by its fully-qualified name, e.g.
    /// `"about"`, `"xml:lang"`, `"xmlns:foaf"`. Values are returned
    /// untrimmed; the traversal engine trims them (§4.5 "Strings are
    /// trimmed before use").
    fn attribute(&self, name: &str) -> Option<&str>;

    /// All attributes as `(name, value)` pairs, in document order. Used by
    /// the mapping extractor (C3) to scan for `xmlns*` attributes on hosts
    /// whose DOM doesn't expose namespace nodes separately (§4.3 item 1),
    /// and by the traversal engine for "property attributes" and generic
    /// attribute enumeration.
    fn attributes(&self) -> Vec<(&str, &str)>;

    /// Namespace declarations exposed as first-class nodes by the host DOM
    /// (as opposed to attribute scanning), `(prefix, iri)`. `prefix` is
    /// `None` for the unprefixed `xmlns` declaration (§4.3 item 1).
    fn namespace_declarations(&self) -> Vec<(Option<&str>, &str)>;

    /// Children in document order, both elements and text runs (§4.6
    /// "element has only text children").
    fn children(&self) -> Vec<ChildNode<Self>>;

    /// The concatenation of all descendant text nodes (§4.6 plain-literal
    /// construction).
    fn text_content(&self) -> String;

    /// Serialises the element's *inner* markup (children only, not the
    /// element's own start/end tag) for the XML-literal path (§4.6). The
    /// namespace-fixup step (attaching in-scope declarations to the
    /// fragment's root descendants) is performed by the literal builder
    /// (C5), not by this method; this method only needs to hand back the
    /// serialised child markup.
    fn serialize_inner_xml(&self) -> Result<String, String>;
}

/// The read-only view the traversal engine needs of the parsed document as
/// a whole, for the Preamble of §4.5.
pub trait Document {
    type Node: ElementNode;

    /// The document's root element, if any (§7 `DocumentError` when absent).
    fn root(&self) -> Option<Self::Node>;

    /// HTML-host base lookup: the first `html > head > base[href]`,
    /// fragment-stripped (§4.5 Preamble). Returns `None` on non-HTML hosts
    /// or when no such element exists; the caller is responsible for
    /// stripping any fragment identifier.
    fn find_head_base(&self) -> Option<String> {
        None
    }
}
