//! C5 — Literal Builder (§4.6).

use crate::dom::{ChildNode, ElementNode};
use crate::emitter::Messages;
use crate::error::MessageKind;
use crate::host::RdfaVersion;
use oxrdf::vocab::rdf;
use oxrdf::{Literal, NamedNode};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;

/// The three literal shapes §3 distinguishes.
#[derive(Debug, Clone)]
pub enum LiteralValue {
    Plain(Literal),
    Typed(Literal),
    Xml(Literal),
}

impl LiteralValue {
    pub fn into_literal(self) -> Literal {
        match self {
            Self::Plain(l) | Self::Typed(l) | Self::Xml(l) => l,
        }
    }
}

/// The inputs the engine (C6, §4.5 Step 10) has already computed before
/// calling into the literal builder.
pub struct LiteralInput<'a> {
    /// The trimmed `@content` value, if the attribute was present.
    pub content_attr: Option<&'a str>,
    /// The raw, untrimmed-resolution `@datatype` value, used only to test
    /// "datatype is the empty string" (§4.6, RDFa 1.0 branch). `None` means
    /// the attribute was absent; `Some("")` means present and empty.
    pub datatype_attr: Option<&'a str>,
    /// The resolved datatype IRI (§4.5 Step 10: "Resolve @datatype (if
    /// non-empty) with TERMorCURIEorAbsURI"), if resolution succeeded.
    pub datatype_iri: Option<NamedNode>,
    pub language: Option<&'a str>,
}

/// Builds the literal object for `element`, returning the literal and
/// whether the caller should continue recursing into `element`'s children
/// (`recurse`, §4.5 Step 12 — false only for the RDFa 1.0 XML-literal
/// case, §4.6). Returns `None` (with a recorded [`MessageKind::LiteralError`])
/// when construction fails; the caller must suppress the triple (§7).
pub fn build_literal<E: ElementNode>(
    element: &E,
    input: &LiteralInput<'_>,
    namespaces: &HashMap<String, String>,
    version: RdfaVersion,
    messages: &mut Messages,
) -> Option<(LiteralValue, bool)> {
    if let Some(datatype) = &input.datatype_iri {
        if datatype.as_str() != rdf::XML_LITERAL.as_str() {
            let lexical = lexical_value(element, input.content_attr);
            return Some((
                LiteralValue::Typed(Literal::new_typed_literal(lexical, datatype.clone())),
                true,
            ));
        }
    }

    let is_xml_literal_datatype = input
        .datatype_iri
        .as_ref()
        .is_some_and(|d| d.as_str() == rdf::XML_LITERAL.as_str());

    if matches!(version, RdfaVersion::Rdfa11) && is_xml_literal_datatype {
        return build_xml_literal(element, namespaces, messages).map(|l| (LiteralValue::Xml(l), false));
    }

    if matches!(version, RdfaVersion::Rdfa11) {
        return Some((LiteralValue::Plain(plain_literal(element, input, messages)), true));
    }

    // RDFa 1.0.
    let only_text_children = element
        .children()
        .iter()
        .all(|c| matches!(c, ChildNode::Text(_)));
    let is_empty = element.children().is_empty();
    let datatype_is_empty_string = input.datatype_attr == Some("");

    if input.content_attr.is_some() || only_text_children || is_empty || datatype_is_empty_string {
        Some((LiteralValue::Plain(plain_literal(element, input, messages)), true))
    } else {
        build_xml_literal(element, namespaces, messages).map(|l| (LiteralValue::Xml(l), false))
    }
}

fn lexical_value<E: ElementNode>(element: &E, content_attr: Option<&str>) -> String {
    content_attr
        .map(str::to_owned)
        .unwrap_or_else(|| element.text_content())
}

fn plain_literal<E: ElementNode>(
    element: &E,
    input: &LiteralInput<'_>,
    messages: &mut Messages,
) -> Literal {
    let lexical = lexical_value(element, input.content_attr);
    match input.language {
        Some(language) => match Literal::new_language_tagged_literal(lexical.clone(), language) {
            Ok(literal) => literal,
            Err(error) => {
                messages.push(
                    MessageKind::LiteralError,
                    crate::error::invalid_language_tag(language, error),
                );
                Literal::new_simple_literal(lexical)
            }
        },
        None => Literal::new_simple_literal(lexical),
    }
}

/// Serialises `element`'s children and attaches the namespace declarations
/// active at `element` to its direct-child elements, so the resulting
/// fragment is self-contained (§4.6 "XML-literal construction"). A child
/// that already redeclares a prefix keeps its own declaration (§4.5
/// "child re-declarations take precedence"): we never overwrite an
/// existing `xmlns*` attribute, only add missing ones.
fn build_xml_literal<E: ElementNode>(
    element: &E,
    namespaces: &HashMap<String, String>,
    messages: &mut Messages,
) -> Option<Literal> {
    let markup = match element.serialize_inner_xml() {
        Ok(markup) => markup,
        Err(error) => {
            messages.push(
                MessageKind::LiteralError,
                format!("failed to serialise XML literal: {error}"),
            );
            return None;
        }
    };
    match inject_namespaces(&markup, namespaces) {
        Ok(fixed_up) => Some(Literal::new_typed_literal(fixed_up, rdf::XML_LITERAL)),
        Err(error) => {
            messages.push(
                MessageKind::LiteralError,
                format!("failed to build XML literal: {error}"),
            );
            None
        }
    }
}

fn inject_namespaces(
    markup: &str,
    namespaces: &HashMap<String, String>,
) -> Result<String, quick_xml::Error> {
    if namespaces.is_empty() || markup.is_empty() {
        return Ok(markup.to_owned());
    }
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Vec::new());
    let mut depth: i32 = 0;
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) => {
                let start = if depth == 0 {
                    with_missing_namespaces(&start, namespaces)?
                } else {
                    start.into_owned()
                };
                depth += 1;
                writer.write_event(Event::Start(start))?;
            }
            Event::Empty(start) => {
                let start = if depth == 0 {
                    with_missing_namespaces(&start, namespaces)?
                } else {
                    start.into_owned()
                };
                writer.write_event(Event::Empty(start))?;
            }
            Event::End(end) => {
                depth -= 1;
                writer.write_event(Event::End(end.into_owned()))?;
            }
            other => writer.write_event(other)?,
        }
    }
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn with_missing_namespaces(
    start: &BytesStart<'_>,
    namespaces: &HashMap<String, String>,
) -> Result<BytesStart<'static>, quick_xml::Error> {
    let mut start = start.to_owned().into_owned();
    for (prefix, iri) in namespaces {
        let attr_name = if prefix.is_empty() {
            "xmlns".to_owned()
        } else {
            format!("xmlns:{prefix}")
        };
        if start.try_get_attribute(attr_name.as_bytes())?.is_none() {
            start.push_attribute((attr_name.as_str(), iri.as_str()));
        }
    }
    Ok(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ChildNode;

    #[derive(Clone)]
    struct FakeElement {
        text: String,
        children: Vec<ChildNode<FakeElement>>,
        inner_xml: String,
    }

    impl ElementNode for FakeElement {
        fn local_name(&self) -> &str {
            "span"
        }

        fn namespace_uri(&self) -> Option<&str> {
            None
        }

        fn attribute(&self, _name: &str) -> Option<&str> {
            None
        }

        fn attributes(&self) -> Vec<(&str, &str)> {
            Vec::new()
        }

        fn namespace_declarations(&self) -> Vec<(Option<&str>, &str)> {
            Vec::new()
        }

        fn children(&self) -> Vec<ChildNode<Self>> {
            self.children.clone()
        }

        fn text_content(&self) -> String {
            self.text.clone()
        }

        fn serialize_inner_xml(&self) -> Result<String, String> {
            Ok(self.inner_xml.clone())
        }
    }

    fn text_only(text: &str) -> FakeElement {
        FakeElement {
            text: text.to_owned(),
            children: vec![ChildNode::Text(text.to_owned())],
            inner_xml: text.to_owned(),
        }
    }

    #[test]
    fn typed_literal_uses_content_attr_over_text() {
        let element = text_only("30 years");
        let mut messages = Messages::default();
        let input = LiteralInput {
            content_attr: Some("30"),
            datatype_attr: Some("xsd:integer"),
            datatype_iri: Some(NamedNode::new_unchecked(
                "http://www.w3.org/2001/XMLSchema#integer",
            )),
            language: None,
        };
        let (value, recurse) =
            build_literal(&element, &input, &HashMap::new(), RdfaVersion::Rdfa11, &mut messages)
                .unwrap();
        assert!(recurse);
        match value {
            LiteralValue::Typed(l) => assert_eq!(l.value(), "30"),
            _ => panic!("expected typed literal"),
        }
    }

    #[test]
    fn plain_literal_in_1_1_ignores_markup_shape() {
        let element = FakeElement {
            text: "hello world".to_owned(),
            children: vec![
                ChildNode::Text("hello ".to_owned()),
                ChildNode::Element(text_only("world")),
            ],
            inner_xml: "hello <em>world</em>".to_owned(),
        };
        let mut messages = Messages::default();
        let input = LiteralInput {
            content_attr: None,
            datatype_attr: None,
            datatype_iri: None,
            language: Some("en"),
        };
        let (value, recurse) =
            build_literal(&element, &input, &HashMap::new(), RdfaVersion::Rdfa11, &mut messages)
                .unwrap();
        assert!(recurse);
        match value {
            LiteralValue::Plain(l) => {
                assert_eq!(l.value(), "hello world");
                assert_eq!(l.language(), Some("en"));
            }
            _ => panic!("expected plain literal"),
        }
    }

    #[test]
    fn xml_literal_in_1_0_suppresses_recursion() {
        let element = FakeElement {
            text: "hello world".to_owned(),
            children: vec![
                ChildNode::Text("hello ".to_owned()),
                ChildNode::Element(text_only("world")),
            ],
            inner_xml: "hello <em>world</em>".to_owned(),
        };
        let mut messages = Messages::default();
        let input = LiteralInput {
            content_attr: None,
            datatype_attr: None,
            datatype_iri: None,
            language: None,
        };
        let (value, recurse) =
            build_literal(&element, &input, &HashMap::new(), RdfaVersion::Rdfa10, &mut messages)
                .unwrap();
        assert!(!recurse);
        match value {
            LiteralValue::Xml(l) => {
                assert_eq!(l.value(), "hello <em>world</em>");
                assert_eq!(l.datatype(), rdf::XML_LITERAL);
            }
            _ => panic!("expected XML literal"),
        }
    }

    #[test]
    fn xml_literal_gains_namespace_declaration() {
        let element = FakeElement {
            text: "world".to_owned(),
            children: vec![ChildNode::Element(text_only("world"))],
            inner_xml: "<em>world</em>".to_owned(),
        };
        let mut messages = Messages::default();
        let input = LiteralInput {
            content_attr: None,
            datatype_attr: None,
            datatype_iri: None,
            language: None,
        };
        let mut namespaces = HashMap::new();
        namespaces.insert("foaf".to_owned(), "http://xmlns.com/foaf/0.1/".to_owned());
        let (value, _) =
            build_literal(&element, &input, &namespaces, RdfaVersion::Rdfa10, &mut messages)
                .unwrap();
        match value {
            LiteralValue::Xml(l) => assert!(l.value().contains("xmlns:foaf")),
            _ => panic!("expected XML literal"),
        }
    }

    #[test]
    fn empty_datatype_attr_forces_plain_in_1_0() {
        let element = FakeElement {
            text: "x".to_owned(),
            children: vec![ChildNode::Element(text_only("x"))],
            inner_xml: "<b>x</b>".to_owned(),
        };
        let mut messages = Messages::default();
        let input = LiteralInput {
            content_attr: None,
            datatype_attr: Some(""),
            datatype_iri: None,
            language: None,
        };
        let (value, recurse) =
            build_literal(&element, &input, &HashMap::new(), RdfaVersion::Rdfa10, &mut messages)
                .unwrap();
        assert!(recurse);
        assert!(matches!(value, LiteralValue::Plain(_)));
    }
}
