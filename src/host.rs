//! C1 — Host-Language Detector (§4.1).

/// The host markup language carrying the RDFa annotations.
///
/// Affects base-IRI and language-attribute resolution and the head/body
/// special case in the traversal engine (§4.5 Step 5/6).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum HostLanguage {
    Xml1,
    Xhtml1,
    Xhtml5,
    Html4,
    Html5,
    Svg,
}

impl HostLanguage {
    /// Whether this host is one of the HTML family (`html4`, `html5`), as
    /// opposed to an XHTML/XML/SVG host. HTML hosts get the relaxed
    /// `xmlns`-attribute fallback of §4.3 item 1.
    pub fn is_html(self) -> bool {
        matches!(self, Self::Html4 | Self::Html5)
    }

    /// Whether this host gets the (X)HTML-family treatment: the head/body
    /// special-cased subject rule of §4.5 Steps 5 and 6, and the `xhtml`
    /// default-profile merge of the Preamble. The spec text restricts both
    /// to "HTML host" but the XHTML family shares the same document
    /// structure and default context, so we extend both to all (X)HTML
    /// variants; SVG and bare XML never have `head`/`body` or lean on the
    /// `xhtml` profile at all.
    pub fn has_head_body_rule(self) -> bool {
        matches!(
            self,
            Self::Html4 | Self::Html5 | Self::Xhtml1 | Self::Xhtml5
        )
    }

    /// Whether `xml:base` is honoured on arbitrary elements (non-HTML
    /// hosts, §3 "base" field and §4.5 "Base update"). HTML4/HTML5 do not
    /// support `xml:base`.
    pub fn supports_xml_base(self) -> bool {
        !matches!(self, Self::Html4 | Self::Html5)
    }
}

/// The RDFa Core specification version governing a parse. Locked once
/// detected (§3 invariant "Version lock").
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RdfaVersion {
    Rdfa10,
    Rdfa11,
}

impl RdfaVersion {
    /// Whether the `prefix` attribute and CURIE-in-`@typeof`/`@rel`/`@rev`
    /// (beyond plain NCName terms) are recognised (1.1 only).
    pub fn has_prefix_attribute(self) -> bool {
        matches!(self, Self::Rdfa11)
    }
}

/// Inputs available to the detector; all optional except that at least the
/// MIME type or a doctype/root-element hint is normally present.
#[derive(Debug, Clone, Default)]
pub struct DetectionHints<'a> {
    /// Explicit override (§4.1 rule 1).
    pub host_language: Option<HostLanguage>,
    /// Explicit override (§4.1 rule 1).
    pub version: Option<RdfaVersion>,
    /// The document's MIME type, if known from transport metadata.
    pub mime_type: Option<&'a str>,
    /// The raw doctype system/public identifier text, if present.
    pub doctype: Option<&'a str>,
    /// The `version` attribute found on the root element, if any.
    pub root_version_attr: Option<&'a str>,
    /// The local name of the root element (used to recognise bare `svg`).
    pub root_element_name: Option<&'a str>,
}

/// Runs the detection rules of §4.1 ("first match wins").
pub fn detect(hints: &DetectionHints<'_>) -> (HostLanguage, RdfaVersion) {
    let version = hints.version.unwrap_or_else(|| detect_version(hints));
    let host = hints.host_language.unwrap_or_else(|| detect_host(hints));
    (host, version)
}

fn detect_version(hints: &DetectionHints<'_>) -> RdfaVersion {
    let text = hints
        .root_version_attr
        .or(hints.doctype)
        .unwrap_or_default();
    if text.contains("RDFa 1.0") {
        RdfaVersion::Rdfa10
    } else {
        // "else default 1.1" -- covers an explicit "RDFa 1.1" marker and
        // the no-marker case alike.
        RdfaVersion::Rdfa11
    }
}

fn detect_host(hints: &DetectionHints<'_>) -> HostLanguage {
    let mime = hints.mime_type.unwrap_or_default();
    let doctype = hints.doctype.unwrap_or_default();
    if mime.eq_ignore_ascii_case("application/xml") {
        return HostLanguage::Xml1;
    }
    if mime.eq_ignore_ascii_case("image/svg+xml")
        || hints.root_element_name == Some("svg")
    {
        return HostLanguage::Svg;
    }
    if mime.eq_ignore_ascii_case("text/html") {
        if doctype_mentions(doctype, "html 4") {
            return HostLanguage::Html4;
        }
        if doctype_mentions(doctype, "xhtml") {
            return HostLanguage::Xhtml1;
        }
        if doctype_mentions(doctype, "html") {
            return HostLanguage::Html5;
        }
        return HostLanguage::Html5;
    }
    if mime.eq_ignore_ascii_case("application/xhtml+xml") {
        if doctype_mentions(doctype, "html 4") {
            return HostLanguage::Html4;
        }
        if doctype_mentions(doctype, "xhtml") {
            return HostLanguage::Xhtml1;
        }
        return HostLanguage::Xhtml5;
    }
    // Fall back to xml1 (§4.1 rule 4).
    HostLanguage::Xml1
}

fn doctype_mentions(doctype: &str, needle: &str) -> bool {
    doctype.to_ascii_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let hints = DetectionHints {
            host_language: Some(HostLanguage::Svg),
            version: Some(RdfaVersion::Rdfa10),
            mime_type: Some("text/html"),
            ..Default::default()
        };
        assert_eq!(detect(&hints), (HostLanguage::Svg, RdfaVersion::Rdfa10));
    }

    #[test]
    fn html_with_xhtml_doctype() {
        let hints = DetectionHints {
            mime_type: Some("text/html"),
            doctype: Some("-//W3C//DTD XHTML 1.0 Strict//EN"),
            ..Default::default()
        };
        assert_eq!(
            detect(&hints).0,
            HostLanguage::Xhtml1
        );
    }

    #[test]
    fn default_falls_back_to_xml1() {
        let hints = DetectionHints::default();
        assert_eq!(detect(&hints), (HostLanguage::Xml1, RdfaVersion::Rdfa11));
    }

    #[test]
    fn svg_root_without_mime() {
        let hints = DetectionHints {
            root_element_name: Some("svg"),
            ..Default::default()
        };
        assert_eq!(detect(&hints).0, HostLanguage::Svg);
    }

    #[test]
    fn explicit_rdfa_10_version_marker() {
        let hints = DetectionHints {
            root_version_attr: Some("XHTML+RDFa 1.0"),
            ..Default::default()
        };
        assert_eq!(detect(&hints).1, RdfaVersion::Rdfa10);
    }
}
